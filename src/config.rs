//! The constants contract
//!
//! Every tunable the engine reads is collected here and fixed at engine
//! construction; board dimensions and the score/speed curves never change
//! mid-run. Defaults match the classic game (10x20 board, 1000 points per
//! level, quarter-step speed curve).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts;

/// Engine tunables, taken by value at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in cells
    pub board_columns: usize,
    /// Board height in cells
    pub board_rows: usize,
    /// Gravity speed at the starting level, in steps per second
    pub start_speed: f32,
    /// Cap for the speed curve; values above it are suppressed
    pub max_speed: f32,
    /// Master clock rate in frames per second
    pub max_fps: u32,
    /// Minimum level
    pub start_level: u32,
    /// Score needed per level step
    pub points_per_level: u64,
    /// Speed gained per level above the first
    pub speed_coefficient: f32,
    /// Awarded when a figure settles into the board
    pub points_add_figure: i64,
    /// Awarded per successful down step
    pub points_soft_drop: i64,
    /// Awarded for a hard drop
    pub points_hard_drop: i64,
    /// Base reward per filled row
    pub points_filled_row: i64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_columns: consts::BOARD_COLUMNS,
            board_rows: consts::BOARD_ROWS,
            start_speed: consts::START_SPEED,
            max_speed: consts::MAX_SPEED,
            max_fps: consts::MAX_FPS,
            start_level: consts::START_LEVEL,
            points_per_level: consts::POINTS_TO_INCREASE_LEVEL,
            speed_coefficient: consts::SPEED_INCREASE_COEFFICIENT,
            points_add_figure: consts::POINTS_ADD_FIGURE,
            points_soft_drop: consts::POINTS_SOFT_DROP,
            points_hard_drop: consts::POINTS_HARD_DROP,
            points_filled_row: consts::POINTS_FILLED_ROW,
        }
    }
}

/// Rejected constants contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Board must have at least one column and one row
    EmptyBoard,
    /// Named field must be positive
    NotPositive(&'static str),
    /// Config JSON did not parse
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyBoard => write!(f, "board dimensions must be non-zero"),
            ConfigError::NotPositive(field) => write!(f, "{field} must be positive"),
            ConfigError::Parse(err) => write!(f, "config parse error: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl GameConfig {
    /// Reject a contract-violating config before it reaches an engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_columns == 0 || self.board_rows == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        if self.start_speed.is_nan() || self.start_speed <= 0.0 {
            return Err(ConfigError::NotPositive("start_speed"));
        }
        if self.max_speed.is_nan() || self.max_speed <= 0.0 {
            return Err(ConfigError::NotPositive("max_speed"));
        }
        if self.max_fps == 0 {
            return Err(ConfigError::NotPositive("max_fps"));
        }
        if self.start_level == 0 {
            return Err(ConfigError::NotPositive("start_level"));
        }
        if self.points_per_level == 0 {
            return Err(ConfigError::NotPositive("points_per_level"));
        }
        if self.speed_coefficient.is_nan() || self.speed_coefficient < 0.0 {
            return Err(ConfigError::NotPositive("speed_coefficient"));
        }
        Ok(())
    }

    /// Parse and validate a JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Master clock period in milliseconds
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / f64::from(self.max_fps)
    }
}
