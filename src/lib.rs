//! Blockfall - a falling-block puzzle game engine
//!
//! Core modules:
//! - `engine`: deterministic game rules and frame scheduling
//! - `config`: the constants contract, fixed at engine construction
//! - `web`: wasm-bindgen boundary for the browser host
//!
//! Rendering, keyboard/click capture and page bootstrap live in the host.
//! The host forwards raw key codes and clicks into the engine's input ports
//! and receives one immutable `PlayingField` snapshot per frame in return.

pub mod config;
pub mod engine;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigError, GameConfig};
pub use engine::{Engine, FrameEvent, PlayingField};

/// Gameplay constants - the defaults behind the `GameConfig` contract
pub mod consts {
    /// Board width in cells
    pub const BOARD_COLUMNS: usize = 10;
    /// Board height in cells
    pub const BOARD_ROWS: usize = 20;

    /// Gravity speed at the starting level, in steps per second
    pub const START_SPEED: f32 = 1.0;
    /// Speeds above this are suppressed, not clamped
    pub const MAX_SPEED: f32 = 40.0;
    /// Master clock rate; one input batch per frame
    pub const MAX_FPS: u32 = 60;

    /// Minimum level
    pub const START_LEVEL: u32 = 1;
    /// Score needed per level step
    pub const POINTS_TO_INCREASE_LEVEL: u64 = 1000;
    /// Speed gained per level above the first
    pub const SPEED_INCREASE_COEFFICIENT: f32 = 0.25;

    /// Awarded when a figure settles into the board
    pub const POINTS_ADD_FIGURE: i64 = 10;
    /// Awarded per successful down step (gravity or manual)
    pub const POINTS_SOFT_DROP: i64 = 1;
    /// Awarded for a hard drop
    pub const POINTS_HARD_DROP: i64 = 10;
    /// Base reward per filled row; simultaneous clears scale quadratically
    pub const POINTS_FILLED_ROW: i64 = 50;

    /// Largest frame delta fed to gravity catch-up, in milliseconds
    pub const MAX_FRAME_DELTA_MS: f64 = 250.0;
}
