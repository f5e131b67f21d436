//! Input commands and the transformation table
//!
//! The five commands map one-to-one onto `Transformation` records resolved
//! once at engine construction; gravity reuses the Down record, bonus
//! included. A corrigible transformation that leaves the field is clamped
//! back in and dropped only if it still overlaps the set; a terminal one
//! that collides signals that the piece has landed.

use glam::IVec2;

use super::board::Board;
use super::figure::Figure;
use crate::config::GameConfig;

/// Player/gravity commands understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Left,
    Right,
    Rotate,
    SoftDrop,
    HardDrop,
}

impl Command {
    /// Fixed key mapping; anything else is ignored
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            "ArrowUp" => Some(Self::Rotate),
            "ArrowDown" => Some(Self::SoftDrop),
            "Space" => Some(Self::HardDrop),
            _ => None,
        }
    }
}

/// A named move with its policy flag and point value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    pub name: &'static str,
    pub command: Command,
    /// Clamp out-of-field results back in instead of rejecting them
    pub corrigible: bool,
    /// Accrued into the fold each time the move actually applies
    pub bonus_points: i64,
}

/// The command set resolved against a config; indexed by `Command as usize`
pub fn transformation_table(config: &GameConfig) -> [Transformation; 5] {
    [
        Transformation {
            name: "Left",
            command: Command::Left,
            corrigible: true,
            bonus_points: 0,
        },
        Transformation {
            name: "Right",
            command: Command::Right,
            corrigible: true,
            bonus_points: 0,
        },
        Transformation {
            name: "Up",
            command: Command::Rotate,
            corrigible: true,
            bonus_points: 0,
        },
        Transformation {
            name: "Down",
            command: Command::SoftDrop,
            corrigible: false,
            bonus_points: config.points_soft_drop,
        },
        Transformation {
            name: "Drop",
            command: Command::HardDrop,
            corrigible: false,
            bonus_points: config.points_hard_drop,
        },
    ]
}

/// Outcome of applying one transformation against the current board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Figure moved (or rotated) to a legal position
    Moved(Figure),
    /// Corrigible move still collided after clamping; no effect
    Rejected,
    /// Terminal move collided; the pre-move figure has landed
    Landed,
}

impl Transformation {
    /// Pure geometry, no collision policy
    pub fn apply(&self, figure: &Figure, board: &Board) -> Figure {
        match self.command {
            Command::Left => figure.translated(IVec2::new(-1, 0)),
            Command::Right => figure.translated(IVec2::new(1, 0)),
            Command::Rotate => figure.rotated_clockwise(),
            Command::SoftDrop => figure.translated(IVec2::new(0, 1)),
            Command::HardDrop => figure.translated(IVec2::new(0, board.drop_distance(figure))),
        }
    }

    /// Apply with the clamp/reject/land policy
    pub fn apply_checked(&self, figure: &Figure, board: &Board) -> Applied {
        let mut candidate = self.apply(figure, board);
        if self.corrigible {
            if out_of_field(&candidate, board) {
                candidate = clamp_to_field(candidate, board);
            }
            if board.collides(&candidate) {
                Applied::Rejected
            } else {
                Applied::Moved(candidate)
            }
        } else if out_of_field(&candidate, board) || board.collides(&candidate) {
            Applied::Landed
        } else {
            Applied::Moved(candidate)
        }
    }
}

fn out_of_field(figure: &Figure, board: &Board) -> bool {
    let columns = board.column_count() as i32;
    let rows = board.row_count() as i32;
    figure.position.x < 0
        || figure.position.x + figure.width() as i32 > columns
        || figure.position.y < 0
        || figure.position.y + figure.height() as i32 > rows
}

/// Clamp x to `[0, columns - width]` and y to `[0, rows - height]`
fn clamp_to_field(figure: Figure, board: &Board) -> Figure {
    let max_x = (board.column_count() as i32 - figure.width() as i32).max(0);
    let max_y = (board.row_count() as i32 - figure.height() as i32).max(0);
    let clamped = IVec2::new(
        figure.position.x.clamp(0, max_x),
        figure.position.y.clamp(0, max_y),
    );
    figure.at(clamped)
}
