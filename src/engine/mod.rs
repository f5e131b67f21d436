//! Deterministic falling-block engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual time only: the host feeds `now_ms` into [`Engine::frame`]
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod board;
pub mod figure;
pub mod progress;
pub mod schedule;
pub mod state;
pub mod transform;

pub use board::{Board, row_clear_points};
pub use figure::{COLORS, Color, Figure, FigureBody, FigureError, FigureGenerator};
pub use progress::{ProgressDelta, Progression, calculate_level, calculate_speed};
pub use schedule::{Engine, FrameEvent};
pub use state::{GamePhase, GameState, PlayingField};
pub use transform::{Applied, Command, Transformation, transformation_table};
