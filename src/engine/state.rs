//! Run state: pieces in flight, the settled board, and the published snapshot

use serde::Serialize;

use super::board::Board;
use super::figure::{Figure, FigureGenerator};
use super::progress::Progression;
use crate::config::GameConfig;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Constructed but not yet started
    Ready,
    Running,
    /// Overflowed; waiting for a click to start the next run
    GameOver,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayingField {
    pub next_figure: Figure,
    pub current_figure: Figure,
    pub board: Board,
    pub score: u64,
    pub level: u32,
}

/// Mutable state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub board: Board,
    pub current: Figure,
    pub next: Figure,
    pub progress: Progression,
    pub generator: FigureGenerator,
    /// Bumps on every spawn; identifies the piece a fold belongs to
    pub piece_id: u64,
}

impl GameState {
    /// Draw the first two figures: the first becomes current, the second next
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut generator = FigureGenerator::new(seed);
        let current = generator.next_figure(config.board_columns);
        let next = generator.next_figure(config.board_columns);
        Self {
            phase: GamePhase::Ready,
            board: Board::empty(config.board_columns, config.board_rows),
            current,
            next,
            progress: Progression::new(config),
            generator,
            piece_id: 0,
        }
    }

    /// Promote the preview figure and draw a fresh one behind it
    pub fn advance_piece(&mut self, config: &GameConfig) {
        self.current = std::mem::replace(
            &mut self.next,
            self.generator.next_figure(config.board_columns),
        );
        self.piece_id += 1;
    }

    /// Wipe the run but keep the generator stream where it is
    pub fn reset_run(&mut self, config: &GameConfig) {
        self.board = Board::empty(config.board_columns, config.board_rows);
        self.current = self.generator.next_figure(config.board_columns);
        self.next = self.generator.next_figure(config.board_columns);
        self.progress = Progression::new(config);
        self.piece_id = 0;
    }

    pub fn snapshot(&self) -> PlayingField {
        PlayingField {
            next_figure: self.next.clone(),
            current_figure: self.current.clone(),
            board: self.board.clone(),
            score: self.progress.score(),
            level: self.progress.level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_starts_ready_with_an_empty_board() {
        let config = GameConfig::default();
        let state = GameState::new(&config, 7);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.piece_id, 0);
        assert_eq!(state.board.column_count(), 10);
        assert!((0..10).all(|column| state.board.column_height(column) == 0));
    }

    #[test]
    fn test_advancing_promotes_the_preview_figure() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 7);
        let preview = state.next.clone();
        state.advance_piece(&config);
        assert_eq!(state.current, preview);
        assert_eq!(state.piece_id, 1);
    }

    #[test]
    fn test_reset_continues_the_generator_stream() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 99);
        state.advance_piece(&config);
        state.reset_run(&config);

        // draws 0..5 of the same seed: new takes 0 and 1, advance takes 2,
        // reset takes 3 and 4
        let mut reference = FigureGenerator::new(99);
        let draws: Vec<_> = (0..5)
            .map(|_| reference.next_figure(config.board_columns))
            .collect();
        assert_eq!(state.current, draws[3]);
        assert_eq!(state.next, draws[4]);
        assert_eq!(state.progress.score(), 0);
        assert_eq!(state.piece_id, 0);
    }

    #[test]
    fn test_snapshot_serializes_with_camel_case_keys() {
        let config = GameConfig::default();
        let state = GameState::new(&config, 1);
        let json = serde_json::to_value(state.snapshot()).expect("serializable");
        let object = json.as_object().expect("object");
        assert!(object.contains_key("nextFigure"));
        assert!(object.contains_key("currentFigure"));
        assert!(object.contains_key("board"));
        assert_eq!(object["score"], 0);
        assert_eq!(object["level"], 0);
    }
}
