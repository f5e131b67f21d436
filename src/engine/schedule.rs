//! Frame scheduling and the transformation fold
//!
//! The engine is driven by the host's render clock: each `frame` call is a
//! batch boundary. Commands pushed between frames are stamped with the
//! engine clock and a sequence number; gravity deadlines are materialized as
//! soft-drop events at their exact due times. The frame's batch is ordered
//! by (stamp, sequence) and folded over the falling piece, and a landing
//! finalizes the piece and discards the rest of the batch.
//!
//! Time here is virtual. The clock only advances inside `frame`, and a
//! single elapsed step is capped so a long host pause cannot flood the run
//! with missed gravity ticks.

use log::{debug, info};

use super::board::row_clear_points;
use super::progress::ProgressDelta;
use super::state::{GamePhase, GameState, PlayingField};
use super::transform::{Applied, Command, Transformation, transformation_table};
use crate::config::{ConfigError, GameConfig};
use crate::consts::MAX_FRAME_DELTA_MS;

/// Fixed-interval timer on the engine's virtual clock
#[derive(Debug, Clone)]
struct GravityClock {
    interval_ms: f64,
    next_due_ms: f64,
}

impl GravityClock {
    fn armed(speed: f32, now_ms: f64) -> Self {
        // at least 1ms so the timer always advances
        let interval_ms = (1000.0 / f64::from(speed)).floor().max(1.0);
        Self {
            interval_ms,
            next_due_ms: now_ms + interval_ms,
        }
    }

    /// Discard the in-flight deadline; the new interval counts from `now_ms`
    fn restart(&mut self, speed: f32, now_ms: f64) {
        *self = Self::armed(speed, now_ms);
    }

    /// Deadlines elapsed up to and including `until_ms`, in order
    fn take_due(&mut self, until_ms: f64) -> Vec<f64> {
        let mut due = Vec::new();
        while self.next_due_ms <= until_ms {
            due.push(self.next_due_ms);
            self.next_due_ms += self.interval_ms;
        }
        due
    }
}

/// A command with its stamp; the sort key within a batch
#[derive(Debug, Clone, Copy)]
struct QueuedCommand {
    command: Command,
    at_ms: f64,
    seq: u64,
}

/// Bonus points carried across batches for the piece in flight
#[derive(Debug, Clone, Copy)]
struct FoldRecord {
    piece_id: u64,
    bonus_points: i64,
}

/// What one host frame produced
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    /// Engine is not running; nothing to render
    Idle,
    /// Normal frame output while the run is live
    Running(PlayingField),
    /// The run just ended; render this terminal snapshot once
    GameOver(PlayingField),
}

/// The game engine: rules, scheduling, and input ports in one owner.
///
/// Hosts construct one engine per game surface, feed keys and clicks as they
/// arrive, and call [`Engine::frame`] once per render tick.
pub struct Engine {
    config: GameConfig,
    table: [Transformation; 5],
    state: GameState,
    fold: FoldRecord,
    gravity: GravityClock,
    clock_ms: f64,
    pending: Vec<QueuedCommand>,
    next_seq: u64,
}

impl Engine {
    /// Build an engine; a config violating the constants contract is refused
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = transformation_table(&config);
        let state = GameState::new(&config, seed);
        let gravity = GravityClock::armed(config.start_speed, 0.0);
        Ok(Self {
            config,
            table,
            state,
            fold: FoldRecord {
                piece_id: 0,
                bonus_points: 0,
            },
            gravity,
            clock_ms: 0.0,
            pending: Vec::new(),
            next_seq: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.state.generator.seed()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn snapshot(&self) -> PlayingField {
        self.state.snapshot()
    }

    /// Begin the run. The zero-point feed announces the start level, which
    /// arms gravity at the base interval.
    pub fn start(&mut self) -> PlayingField {
        if self.state.phase == GamePhase::Ready {
            self.state.phase = GamePhase::Running;
            let delta = self.state.progress.receive_points(0, &self.config);
            self.apply_progress(delta);
            info!(
                "run started at level {} (seed {})",
                self.state.progress.level(),
                self.seed()
            );
        }
        self.state.snapshot()
    }

    /// Map a key to a command and queue it; returns whether it was consumed
    pub fn handle_key(&mut self, key: &str) -> bool {
        let Some(command) = Command::from_key(key) else {
            return false;
        };
        if self.state.phase != GamePhase::Running {
            return false;
        }
        self.push_command(command);
        true
    }

    /// Queue a command, stamped with the engine clock at the time of the push
    pub fn push_command(&mut self, command: Command) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        self.pending.push(QueuedCommand {
            command,
            at_ms: self.clock_ms,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// A click only matters after game over: it starts the next run.
    ///
    /// The figure generator is not reseeded, so one seed determines a whole
    /// session across restarts.
    pub fn click(&mut self) -> Option<PlayingField> {
        if self.state.phase != GamePhase::GameOver {
            return None;
        }
        self.state.reset_run(&self.config);
        self.state.phase = GamePhase::Running;
        self.fold = FoldRecord {
            piece_id: self.state.piece_id,
            bonus_points: 0,
        };
        self.pending.clear();
        let delta = self.state.progress.receive_points(0, &self.config);
        self.apply_progress(delta);
        info!("run restarted");
        Some(self.state.snapshot())
    }

    /// Advance to `now_ms`, apply this frame's batch, and report the outcome
    pub fn frame(&mut self, now_ms: f64) -> FrameEvent {
        let elapsed = (now_ms - self.clock_ms).clamp(0.0, MAX_FRAME_DELTA_MS);
        let now = self.clock_ms + elapsed;
        self.clock_ms = now;
        if self.state.phase != GamePhase::Running {
            return FrameEvent::Idle;
        }
        let batch = self.collect_batch(now);
        if !batch.is_empty() && self.apply_batch(&batch) {
            return FrameEvent::GameOver(self.state.snapshot());
        }
        FrameEvent::Running(self.state.snapshot())
    }

    /// Drain queued commands and due gravity deadlines into one ordered batch
    fn collect_batch(&mut self, until_ms: f64) -> Vec<QueuedCommand> {
        let mut batch: Vec<QueuedCommand> = self.pending.drain(..).collect();
        for deadline in self.gravity.take_due(until_ms) {
            batch.push(QueuedCommand {
                command: Command::SoftDrop,
                at_ms: deadline,
                seq: self.next_seq,
            });
            self.next_seq += 1;
        }
        batch.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms).then(a.seq.cmp(&b.seq)));
        batch
    }

    /// Fold the batch over the falling piece; true means the run ended
    fn apply_batch(&mut self, batch: &[QueuedCommand]) -> bool {
        if self.fold.piece_id != self.state.piece_id {
            // a new piece began falling since the last batch
            self.fold = FoldRecord {
                piece_id: self.state.piece_id,
                bonus_points: 0,
            };
        }
        for queued in batch {
            let transformation = self.table[queued.command as usize];
            match transformation.apply_checked(&self.state.current, &self.state.board) {
                Applied::Moved(figure) => {
                    self.state.current = figure;
                    self.fold.bonus_points += transformation.bonus_points;
                }
                Applied::Rejected => {}
                Applied::Landed => {
                    debug!(
                        "piece {} landed on {}",
                        self.state.piece_id, transformation.name
                    );
                    if self.finalize_piece() {
                        return true;
                    }
                    // the rest of the batch addressed a piece that is gone
                    break;
                }
            }
        }
        false
    }

    /// Merge the landed piece, award points, clear rows, and spawn the next
    /// piece unless the merged board overflows.
    fn finalize_piece(&mut self) -> bool {
        let merged = self.state.board.replenish(&self.state.current);
        let award = self.config.points_add_figure + self.fold.bonus_points;
        let delta = self.state.progress.receive_points(award, &self.config);
        self.apply_progress(delta);

        let filled = merged.filled_row_indexes();
        let merged = if filled.is_empty() {
            merged
        } else {
            let reward = row_clear_points(filled.len(), self.config.points_filled_row);
            debug!("cleared {} row(s) for {reward} points", filled.len());
            let delta = self.state.progress.receive_points(reward, &self.config);
            self.apply_progress(delta);
            merged.remove_rows(&filled)
        };
        self.state.board = merged;

        if self.state.board.is_overflow() {
            self.state.phase = GamePhase::GameOver;
            self.pending.clear();
            info!("game over at {} points", self.state.progress.score());
            return true;
        }
        self.state.advance_piece(&self.config);
        false
    }

    /// A level announcement restarts gravity; a suppressed speed leaves the
    /// old timer in flight.
    fn apply_progress(&mut self, delta: ProgressDelta) {
        if let Some(level) = delta.level {
            info!("level {level}");
        }
        if let Some(speed) = delta.speed {
            self.gravity.restart(speed, self.clock_ms);
            debug!("gravity every {} ms", self.gravity.interval_ms);
        }
    }
}
