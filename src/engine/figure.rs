//! Figure value types and the seeded figure generator
//!
//! A figure is an immutable value: every transformation produces a new one.
//! The generator owns the run's only RNG stream, so a whole session replays
//! from a single seed.

use std::fmt;

use glam::IVec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

/// Cell colors; pixel values are the renderer's business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
}

/// The full palette, in catalog order
pub const COLORS: [Color; 5] = [
    Color::Red,
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Orange,
];

/// Malformed figure body, rejected at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureError {
    /// No rows, or a row with no cells
    Empty,
    /// Rows of unequal length
    Ragged,
    /// No occupied cell
    Blank,
}

impl fmt::Display for FigureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FigureError::Empty => write!(f, "figure body has no cells"),
            FigureError::Ragged => write!(f, "figure body rows have unequal length"),
            FigureError::Blank => write!(f, "figure body has no occupied cell"),
        }
    }
}

impl std::error::Error for FigureError {}

/// Rectangular boolean cell matrix; `true` = occupied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FigureBody {
    rows: Vec<Vec<bool>>,
}

impl FigureBody {
    /// Build a body from row-major cell data. Rows must be non-empty and of
    /// equal length, with at least one occupied cell.
    pub fn new(rows: Vec<Vec<bool>>) -> Result<Self, FigureError> {
        let Some(first) = rows.first() else {
            return Err(FigureError::Empty);
        };
        if first.is_empty() {
            return Err(FigureError::Empty);
        }
        if rows.iter().any(|row| row.len() != first.len()) {
            return Err(FigureError::Ragged);
        }
        if !rows.iter().flatten().any(|occupied| *occupied) {
            return Err(FigureError::Blank);
        }
        Ok(Self { rows })
    }

    /// Catalog entries are known-good; validated by tests instead
    fn from_catalog(rows: &[&[bool]]) -> Self {
        Self {
            rows: rows.iter().map(|row| row.to_vec()).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (top-down row, column)
    pub fn cell(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// 90 degrees clockwise: copy each occupied `(row, col)` into
    /// `(col, row)` of the transposed matrix, then reverse every row.
    /// Works for rectangular bodies; four applications are the identity.
    pub fn rotated_clockwise(&self) -> Self {
        let height = self.height();
        let width = self.width();
        let mut rotated = vec![vec![false; height]; width];
        for (row, cells) in self.rows.iter().enumerate() {
            for (col, &occupied) in cells.iter().enumerate() {
                if occupied {
                    rotated[col][row] = true;
                }
            }
        }
        for row in &mut rotated {
            row.reverse();
        }
        Self { rows: rotated }
    }

    /// Lowest occupied row in a body column, if any
    pub fn column_floor(&self, col: usize) -> Option<usize> {
        (0..self.height()).rev().find(|&row| self.cell(row, col))
    }
}

/// The falling piece: body cells anchored at a top-left board position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Figure {
    pub position: IVec2,
    pub body: FigureBody,
    pub color: Color,
}

impl Figure {
    pub fn new(position: IVec2, body: FigureBody, color: Color) -> Self {
        Self {
            position,
            body,
            color,
        }
    }

    pub fn width(&self) -> usize {
        self.body.width()
    }

    pub fn height(&self) -> usize {
        self.body.height()
    }

    /// Same body at a shifted position
    pub fn translated(&self, delta: IVec2) -> Self {
        self.at(self.position + delta)
    }

    /// Same body at an absolute position
    pub fn at(&self, position: IVec2) -> Self {
        Self {
            position,
            body: self.body.clone(),
            color: self.color,
        }
    }

    /// Rotated in place; the generator re-centers, transformations do not
    pub fn rotated_clockwise(&self) -> Self {
        Self {
            position: self.position,
            body: self.body.rotated_clockwise(),
            color: self.color,
        }
    }

    /// Absolute board coordinates of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        let position = self.position;
        self.body.rows.iter().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, occupied)| **occupied)
                .map(move |(col, _)| position + IVec2::new(col as i32, row as i32))
        })
    }
}

/// The seven shape bodies, as drawn by the classic game
const SHAPES: [&[&[bool]]; 7] = [
    // square
    &[&[true, true], &[true, true]],
    // S
    &[&[false, true, true], &[true, true, false]],
    // Z
    &[&[true, true, false], &[false, true, true]],
    // T
    &[&[false, true, false], &[true, true, true]],
    // J
    &[&[true, true], &[false, true], &[false, true]],
    // L
    &[&[true, true], &[true, false], &[true, false]],
    // I
    &[&[true], &[true], &[true], &[true]],
];

/// Seeded figure source; every draw consumes exactly three samples
/// (shape, color, rotation count), keeping replays stable.
#[derive(Debug, Clone)]
pub struct FigureGenerator {
    seed: u64,
    rng: Pcg32,
}

impl FigureGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next random figure: catalog shape, palette color, 0-3 clockwise
    /// rotations, centered over the board one row above the visible field.
    pub fn next_figure(&mut self, board_columns: usize) -> Figure {
        let shape = SHAPES[self.rng.random_range(0..SHAPES.len())];
        let color = COLORS[self.rng.random_range(0..COLORS.len())];
        let turns = self.rng.random_range(0..4u32);

        let mut body = FigureBody::from_catalog(shape);
        for _ in 0..turns {
            body = body.rotated_clockwise();
        }
        let position = start_position(&body, board_columns);
        Figure::new(position, body, color)
    }
}

/// Horizontal centering, vertical start one row above the board:
/// `x = ceil(columns/2 - width/2)`, `y = -1`
fn start_position(body: &FigureBody, board_columns: usize) -> IVec2 {
    let x = (board_columns as f32 / 2.0 - body.width() as f32 / 2.0).ceil() as i32;
    IVec2::new(x, -1)
}
