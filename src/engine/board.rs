//! The settled-block board: per-column bottom-up color stacks
//!
//! Row index `r` (top-down, the coordinate figures move in) and stack index
//! `s` (bottom-up) are related by `s = rows - 1 - r`. A slot can be a hole
//! (`None`) when a piece settles above a gap; a column's length runs to its
//! topmost filled slot. Every mutating operation is copy-on-write and
//! returns a fresh board.

use serde::Serialize;

use super::figure::{Color, Figure};

/// Reward for clearing `count` rows at once: `count * base * count`,
/// so a multi-row clear outscores the same rows cleared one by one.
pub fn row_clear_points(count: usize, base_points: i64) -> i64 {
    let count = count as i64;
    count * base_points * count
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    columns: Vec<Vec<Option<Color>>>,
    rows: usize,
}

impl Board {
    pub fn empty(columns: usize, rows: usize) -> Self {
        Self {
            columns: vec![Vec::new(); columns],
            rows,
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Stack length of a column, holes included
    pub fn column_height(&self, column: usize) -> usize {
        self.columns.get(column).map_or(0, Vec::len)
    }

    /// Color at (column, bottom-up stack index); `None` for empty or hole
    pub fn cell(&self, column: usize, stack_index: usize) -> Option<Color> {
        self.columns
            .get(column)?
            .get(stack_index)
            .copied()
            .flatten()
    }

    fn filled(&self, column: usize, stack_index: usize) -> bool {
        self.cell(column, stack_index).is_some()
    }

    fn tallest_column(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Overlap test between a figure and the settled stacks. A negative
    /// stack index is an out-of-band access below the floor and counts as a
    /// collision, never as a fault; cells above the visible board resolve to
    /// indexes beyond any stack and never collide.
    pub fn collides(&self, figure: &Figure) -> bool {
        for cell in figure.cells() {
            let stack_index = self.rows as i32 - 1 - cell.y;
            if stack_index < 0 {
                return true;
            }
            let Ok(column) = usize::try_from(cell.x) else {
                return true;
            };
            if column >= self.columns.len() {
                return true;
            }
            if self.filled(column, stack_index as usize) {
                return true;
            }
        }
        false
    }

    /// Merge a settled figure into a fresh copy of the board. Slots between
    /// a landing cell and the current stack top become holes; a cell above
    /// the visible board grows the column past `rows`, which is exactly the
    /// overflow signal.
    pub fn replenish(&self, figure: &Figure) -> Self {
        let mut next = self.clone();
        for cell in figure.cells() {
            let stack_index = next.rows as i32 - 1 - cell.y;
            let Ok(index) = usize::try_from(stack_index) else {
                continue;
            };
            let Ok(column) = usize::try_from(cell.x) else {
                continue;
            };
            let Some(stack) = next.columns.get_mut(column) else {
                continue;
            };
            if stack.len() <= index {
                stack.resize(index + 1, None);
            }
            stack[index] = Some(figure.color);
        }
        next
    }

    /// Ascending stack indexes of completely filled rows, scanned only up to
    /// the tallest column's height
    pub fn filled_row_indexes(&self) -> Vec<usize> {
        (0..self.tallest_column())
            .filter(|&index| self.row_filled(index))
            .collect()
    }

    fn row_filled(&self, stack_index: usize) -> bool {
        (0..self.columns.len()).all(|column| self.filled(column, stack_index))
    }

    /// Delete the given stack indexes from every column, shifting higher
    /// slots down. `indexes` must be ascending and unique (as produced by
    /// [`Board::filled_row_indexes`]); adjacent indexes are coalesced into
    /// runs so each run is removed in a single pass.
    pub fn remove_rows(&self, indexes: &[usize]) -> Self {
        let mut next = self.clone();
        for &(start, len) in coalesce(indexes).iter().rev() {
            for stack in &mut next.columns {
                if start < stack.len() {
                    let end = (start + len).min(stack.len());
                    stack.drain(start..end);
                }
            }
        }
        next
    }

    /// Game-over predicate: some column has reached the visible height
    pub fn is_overflow(&self) -> bool {
        self.columns.iter().any(|stack| stack.len() >= self.rows)
    }

    /// Minimal fall distance before `figure` rests on a stack top or the
    /// floor: the minimum over its occupied columns of the gap between the
    /// column's lowest cell and the board column's surface row.
    pub fn drop_distance(&self, figure: &Figure) -> i32 {
        let mut distance: Option<i32> = None;
        for col in 0..figure.width() {
            let Some(floor_row) = figure.body.column_floor(col) else {
                continue;
            };
            let column = figure.position.x + col as i32;
            let height = usize::try_from(column)
                .ok()
                .map_or(0, |c| self.column_height(c));
            let surface_row = self.rows as i32 - 1 - height as i32;
            let gap = surface_row - (figure.position.y + floor_row as i32);
            distance = Some(distance.map_or(gap, |d| d.min(gap)));
        }
        distance.unwrap_or(0).max(0)
    }
}

/// Coalesce ascending indexes into `(start, len)` runs
fn coalesce(indexes: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &index in indexes {
        match runs.last_mut() {
            Some((start, len)) if *start + *len == index => *len += 1,
            _ => runs.push((index, 1)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::engine::figure::FigureBody;

    fn unit_figure(x: i32, y: i32, color: Color) -> Figure {
        let body = FigureBody::new(vec![vec![true]]).expect("valid");
        Figure::new(IVec2::new(x, y), body, color)
    }

    fn square(x: i32, y: i32) -> Figure {
        let body = FigureBody::new(vec![vec![true, true], vec![true, true]]).expect("valid");
        Figure::new(IVec2::new(x, y), body, Color::Red)
    }

    /// Fill one cell addressed by (column, bottom-up stack index)
    fn fill(board: &Board, column: usize, stack_index: usize, color: Color) -> Board {
        let row = board.row_count() as i32 - 1 - stack_index as i32;
        board.replenish(&unit_figure(column as i32, row, color))
    }

    #[test]
    fn test_empty_board_never_collides_in_bounds() {
        let board = Board::empty(10, 20);
        assert!(!board.collides(&square(4, -1)));
        assert!(!board.collides(&square(0, 0)));
        assert!(!board.collides(&square(8, 18)));
    }

    #[test]
    fn test_below_floor_is_a_collision() {
        let board = Board::empty(10, 20);
        // bottom cell row = 20 -> stack index -1
        assert!(board.collides(&square(4, 19)));
    }

    #[test]
    fn test_out_of_band_column_is_a_collision() {
        let board = Board::empty(10, 20);
        assert!(board.collides(&square(-1, 5)));
        assert!(board.collides(&square(9, 5)));
    }

    #[test]
    fn test_replenished_cells_collide_afterwards() {
        let board = Board::empty(10, 20);
        let figure = square(4, 18);
        let settled = board.replenish(&figure);
        assert!(settled.collides(&figure));
        // the original is untouched (copy-on-write)
        assert!(!board.collides(&figure));
    }

    #[test]
    fn test_replenish_addresses_bottom_up_stacks() {
        let board = Board::empty(10, 20);
        let settled = board.replenish(&square(4, 18));
        assert_eq!(settled.cell(4, 0), Some(Color::Red));
        assert_eq!(settled.cell(4, 1), Some(Color::Red));
        assert_eq!(settled.cell(5, 0), Some(Color::Red));
        assert_eq!(settled.cell(5, 1), Some(Color::Red));
        assert_eq!(settled.column_height(4), 2);
        assert_eq!(settled.column_height(6), 0);
    }

    #[test]
    fn test_replenish_above_a_gap_leaves_a_hole() {
        let board = Board::empty(10, 20);
        // settle a single cell at stack index 2; indexes 0 and 1 become holes
        let settled = fill(&board, 3, 2, Color::Blue);
        assert_eq!(settled.column_height(3), 3);
        assert_eq!(settled.cell(3, 2), Some(Color::Blue));
        assert_eq!(settled.cell(3, 0), None);
        assert_eq!(settled.cell(3, 1), None);
    }

    #[test]
    fn test_replenish_above_the_board_overflows_the_column() {
        let mut board = Board::empty(10, 20);
        for index in 0..19 {
            board = fill(&board, 0, index, Color::Green);
        }
        assert!(!board.is_overflow());
        // piece finalized while poking one row above the visible field
        let overflowed = board.replenish(&unit_figure(0, -1, Color::Green));
        assert_eq!(overflowed.column_height(0), 21);
        assert!(overflowed.is_overflow());
    }

    #[test]
    fn test_filled_rows_require_every_column() {
        let mut board = Board::empty(10, 20);
        for column in 0..9 {
            board = fill(&board, column, 0, Color::Yellow);
        }
        assert!(board.filled_row_indexes().is_empty());
        board = fill(&board, 9, 0, Color::Yellow);
        assert_eq!(board.filled_row_indexes(), vec![0]);
    }

    #[test]
    fn test_filled_rows_skip_holes() {
        let mut board = Board::empty(10, 20);
        for column in 0..10 {
            // every column has height 2 but column 7's bottom slot is a hole
            if column == 7 {
                board = fill(&board, column, 1, Color::Blue);
            } else {
                board = fill(&board, column, 0, Color::Blue);
                board = fill(&board, column, 1, Color::Blue);
            }
        }
        assert_eq!(board.filled_row_indexes(), vec![1]);
    }

    #[test]
    fn test_one_completed_row_scores_base_points_and_shifts_down() {
        let mut board = Board::empty(10, 20);
        for column in 0..9 {
            board = fill(&board, column, 0, Color::Orange);
        }
        // a taller stack in column 2 to observe the shift
        board = fill(&board, 2, 1, Color::Red);
        board = fill(&board, 9, 0, Color::Orange);

        let filled = board.filled_row_indexes();
        assert_eq!(filled, vec![0]);
        assert_eq!(row_clear_points(filled.len(), 50), 50);

        let cleared = board.remove_rows(&filled);
        assert_eq!(cleared.column_height(2), 1);
        assert_eq!(cleared.cell(2, 0), Some(Color::Red));
        assert_eq!(cleared.column_height(9), 0);
        // the input board is unchanged
        assert_eq!(board.column_height(9), 1);
    }

    #[test]
    fn test_quadratic_reward_for_simultaneous_rows() {
        assert_eq!(row_clear_points(1, 50), 50);
        assert_eq!(row_clear_points(2, 50), 200);
        assert_eq!(row_clear_points(4, 50), 800);
    }

    #[test]
    fn test_remove_rows_with_no_indexes_is_identity() {
        let mut board = Board::empty(10, 20);
        board = fill(&board, 1, 0, Color::Green);
        board = fill(&board, 5, 3, Color::Blue);
        assert_eq!(board.remove_rows(&[]), board);
    }

    #[test]
    fn test_adjacent_indexes_are_removed_as_one_run() {
        let mut board = Board::empty(10, 20);
        for index in 0..5 {
            board = fill(&board, 0, index, Color::Red);
        }
        let trimmed = board.remove_rows(&[1, 2, 3]);
        assert_eq!(trimmed.column_height(0), 2);
        assert_eq!(trimmed.cell(0, 0), Some(Color::Red));
        assert_eq!(trimmed.cell(0, 1), Some(Color::Red));
    }

    #[test]
    fn test_non_adjacent_rows_are_both_removed() {
        let mut board = Board::empty(10, 20);
        for column in 0..10 {
            for index in 0..6 {
                board = fill(&board, column, index, Color::Green);
            }
        }
        // complete rows at stack indexes 2 and 5 are the ones to drop
        let trimmed = board.remove_rows(&[2, 5]);
        for column in 0..10 {
            assert_eq!(trimmed.column_height(column), 4);
        }

        // a column regrown to full height still reads as overflow
        let mut regrown = trimmed;
        for index in 4..20 {
            regrown = fill(&regrown, 4, index, Color::Green);
        }
        assert_eq!(regrown.column_height(4), 20);
        assert!(regrown.is_overflow());
    }

    #[test]
    fn test_overflow_at_exactly_board_height() {
        let mut board = Board::empty(10, 20);
        for index in 0..19 {
            board = fill(&board, 6, index, Color::Blue);
        }
        assert!(!board.is_overflow());
        board = fill(&board, 6, 19, Color::Blue);
        assert!(board.is_overflow());
    }

    #[test]
    fn test_drop_distance_to_the_floor() {
        let board = Board::empty(10, 20);
        // square spawned above the board: lowest cells at row 0
        assert_eq!(board.drop_distance(&square(4, -1)), 19);
        // already resting on the floor
        assert_eq!(board.drop_distance(&square(4, 18)), 0);
    }

    #[test]
    fn test_drop_distance_is_the_minimum_over_columns() {
        let mut board = Board::empty(10, 20);
        board = fill(&board, 5, 0, Color::Red);
        board = fill(&board, 5, 1, Color::Red);
        // columns 4 and 5 under the square: surface rows 19 and 17
        assert_eq!(board.drop_distance(&square(4, -1)), 17);
    }
}
