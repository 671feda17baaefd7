//! Four-in-a-row detection around a single cell.
use crate::board::Color;
use crate::grid::Grid;

/// The length of a winning line.
pub const LINE_LENGTH: usize = 4;

/// The four axes as `(row, col)` steps: horizontal, vertical, diagonal ↘ and diagonal ↗.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

/// Whether a piece of `color` at `(row, col)` is part of a line of at least [LINE_LENGTH].
///
/// The cell itself is assumed to hold `color`, it is not inspected.
/// This means the function also answers hypothetical placements on a trial grid.
pub fn check_win(grid: &Grid, row: usize, col: usize, color: Color) -> bool {
    AXES.iter().any(|&(dr, dc)| {
        let count = 1 + run_length(grid, row, col, dr, dc, color) + run_length(grid, row, col, -dr, -dc, color);
        count >= LINE_LENGTH
    })
}

/// The number of consecutive `color` cells starting next to `(row, col)` in direction `(dr, dc)`.
fn run_length(grid: &Grid, row: usize, col: usize, dr: isize, dc: isize, color: Color) -> usize {
    let mut count = 0;
    let mut r = row as isize + dr;
    let mut c = col as isize + dc;

    while r >= 0 && c >= 0 && (r as usize) < grid.rows() && (c as usize) < grid.columns() {
        if grid.cell(r as usize, c as usize) != Some(color) {
            break;
        }
        count += 1;
        r += dr;
        c += dc;
    }

    count
}
