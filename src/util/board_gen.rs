//! Utilities to build a `Grid` in a given state.
use rand::Rng;

use crate::ai::simple::random_playable_column;
use crate::board::{Color, GameOutcome};
use crate::controller::TurnController;
use crate::grid::Grid;

/// Play the given columns on `start`, alternating colors starting with `first`.
/// Panics if a column is not playable, line completion is not checked.
pub fn grid_with_moves(start: Grid, first: Color, columns: &[usize]) -> Grid {
    let mut grid = start;
    let mut color = first;
    for &column in columns {
        assert!(
            grid.is_column_playable(column),
            "Column not playable, playing {} on\n{}",
            column,
            grid
        );
        grid.apply_move(column, color).unwrap();
        color = color.other();
    }
    grid
}

/// Play `n` random moves from an empty game, retrying until no line was completed along the way.
pub fn random_game_with_moves(start: &Grid, n: usize, rng: &mut impl Rng) -> TurnController {
    'new_try: loop {
        let mut controller = TurnController::new(start.clone());
        for _ in 0..n {
            let column = match random_playable_column(controller.grid(), rng) {
                Ok(column) => column,
                Err(_) => continue 'new_try,
            };
            if controller.submit_move(column).outcome != GameOutcome::InProgress {
                continue 'new_try;
            }
        }
        return controller;
    }
}
