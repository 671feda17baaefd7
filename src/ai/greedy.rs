//! A one-ply greedy bot: win now if possible, otherwise block and prefer the center.
use std::fmt::{Debug, Formatter};

use rand::Rng;

use crate::ai::simple::random_playable_column;
use crate::ai::Bot;
use crate::board::Color;
use crate::error::NoLegalMove;
use crate::grid::Grid;
use crate::win::check_win;

/// Score given to a column that stops the opponent from completing a line.
pub const BLOCK_SCORE: i64 = 1000;
/// Score per column of distance saved towards the center.
pub const CENTER_WEIGHT: i64 = 10;

/// The evaluation of a single playable column.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColumnScore {
    /// Playing here completes a line for the bot.
    WinNow,
    Score(i64),
}

/// Bot that looks exactly one ply ahead.
///
/// Columns are visited in ascending order:
/// * the first column that wins immediately is returned,
/// * otherwise each column scores [BLOCK_SCORE] if the opponent would win there, plus a centering bonus,
/// * the first column with the strictly highest score is returned.
///
/// The random fallback is only reached if no column was scored at all.
pub struct GreedyBot<R: Rng> {
    rng: R,
}

impl<R: Rng> Debug for GreedyBot<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GreedyBot")
    }
}

impl<R: Rng> GreedyBot<R> {
    pub fn new(rng: R) -> Self {
        GreedyBot { rng }
    }
}

impl<R: Rng> Bot for GreedyBot<R> {
    fn select_move(&mut self, grid: &Grid, color: Color) -> Result<usize, NoLegalMove> {
        let fallback = random_playable_column(grid, &mut self.rng)?;

        // trial placements happen on a scratch copy, the caller's grid is never touched
        let mut scratch = grid.clone();
        let mut best: Option<(i64, usize)> = None;

        for column in 0..grid.columns() {
            let score = match column_score(&mut scratch, column, color) {
                None => continue,
                Some(ColumnScore::WinNow) => {
                    log::debug!("{} wins immediately in column {}", color, column);
                    return Ok(column);
                }
                Some(ColumnScore::Score(score)) => score,
            };

            log::trace!("column {} scores {} for {}", column, score, color);
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, column));
            }
        }

        match best {
            Some((score, column)) => {
                log::debug!("{} picks column {} with score {}", color, column, score);
                Ok(column)
            }
            None => Ok(fallback),
        }
    }
}

/// Evaluate playing `column` for `color`, `None` if the column is not playable.
/// `grid` is restored to its original state before returning.
pub fn column_score(grid: &mut Grid, column: usize, color: Color) -> Option<ColumnScore> {
    if !grid.is_column_playable(column) {
        return None;
    }
    let row = grid.landing_row(column)?;

    if grid.with_trial(row, column, color, |g| check_win(g, row, column, color)) {
        return Some(ColumnScore::WinNow);
    }

    let opponent = color.other();
    let block = grid.with_trial(row, column, opponent, |g| check_win(g, row, column, opponent));

    let block_score = if block { BLOCK_SCORE } else { 0 };
    Some(ColumnScore::Score(block_score + center_bonus(grid.columns(), column)))
}

/// `(cols/2 - |column - cols/2|) * CENTER_WEIGHT`, with `cols/2` rounded down.
pub fn center_bonus(columns: usize, column: usize) -> i64 {
    let center = (columns / 2) as i64;
    (center - (column as i64 - center).abs()) * CENTER_WEIGHT
}
