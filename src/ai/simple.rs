//! A bot that picks a uniformly random playable column.
use std::fmt::{Debug, Formatter};

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::ai::Bot;
use crate::board::Color;
use crate::error::NoLegalMove;
use crate::grid::Grid;

/// Bot that chooses moves randomly uniformly among playable columns.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> Debug for RandomBot<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RandomBot")
    }
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        RandomBot { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn select_move(&mut self, grid: &Grid, _: Color) -> Result<usize, NoLegalMove> {
        random_playable_column(grid, &mut self.rng)
    }
}

/// Pick a random playable column with a uniform distribution.
pub fn random_playable_column(grid: &Grid, rng: &mut impl Rng) -> Result<usize, NoLegalMove> {
    grid.playable_columns().choose(rng).ok_or(NoLegalMove)
}
