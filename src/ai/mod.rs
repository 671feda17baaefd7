use std::fmt::Debug;

use crate::board::Color;
use crate::error::NoLegalMove;
use crate::grid::Grid;

pub mod greedy;
pub mod simple;

pub trait Bot: Debug {
    /// Pick a column to play for `color`. Fails only if every column is full.
    ///
    /// `self` is mutable to allow for random state, this method is not supposed to
    /// modify `self` in any other significant way.
    fn select_move(&mut self, grid: &Grid, color: Color) -> Result<usize, NoLegalMove>;
}

impl<B: Bot + ?Sized> Bot for Box<B> {
    fn select_move(&mut self, grid: &Grid, color: Color) -> Result<usize, NoLegalMove> {
        (**self).select_move(grid, color)
    }
}
