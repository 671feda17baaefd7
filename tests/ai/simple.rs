use connect_four::ai::simple::RandomBot;
use connect_four::ai::Bot;
use connect_four::board::Color;
use connect_four::error::NoLegalMove;
use connect_four::grid::Grid;
use connect_four::util::board_gen::grid_with_moves;
use connect_four::util::tiny::consistent_rng;

use crate::util::{test_sampler_uniform, DRAW_4X4};

#[test]
fn random_skips_full_columns() {
    let grid = grid_with_moves(Grid::square(4).unwrap(), Color::Yellow, &[1, 1, 1, 1]);
    let mut bot = RandomBot::new(consistent_rng());

    test_sampler_uniform(&[0, 2, 3], || bot.select_move(&grid, Color::Yellow).ok());
}

#[test]
fn random_on_full_grid() {
    let grid = grid_with_moves(Grid::square(4).unwrap(), Color::Yellow, &DRAW_4X4);
    let mut bot = RandomBot::new(consistent_rng());

    assert_eq!(Err(NoLegalMove), bot.select_move(&grid, Color::Red));
}
