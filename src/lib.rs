#![warn(missing_debug_implementations)]
#![allow(clippy::new_without_default)]

//! A Connect Four engine on a variable sized [Grid](crate::grid::Grid), playable in three modes.
//!
//! # Features
//!
//! * Local two player games, driven by [TurnController](crate::controller::TurnController).
//! * Games against [GreedyBot](crate::ai::greedy::GreedyBot), a one-ply bot that wins when it can,
//!     blocks when it must and otherwise prefers the center, see [BotGame](crate::bot_game::BotGame).
//!     Finished games are credited to the player through a [RankStore](crate::rank::RankStore).
//! * Peer-to-peer games over TCP with [NetworkSession](crate::net::NetworkSession):
//!     the host sends the board size, then both sides exchange moves until someone reports a win
//!     or the connection drops.
//!
//! Line detection is shared by all modes, see [check_win](crate::win::check_win).
//!
//! # Examples
//!
//! ## Play a local game until someone wins.
//!
//! ```
//! # use connect_four::board::{Color, GameOutcome};
//! # use connect_four::controller::TurnController;
//! # use connect_four::grid::Grid;
//! let mut controller = TurnController::new(Grid::with_columns(7).unwrap());
//!
//! for column in [3, 4, 3, 4, 3, 4] {
//!     assert!(controller.submit_move(column).applied);
//! }
//!
//! let result = controller.submit_move(3);
//! assert_eq!(result.outcome, GameOutcome::Win(Color::Yellow));
//! println!("{}", controller.grid());
//! ```
//!
//! ## Ask the bot for a move
//!
//! ```
//! # use connect_four::ai::Bot;
//! # use connect_four::ai::greedy::GreedyBot;
//! # use connect_four::board::Color;
//! # use connect_four::grid::Grid;
//! # use connect_four::util::board_gen::grid_with_moves;
//! let grid = grid_with_moves(Grid::with_columns(7).unwrap(), Color::Yellow, &[1, 6, 2, 6, 3]);
//!
//! let mut bot = GreedyBot::new(rand::thread_rng());
//! assert_eq!(bot.select_move(&grid, Color::Red), Ok(4));
//! ```

pub mod board;
pub mod error;
pub mod grid;
pub mod symmetry;
pub mod win;

pub mod ai;

pub mod bot_game;
pub mod controller;

pub mod net;

pub mod config;
pub mod rank;

pub mod util;
