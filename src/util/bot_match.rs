//! Run two bots against each other and report the results.
use std::fmt::{Debug, Formatter};

use crate::ai::Bot;
use crate::board::{Color, GameOutcome, Move};
use crate::controller::TurnController;
use crate::grid::Grid;

/// Play `games` games of `bot_l` against `bot_r` on grids produced by `start`.
/// If `both_sides` is true the bots swap colors every other game, Yellow always moves first.
pub fn run<L: Bot, R: Bot>(
    start: impl Fn() -> Grid,
    bot_l: &mut L,
    bot_r: &mut R,
    games: u32,
    both_sides: bool,
) -> MatchResult {
    let mut result = MatchResult::default();

    for game_i in 0..games {
        let color_l = if both_sides && game_i % 2 == 1 {
            Color::Red
        } else {
            Color::Yellow
        };

        let replay = play_single_game(start(), color_l, bot_l, bot_r);
        match replay.outcome {
            GameOutcome::Win(winner) if winner == color_l => result.wins_l += 1,
            GameOutcome::Win(_) => result.wins_r += 1,
            _ => result.draws += 1,
        }
        result.total_moves += replay.moves.len() as u32;
        result.game_count += 1;
    }

    result
}

/// Play a single game and return its moves and outcome.
pub fn play_single_game(start: Grid, color_l: Color, bot_l: &mut impl Bot, bot_r: &mut impl Bot) -> Replay {
    let mut controller = TurnController::new(start);

    while let Some(color) = controller.active_color() {
        let selected = if color == color_l {
            bot_l.select_move(controller.grid(), color)
        } else {
            bot_r.select_move(controller.grid(), color)
        };

        // an active controller always has a playable column, otherwise it would have ended in a draw
        let column = match selected {
            Ok(column) => column,
            Err(_) => break,
        };
        let result = controller.submit_move(column);
        assert!(result.applied, "{:?} selected unplayable column {}", color, column);
    }

    Replay {
        color_l,
        moves: controller.history().to_vec(),
        outcome: controller.outcome(),
    }
}

#[derive(Debug, Clone)]
pub struct Replay {
    pub color_l: Color,
    pub moves: Vec<Move>,
    pub outcome: GameOutcome,
}

/// Structure returned by the function [`run`].
#[derive(Default, Clone)]
pub struct MatchResult {
    pub game_count: u32,
    pub wins_l: u32,
    pub wins_r: u32,
    pub draws: u32,
    pub total_moves: u32,
}

impl MatchResult {
    pub fn average_game_length(&self) -> f32 {
        self.total_moves as f32 / self.game_count.max(1) as f32
    }
}

impl Debug for MatchResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "MatchResult {{")?;
        writeln!(f, "  {} games, average length {}", self.game_count, self.average_game_length())?;
        writeln!(f, "  left {} / draw {} / right {}", self.wins_l, self.draws, self.wins_r)?;
        writeln!(f, "}}")
    }
}
