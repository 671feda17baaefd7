//! A human playing against a bot, with rank bookkeeping once the game is decided.
use std::thread;
use std::time::Duration;

use crate::ai::Bot;
use crate::board::{Color, GameEvent, GameOutcome, Input};
use crate::controller::TurnController;
use crate::error::GameError;
use crate::grid::Grid;
use crate::rank::{RankStore, BOT_WIN_POINTS, HUMAN_WIN_POINTS};

/// The human plays Yellow and moves first, the bot answers as Red.
#[derive(Debug)]
pub struct BotGame<B: Bot, S: RankStore> {
    controller: TurnController,
    bot: B,
    ranks: S,
    username: String,
    delay: Duration,
    recorded: bool,
}

impl<B: Bot, S: RankStore> BotGame<B, S> {
    pub const HUMAN: Color = Color::Yellow;
    pub const BOT: Color = Color::Red;

    /// `delay` is waited before every bot move, purely for pacing.
    pub fn new(grid: Grid, bot: B, ranks: S, username: &str, delay: Duration) -> Self {
        BotGame {
            controller: TurnController::new(grid),
            bot,
            ranks,
            username: username.to_owned(),
            delay,
            recorded: false,
        }
    }

    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    pub fn grid(&self) -> &Grid {
        self.controller.grid()
    }

    pub fn outcome(&self) -> GameOutcome {
        self.controller.outcome()
    }

    pub fn ranks(&self) -> &S {
        &self.ranks
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn handle(&mut self, input: Input) -> Result<Vec<GameEvent>, GameError> {
        match input {
            Input::ColumnSelected(column) => self.human_move(column),
            Input::Abort => Ok(self.controller.handle(Input::Abort)),
        }
    }

    fn human_move(&mut self, column: usize) -> Result<Vec<GameEvent>, GameError> {
        if self.controller.active_color() != Some(Self::HUMAN) {
            return Ok(vec![]);
        }

        let (row, outcome) = match self.controller.try_submit_move(column) {
            Ok(result) => result,
            Err(e) => {
                log::debug!("rejected column {} from {}: {}", column, self.username, e);
                return Ok(vec![]);
            }
        };
        let mut events = self.controller.move_events(row, outcome);

        if outcome == GameOutcome::InProgress {
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            events.extend(self.bot_move()?);
        }

        self.record_outcome()?;
        Ok(events)
    }

    fn bot_move(&mut self) -> Result<Vec<GameEvent>, GameError> {
        let column = self.bot.select_move(self.controller.grid(), Self::BOT)?;
        let (row, outcome) = self.controller.try_submit_move(column)?;
        Ok(self.controller.move_events(row, outcome))
    }

    fn record_outcome(&mut self) -> Result<(), GameError> {
        if self.recorded {
            return Ok(());
        }

        if let GameOutcome::Win(winner) = self.controller.outcome() {
            let points = if winner == Self::HUMAN {
                HUMAN_WIN_POINTS
            } else {
                BOT_WIN_POINTS
            };
            self.recorded = true;
            self.ranks.record_win(&self.username, points)?;
            log::info!("{} wins, {} gets {} points", winner, self.username, points);
        }

        Ok(())
    }
}
