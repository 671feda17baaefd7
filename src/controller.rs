//! The turn state machine shared by the local and bot modes.
use crate::board::{Color, GameEvent, GameOutcome, Input, Move};
use crate::error::MoveError;
use crate::grid::Grid;
use crate::win::check_win;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TurnState {
    WaitingForMove(Color),
    /// Terminal, no further moves are accepted.
    Finished(GameOutcome),
}

/// The result of [TurnController::submit_move].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MoveResult {
    pub applied: bool,
    pub outcome: GameOutcome,
}

/// Tracks whose turn it is and applies moves to the grid.
///
/// A move is applied as a single unit: cell write, win check and state transition.
#[derive(Debug, Clone)]
pub struct TurnController {
    grid: Grid,
    state: TurnState,
    history: Vec<Move>,
}

impl TurnController {
    /// Start a game on `grid` with Yellow to move.
    pub fn new(grid: Grid) -> Self {
        TurnController {
            grid,
            state: TurnState::WaitingForMove(Color::Yellow),
            history: vec![],
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// The moves applied so far, in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The color to move, `None` once the game is finished.
    pub fn active_color(&self) -> Option<Color> {
        match self.state {
            TurnState::WaitingForMove(color) => Some(color),
            TurnState::Finished(_) => None,
        }
    }

    pub fn outcome(&self) -> GameOutcome {
        match self.state {
            TurnState::WaitingForMove(_) => GameOutcome::InProgress,
            TurnState::Finished(outcome) => outcome,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, TurnState::Finished(_))
    }

    /// Play `column` for the active color. Rejected moves leave the state unchanged.
    pub fn submit_move(&mut self, column: usize) -> MoveResult {
        match self.try_submit_move(column) {
            Ok((_, outcome)) => MoveResult { applied: true, outcome },
            Err(e) => {
                log::debug!("rejected column {}: {}", column, e);
                MoveResult {
                    applied: false,
                    outcome: self.outcome(),
                }
            }
        }
    }

    /// Play `column` for the active color and return the row it landed on and the new outcome.
    pub fn try_submit_move(&mut self, column: usize) -> Result<(usize, GameOutcome), MoveError> {
        let color = match self.state {
            TurnState::WaitingForMove(color) => color,
            TurnState::Finished(_) => return Err(MoveError::GameOver),
        };

        let row = self.grid.apply_move(column, color)?;
        self.history.push(Move::new(column, color));

        let outcome = if check_win(&self.grid, row, column, color) {
            GameOutcome::Win(color)
        } else if self.grid.is_full() {
            GameOutcome::Draw
        } else {
            GameOutcome::InProgress
        };

        self.state = match outcome {
            GameOutcome::InProgress => TurnState::WaitingForMove(color.other()),
            _ => TurnState::Finished(outcome),
        };

        log::debug!("{} played column {} (row {}), {}", color, column, row, outcome);
        Ok((row, outcome))
    }

    /// Abandon the game, nothing happens if it is already finished.
    pub fn abort(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.state = TurnState::Finished(GameOutcome::Disconnected);
        true
    }

    /// Local two-player entry point: translate an input event into game events.
    pub fn handle(&mut self, input: Input) -> Vec<GameEvent> {
        match input {
            Input::ColumnSelected(column) => match self.try_submit_move(column) {
                Ok((row, outcome)) => self.move_events(row, outcome),
                Err(e) => {
                    log::debug!("rejected column {}: {}", column, e);
                    vec![]
                }
            },
            Input::Abort => {
                if self.abort() {
                    vec![GameEvent::GameEnded(GameOutcome::Disconnected)]
                } else {
                    vec![]
                }
            }
        }
    }

    /// The events describing the move that was just applied.
    pub(crate) fn move_events(&self, row: usize, outcome: GameOutcome) -> Vec<GameEvent> {
        let mut events = vec![];
        if let Some(&mv) = self.history.last() {
            events.push(GameEvent::BoardChanged { mv, row });
        }
        match self.state {
            TurnState::WaitingForMove(next) => events.push(GameEvent::TurnChanged(next)),
            TurnState::Finished(_) => events.push(GameEvent::GameEnded(outcome)),
        }
        events
    }
}
