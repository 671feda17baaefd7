use std::fmt::{Display, Formatter};

/// One of the two piece colors. Yellow always moves first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Color {
    Yellow,
    Red,
}

/// A column-drop move, the row it lands on is decided by the grid.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Move {
    pub column: usize,
    pub color: Color,
}

/// The state of a game, recomputed after every move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GameOutcome {
    InProgress,
    Win(Color),
    /// The last empty cell was filled without completing a line.
    Draw,
    /// The game was abandoned without a verdict, by a lost connection or a local abort.
    Disconnected,
}

/// Events emitted by the input collaborator.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Input {
    ColumnSelected(usize),
    Abort,
}

/// Events consumed by the rendering collaborator.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GameEvent {
    BoardChanged { mv: Move, row: usize },
    TurnChanged(Color),
    GameEnded(GameOutcome),
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::Yellow, Color::Red];

    pub fn other(self) -> Color {
        match self {
            Color::Yellow => Color::Red,
            Color::Red => Color::Yellow,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Yellow => "Yellow",
            Color::Red => "Red",
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Color::Yellow => 'Y',
            Color::Red => 'R',
        }
    }
}

impl Move {
    pub fn new(column: usize, color: Color) -> Self {
        Move { column, color }
    }
}

impl GameOutcome {
    pub fn is_done(self) -> bool {
        self != GameOutcome::InProgress
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameOutcome::Win(color) => Some(color),
            _ => None,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.color.to_char(), self.column)
    }
}

impl Display for GameOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::InProgress => write!(f, "in progress"),
            GameOutcome::Win(color) => write!(f, "{} wins", color),
            GameOutcome::Draw => write!(f, "draw"),
            GameOutcome::Disconnected => write!(f, "disconnected"),
        }
    }
}
