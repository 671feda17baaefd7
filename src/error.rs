use std::path::PathBuf;

/// A move that could not be applied. The grid is left untouched.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} does not exist")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("the game is already over")]
    GameOver,
}

/// Every column is full, there is no move left to choose.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("no legal move left, the board is full")]
pub struct NoLegalMove;

/// A malformed or unexpected message from the remote peer.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ProtocolViolation {
    #[error("malformed message {0:?}")]
    Malformed(String),

    #[error("board dimension {0} is out of range")]
    InvalidDimension(usize),

    #[error("expected the board dimension, got {0:?}")]
    MissingDimension(String),

    #[error("opponent played column {0} out of turn")]
    OutOfTurn(usize),

    #[error("opponent move rejected: {0}")]
    IllegalMove(MoveError),
}

/// Errors that can occur while driving a networked session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("the opponent has not connected yet")]
    NotConnected,

    #[error("it is not the local player's turn")]
    NotYourTurn,

    #[error("the session has already terminated")]
    Terminated,

    #[error("move error: {0}")]
    Move(#[from] MoveError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead { path: PathBuf, source: std::io::Error },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors from the rank bookkeeping collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RankError {
    #[error("I/O error on rank file {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to parse rank file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize ranks: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors that can occur while driving a local or bot game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("move error: {0}")]
    Move(#[from] MoveError),

    #[error(transparent)]
    NoLegalMove(#[from] NoLegalMove),

    #[error("rank error: {0}")]
    Rank(#[from] RankError),
}
