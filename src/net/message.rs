//! The plain ASCII wire messages exchanged between the two peers.
//!
//! Every message is a single line, the trailing `\n` is the frame delimiter and is not part of the message.
use std::fmt::{Display, Formatter};

use crate::error::ProtocolViolation;

pub const GAME_OVER_PREFIX: &str = "GAME OVER:";

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Message {
    /// Sent once by the host right after accepting: the board is `n x n`.
    Dimension(usize),
    /// The sender played this column.
    Move(usize),
    /// The sender has won, the text describes the winner.
    GameOver(String),
}

/// The shape of a line before the session decides what a bare integer means.
#[derive(Debug, Clone, Eq, PartialEq)]
enum Frame<'a> {
    Number(usize),
    GameOver(&'a str),
}

impl Message {
    /// Build a game over message, newlines in `text` are replaced so the frame stays intact.
    pub fn game_over(text: &str) -> Message {
        Message::GameOver(single_line(text))
    }

    /// Parse the first line the host sends.
    pub fn parse_dimension(line: &str) -> Result<usize, ProtocolViolation> {
        match parse_frame(line)? {
            Frame::Number(n) => Ok(n),
            Frame::GameOver(_) => Err(ProtocolViolation::MissingDimension(line.trim_end().to_owned())),
        }
    }

    /// Parse any line after the handshake.
    pub fn parse(line: &str) -> Result<Message, ProtocolViolation> {
        match parse_frame(line)? {
            Frame::Number(column) => Ok(Message::Move(column)),
            Frame::GameOver(text) => Ok(Message::GameOver(text.to_owned())),
        }
    }

    /// The message followed by the frame delimiter.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Dimension(n) => write!(f, "{}", n),
            Message::Move(column) => write!(f, "{}", column),
            Message::GameOver(text) => write!(f, "{} {}", GAME_OVER_PREFIX, single_line(text)),
        }
    }
}

/// Line breaks would split the frame, they are sent as spaces.
fn single_line(text: &str) -> String {
    text.replace(|c: char| c == '\r' || c == '\n', " ")
}

fn parse_frame(line: &str) -> Result<Frame, ProtocolViolation> {
    let trimmed = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    parse::frame()(trimmed)
        .map(|(_, frame)| frame)
        .map_err(|_| ProtocolViolation::Malformed(trimmed.to_owned()))
}

mod parse {
    use nom::branch::alt;
    use nom::bytes::complete::{tag, take_while};
    use nom::character::complete::{digit1, space0};
    use nom::combinator::{eof, map, map_res};
    use nom::sequence::{preceded, terminated};
    use nom::IResult;

    use super::*;

    pub(super) fn frame<'a>() -> impl FnMut(&'a str) -> IResult<&'a str, Frame<'a>> {
        let number = map(map_res(digit1, |s: &str| s.parse::<usize>()), Frame::Number);

        let game_over = map(
            preceded(tag(GAME_OVER_PREFIX), preceded(space0, take_while(|_| true))),
            |text: &str| Frame::GameOver(text.trim_end()),
        );

        terminated(alt((number, game_over)), eof)
    }
}
