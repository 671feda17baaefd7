//! The two-peer protocol: a host and a client exchanging moves over a TCP connection.
//!
//! The host accepts exactly one client, sends the board dimension and plays Yellow, moving first.
//! After that both sides send the column of every move they make, and the winner follows its
//! winning move with a game over message. Closing the connection ends the session on both sides.

pub mod message;
pub mod session;

pub use session::{NetworkSession, Role, SessionEnd, SessionEvent};
