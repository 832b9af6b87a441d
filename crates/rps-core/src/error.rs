//! Error types for match commands.
//!
//! Every error here is a deterministic consequence of the input and the
//! current session state. None of them is transient, so callers should
//! report them rather than retry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MatchState, SessionId};

/// The command a rejected request was trying to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Join,
    SubmitMove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Join => write!(f, "join"),
            Self::SubmitMove => write!(f, "submit a move"),
        }
    }
}

/// Errors that can occur while running a command against a match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The player name is missing, blank, or not acceptable for this
    /// command. The payload says which.
    #[error("invalid player name: {0}")]
    InvalidPlayerName(String),

    /// The move token isn't one of rock, paper, or scissors.
    #[error("invalid move {0:?}: must be rock, paper, or scissors")]
    InvalidMove(String),

    /// The named player is neither participant of the match.
    #[error("player {player:?} is not part of match {session_id}")]
    InvalidPlayer {
        session_id: SessionId,
        player: String,
    },

    /// No match exists with this id.
    #[error("match {0} not found")]
    NotFound(SessionId),

    /// The match's lifecycle state doesn't allow this command.
    #[error("cannot {operation} match {session_id}: match is {state}")]
    InvalidState {
        session_id: SessionId,
        state: MatchState,
        operation: Operation,
    },
}

impl MatchError {
    /// The error's kind, for mapping to a transport-level status.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPlayerName(_) => ErrorKind::InvalidPlayerName,
            Self::InvalidMove(_) => ErrorKind::InvalidMove,
            Self::InvalidPlayer { .. } => ErrorKind::InvalidPlayer,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }
}

/// Fieldless mirror of [`MatchError`]'s variants.
///
/// `BadRequest` has no `MatchError` counterpart: it's reserved for requests
/// the transport couldn't decode at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    BadRequest,
    InvalidPlayerName,
    InvalidMove,
    InvalidPlayer,
    NotFound,
    InvalidState,
}
