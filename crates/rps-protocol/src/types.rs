//! Message types for the rps wire format.
//!
//! Every frame is one [`Envelope`]. Clients send `Envelope<Request>`;
//! the server answers each with exactly one `Envelope<Response>` carrying
//! the same `seq`, so a client can pipeline requests and still pair up
//! the answers.

use rps_core::{
    ErrorKind, MatchError, MatchResult, MoveReceipt, SessionId,
    SessionSnapshot,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The top-level wire wrapper.
///
/// ```json
/// { "seq": 7, "body": { "type": "GetMatch", "session_id": "game-…" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Chosen by the client, echoed by the server.
    pub seq: u64,

    /// The request or response.
    pub body: T,
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Client → Server messages.
///
/// Internally tagged: `{ "type": "CreateMatch", "player_name": "Alice" }`.
///
/// Player names and move tokens default to the empty string when a client
/// leaves them out. The service then rejects them as
/// `InvalidPlayerName`/`InvalidMove` rather than the whole frame failing
/// to decode, so clients get the specific error kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Start a new match as player one.
    CreateMatch {
        #[serde(default)]
        player_name: String,
    },

    /// Take the second seat in a waiting match.
    JoinMatch {
        session_id: SessionId,
        #[serde(default)]
        player_name: String,
    },

    /// Submit (or, before the opponent moves, replace) a move.
    SubmitMove {
        session_id: SessionId,
        #[serde(default)]
        player_name: String,
        #[serde(rename = "move", default)]
        move_token: String,
    },

    /// Read a match's current state.
    GetMatch { session_id: SessionId },

    /// Keep-alive. Resets the server's idle timer.
    Ping { client_time: u64 },

    /// "I'm done." The server closes the connection without replying.
    Disconnect {
        #[serde(default)]
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Server → Client messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// A new match exists; share `session_id` with the opponent.
    MatchCreated { session_id: SessionId },

    /// The second player is seated and the match is in progress.
    MatchJoined {
        session_id: SessionId,
        player_name: String,
    },

    /// The move was recorded. `finished` is `true` when it completed the
    /// pair, in which case `result` is set.
    MoveAccepted {
        session_id: SessionId,
        finished: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<MatchResult>,
    },

    /// The current state of a match.
    Match { session: SessionSnapshot },

    /// Answer to [`Request::Ping`]. `server_time` is milliseconds since
    /// the connection was accepted.
    Pong { client_time: u64, server_time: u64 },

    /// The request was rejected. `code` follows HTTP conventions; see
    /// [`status_code`].
    Error {
        code: u16,
        kind: ErrorKind,
        message: String,
    },
}

impl Response {
    /// Builds an `Error` response for `kind`.
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            code: status_code(kind),
            kind,
            message: message.into(),
        }
    }

    /// Builds the `MoveAccepted` response for a successful submission.
    pub fn move_accepted(session_id: SessionId, receipt: MoveReceipt) -> Self {
        let result = match receipt {
            MoveReceipt::AwaitingOpponent => None,
            MoveReceipt::Resolved(result) => Some(result),
        };
        Self::MoveAccepted {
            session_id,
            finished: result.is_some(),
            result,
        }
    }
}

impl From<&MatchError> for Response {
    fn from(err: &MatchError) -> Self {
        Self::error(err.kind(), err.to_string())
    }
}

/// The HTTP-style status code reported for each error kind.
///
/// | kind | code |
/// |---|---|
/// | `BadRequest`, `InvalidPlayerName`, `InvalidMove` | 400 |
/// | `InvalidPlayer` | 403 |
/// | `NotFound` | 404 |
/// | `InvalidState` | 409 |
pub fn status_code(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::BadRequest
        | ErrorKind::InvalidPlayerName
        | ErrorKind::InvalidMove => 400,
        ErrorKind::InvalidPlayer => 403,
        ErrorKind::NotFound => 404,
        ErrorKind::InvalidState => 409,
    }
}
