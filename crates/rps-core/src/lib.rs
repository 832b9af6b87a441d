//! Domain core for rock/paper/scissors matches.
//!
//! This crate knows nothing about networking or storage. It defines:
//!
//! - **Model** ([`Move`], [`Outcome`], [`resolve`]): the three legal
//!   choices and the pure rule that ranks one against another.
//! - **Identity** ([`SessionId`], [`PlayerName`]): newtypes for the
//!   values that come in from the outside world.
//! - **Session** ([`Session`], [`MatchState`], [`MatchResult`],
//!   [`SessionSnapshot`]): one match and its lifecycle state machine.
//! - **Errors** ([`MatchError`], [`ErrorKind`]): every way a command
//!   against a match can be rejected.
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (rps)          ← decodes requests, calls the service
//!     ↕
//! Service (rps-session) ← validates input, runs transactions on the repository
//!     ↕
//! Core (this crate)     ← moves, rules, session state machine
//! ```

mod error;
mod ids;
mod model;
mod session;

pub use error::{ErrorKind, MatchError, Operation};
pub use ids::{PlayerName, SessionId};
pub use model::{Move, Outcome, resolve};
pub use session::{
    MatchResult, MatchState, MoveReceipt, Session, SessionSnapshot, TIE_MARKER,
};
