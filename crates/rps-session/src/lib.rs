//! Session storage and the match service.
//!
//! This crate handles everything between a decoded command and the
//! session entity:
//!
//! 1. **Storage**: keeping every session for the life of the process,
//!    keyed by id ([`SessionRepository`], [`InMemorySessionRepository`])
//! 2. **Atomicity**: running each mutation as one transaction against
//!    its session, so concurrent requests never interleave
//! 3. **Orchestration**: validating raw input and running the four
//!    match commands ([`MatchService`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)            ← one task per connection, calls MatchService
//!     ↕
//! Session layer (this crate) ← validation, transactions, id minting
//!     ↕
//! Core (below)              ← Session state machine, resolve()
//! ```

mod repository;
mod service;

pub use repository::{InMemorySessionRepository, SessionRepository};
pub use service::MatchService;
