//! Wire protocol for the rps server.
//!
//! This crate defines what clients and the server exchange:
//!
//! - **Types** ([`Envelope`], [`Request`], [`Response`]): the messages
//!   that travel on the wire, one per frame.
//! - **Status codes** ([`status_code`]): how each error kind is reported.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how messages become
//!   bytes and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! The protocol layer holds no match logic. It only names the four match
//! commands and their results so the server can hand them to the
//! session service.
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope<Request>) → MatchService
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Envelope, Request, Response, status_code};
