//! # rps
//!
//! A rock/paper/scissors match server.
//!
//! Players create a match, share its id, join it, and submit moves over a
//! WebSocket connection speaking the JSON protocol in [`rps_protocol`].
//! The server is only a transport: every rule lives in [`rps_core`] and
//! every transaction in [`rps_session`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rps::prelude::*;
//!
//! # async fn run() -> Result<(), RpsError> {
//! rps::init_tracing();
//! let server = RpsServer::builder().bind("0.0.0.0:8080").build().await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{BIND_ADDR_VAR, IDLE_TIMEOUT_VAR, ServerConfig};
pub use error::RpsError;
pub use server::{RpsServer, RpsServerBuilder};

/// Installs a `tracing` subscriber that writes to stderr, filtered by
/// `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Everything needed to run a server or talk to one.
pub mod prelude {
    pub use crate::{RpsError, RpsServer, RpsServerBuilder, ServerConfig};
    pub use rps_core::{
        ErrorKind, MatchError, MatchResult, MatchState, Move, SessionId,
        SessionSnapshot,
    };
    pub use rps_protocol::{Codec, Envelope, JsonCodec, Request, Response};
    pub use rps_session::{
        InMemorySessionRepository, MatchService, SessionRepository,
    };
}
