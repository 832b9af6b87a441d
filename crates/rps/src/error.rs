//! Unified error type for the rps server.

use rps_core::MatchError;
use rps_protocol::ProtocolError;
use rps_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// `#[from]` on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum RpsError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A rejected match command.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// A configuration value couldn't be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}
