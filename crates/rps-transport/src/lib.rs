//! Transport abstraction layer for the rps server.
//!
//! Provides the [`Transport`] and [`Connection`] traits so the server's
//! accept loop and connection handler only deal in whole frames of
//! bytes, never in a particular socket library.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketHandshake, WebSocketTransport};

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;

/// Opaque identifier for a connection, used to tie log lines together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
///
/// Accepting is split in two. [`accept`](Self::accept) only takes the
/// next socket off the listener and returns a [`Handshake`]; the
/// protocol upgrade runs in [`Handshake::complete`], so a peer that
/// never finishes it holds up its own task and nobody else.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;

    /// A socket that still has to complete the protocol upgrade.
    type Handshake: Handshake<Connection = Self::Connection>;

    /// Waits for the next incoming socket.
    fn accept(
        &mut self,
    ) -> impl Future<Output = Result<Self::Handshake, TransportError>> + Send;

    /// The address the transport is listening on.
    fn local_addr(&self) -> std::io::Result<SocketAddr>;
}

/// An accepted socket whose upgrade hasn't run yet.
pub trait Handshake: Send + 'static {
    /// The connection produced once the upgrade succeeds.
    type Connection: Connection;

    /// The remote address of the socket.
    fn peer_addr(&self) -> SocketAddr;

    /// Runs the upgrade. Callers bound this with a timeout.
    fn complete(
        self,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// A single connection that carries whole frames in both directions.
pub trait Connection: Send + Sync + 'static {
    /// Sends one frame to the remote peer.
    fn send(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Receives the next frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the peer closed the connection cleanly.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;

    /// Closes the connection.
    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
