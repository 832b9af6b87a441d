//! `RpsServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → match service.

use std::sync::Arc;
use std::time::Duration;

use rps_protocol::{Codec, JsonCodec};
use rps_session::{InMemorySessionRepository, MatchService, SessionRepository};
use rps_transport::{
    Handshake, Transport, WebSocketConnection, WebSocketHandshake, WebSocketTransport,
};

use crate::handler::handle_connection;
use crate::{RpsError, ServerConfig};

/// Shared state handed to every connection task.
///
/// Nothing in here needs a lock: the service synchronises through its
/// repository, and the codec and config are read-only.
pub(crate) struct ServerState<R: SessionRepository, C: Codec> {
    pub(crate) service: MatchService<R>,
    pub(crate) codec: C,
    pub(crate) config: ServerConfig,
}

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use rps::prelude::*;
///
/// # async fn run() -> Result<(), RpsError> {
/// let server = RpsServer::builder()
///     .bind("0.0.0.0:8080")
///     .idle_timeout(Duration::from_secs(60))
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RpsServerBuilder {
    config: ServerConfig,
}

impl RpsServerBuilder {
    /// Creates a builder with [`ServerConfig::default`] settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets how long a silent connection is kept open.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener with a fresh in-memory repository.
    pub async fn build(self) -> Result<RpsServer, RpsError> {
        self.build_with(InMemorySessionRepository::new()).await
    }

    /// Binds the listener with the given repository.
    pub async fn build_with<R: SessionRepository>(
        self,
        repository: R,
    ) -> Result<RpsServer<R>, RpsError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;

        let state = Arc::new(ServerState {
            service: MatchService::new(repository),
            codec: JsonCodec,
            config: self.config,
        });

        Ok(RpsServer { transport, state })
    }
}

/// A bound server. Call [`run()`](Self::run) to start accepting
/// connections.
pub struct RpsServer<R: SessionRepository = InMemorySessionRepository, C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<R, C>>,
}

impl RpsServer {
    /// Creates a new builder.
    pub fn builder() -> RpsServerBuilder {
        RpsServerBuilder::new()
    }
}

impl<R, C> RpsServer<R, C>
where
    R: SessionRepository,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns the match service the server dispatches to.
    pub fn service(&self) -> &MatchService<R> {
        &self.state.service
    }

    /// Runs the accept loop, spawning one handler task per connection.
    ///
    /// The WebSocket upgrade runs inside the spawned task and is bounded
    /// by the idle timeout, so a peer that never sends its upgrade
    /// request can't hold up later connections. Runs until the process
    /// is terminated. A failed accept is logged and the loop carries on.
    pub async fn run(mut self) -> Result<(), RpsError> {
        tracing::info!(
            addr = %self.display_addr(),
            idle_timeout = ?self.state.config.idle_timeout,
            "rps server running"
        );

        loop {
            match self.transport.accept().await {
                Ok(handshake) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        let Some(conn) = upgrade(handshake, &state.config).await else {
                            return;
                        };
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }

    fn display_addr(&self) -> String {
        self.local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| self.state.config.bind_addr.clone())
    }
}

/// Completes the WebSocket upgrade within the idle timeout.
async fn upgrade(
    handshake: WebSocketHandshake,
    config: &ServerConfig,
) -> Option<WebSocketConnection> {
    let peer = handshake.peer_addr();
    match tokio::time::timeout(config.idle_timeout, handshake.complete()).await {
        Ok(Ok(conn)) => Some(conn),
        Ok(Err(e)) => {
            tracing::debug!(%peer, error = %e, "handshake failed");
            None
        }
        Err(_) => {
            tracing::info!(%peer, "handshake timed out");
            None
        }
    }
}
