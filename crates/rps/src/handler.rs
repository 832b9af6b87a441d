//! Per-connection handler: one request in, one response out.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]. The loop is:
//!   1. Receive a frame, or give up after the idle timeout
//!   2. Decode an `Envelope<Request>`; on failure reply `BadRequest`
//!   3. Dispatch to the match service
//!   4. Send the `Envelope<Response>` back with the request's `seq`

use std::sync::Arc;
use std::time::Instant;

use rps_core::ErrorKind;
use rps_protocol::{Codec, Envelope, Request, Response};
use rps_session::SessionRepository;
use rps_transport::{Connection, WebSocketConnection};

use crate::RpsError;
use crate::server::ServerState;

/// `seq` used when replying to a frame that couldn't be decoded.
const UNKNOWN_SEQ: u64 = 0;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<R, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<R, C>>,
) -> Result<(), RpsError>
where
    R: SessionRepository,
    C: Codec,
{
    let conn_id = conn.id();
    let start = Instant::now();
    tracing::info!(%conn_id, "connection opened");

    loop {
        let data = match tokio::time::timeout(
            state.config.idle_timeout,
            conn.recv(),
        )
        .await
        {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%conn_id, "connection timed out");
                let _ = conn.close().await;
                break;
            }
        };

        let envelope: Envelope<Request> = match state.codec.decode(&data) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode envelope");
                let body = Response::error(ErrorKind::BadRequest, e.to_string());
                reply(&conn, &state.codec, UNKNOWN_SEQ, body).await?;
                continue;
            }
        };

        let seq = envelope.seq;
        let Some(body) = dispatch(&state, envelope.body, &start).await else {
            let _ = conn.close().await;
            break;
        };
        reply(&conn, &state.codec, seq, body).await?;
    }

    tracing::info!(%conn_id, "connection finished");
    Ok(())
}

/// Runs one request against the service.
///
/// Returns `None` for `Disconnect`, which gets no reply.
async fn dispatch<R, C>(
    state: &ServerState<R, C>,
    request: Request,
    start: &Instant,
) -> Option<Response>
where
    R: SessionRepository,
    C: Codec,
{
    let service = &state.service;

    let result = match request {
        Request::CreateMatch { player_name } => service
            .create_match(&player_name)
            .await
            .map(|session_id| Response::MatchCreated { session_id }),

        Request::JoinMatch {
            session_id,
            player_name,
        } => service.join_match(&session_id, &player_name).await.map(|player| {
            Response::MatchJoined {
                session_id,
                player_name: player.to_string(),
            }
        }),

        Request::SubmitMove {
            session_id,
            player_name,
            move_token,
        } => service
            .submit_move(&session_id, &player_name, &move_token)
            .await
            .map(|receipt| Response::move_accepted(session_id, receipt)),

        Request::GetMatch { session_id } => service
            .get_match(&session_id)
            .await
            .map(|session| Response::Match { session }),

        Request::Ping { client_time } => Ok(Response::Pong {
            client_time,
            server_time: u64::try_from(start.elapsed().as_millis())
                .unwrap_or(u64::MAX),
        }),

        Request::Disconnect { reason } => {
            tracing::info!(%reason, "client disconnected");
            return None;
        }
    };

    Some(result.unwrap_or_else(|err| {
        tracing::debug!(error = %err, kind = ?err.kind(), "request rejected");
        Response::from(&err)
    }))
}

/// Encodes and sends one response envelope.
async fn reply<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    seq: u64,
    body: Response,
) -> Result<(), RpsError> {
    let bytes = codec.encode(&Envelope { seq, body })?;
    conn.send(&bytes).await?;
    Ok(())
}
