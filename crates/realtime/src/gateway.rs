//! Websocket gateway: handshake authentication and connection lifecycle.
//!
//! Per-connection state machine: `Connecting -> Admitted` or
//! `Connecting -> Rejected` (terminal). The handshake verifies the token
//! only, with no credential-store re-check. This is a deliberate asymmetry
//! with the HTTP path: the realtime channel accepts slightly staler
//! revocation semantics in exchange for a store-round-trip-free handshake.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use congrego_auth::TokenCodec;

use crate::protocol::ServerMessage;
use crate::registry::ConnectionRegistry;

/// Handshake header carrying the raw token (not the bearer form), read once
/// at connect time.
pub const HANDSHAKE_HEADER: &str = "authentication";

/// Shared state for the gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub registry: ConnectionRegistry,
    pub codec: Arc<TokenCodec>,
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/ws/members", get(ws_handler))
        .with_state(state)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<GatewayState>,
) -> impl IntoResponse {
    let token = headers
        .get(HANDSHAKE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    ws.on_upgrade(move |socket| handle_socket(socket, token, state))
}

async fn handle_socket(socket: WebSocket, token: Option<String>, state: GatewayState) {
    let (mut sender, mut receiver) = socket.split();

    // Register first (state: Connecting), then authenticate. A rejected
    // connection is force-closed and deregistered before it can ever join
    // a tenant group.
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(64);
    let conn_id = state.registry.add(tx.clone());

    let claims = match token.as_deref().map(|t| state.codec.verify(t)) {
        Some(Ok(claims)) => claims,
        Some(Err(e)) => {
            warn!(conn_id = %conn_id, error = %e, "realtime handshake rejected");
            let _ = sender.send(Message::Close(None)).await;
            state.registry.remove(conn_id);
            return;
        }
        None => {
            warn!(conn_id = %conn_id, "realtime handshake missing token header");
            let _ = sender.send(Message::Close(None)).await;
            state.registry.remove(conn_id);
            return;
        }
    };

    let tenant_id = claims.tenant_id;
    if !state.registry.admit(conn_id, tenant_id) {
        // Transport closed during the handshake.
        return;
    }

    info!(conn_id = %conn_id, tenant_id = %tenant_id, "realtime connection admitted");

    let _ = tx
        .send(ServerMessage::Connected {
            connection_id: conn_id,
        })
        .await;
    drop(tx);

    // Outbound pump: registry broadcasts land in rx and are written to the
    // socket. A write failure means the transport died; the pump stops and
    // the cleanup below deregisters.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "failed to encode realtime message");
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // The channel is server-push only; inbound frames are drained until the
    // client closes or the transport errors.
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(conn_id = %conn_id, error = %e, "realtime transport error");
                break;
            }
        }
    }

    debug!(conn_id = %conn_id, "realtime connection closed");
    state.registry.remove(conn_id);
    send_task.abort();
}
