//! Gateway lifecycle observed through the registry handle.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, http::HeaderValue, Message},
};

use congrego_auth::{Claims, Role, TokenCodec};
use congrego_core::{Tenant, UserId};
use congrego_realtime::{router, ConnectionRegistry, GatewayState, HANDSHAKE_HEADER};

const SECRET: &[u8] = b"gateway-test-secret";

async fn spawn_gateway(registry: ConnectionRegistry) -> std::net::SocketAddr {
    let state = GatewayState {
        registry,
        codec: Arc::new(TokenCodec::new(SECRET)),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    addr
}

fn ws_request(addr: std::net::SocketAddr, token: Option<&str>) -> tokio_tungstenite::tungstenite::handshake::client::Request {
    let mut request = format!("ws://{}/ws/members", addr)
        .into_client_request()
        .unwrap();
    if let Some(token) = token {
        request
            .headers_mut()
            .insert(HANDSHAKE_HEADER, HeaderValue::from_str(token).unwrap());
    }
    request
}

/// Poll until the condition holds; server-side cleanup runs on its own task
/// and lags the client-visible close by a scheduling tick.
async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn rejected_handshake_never_joins_the_registry() {
    let registry = ConnectionRegistry::new();
    let addr = spawn_gateway(registry.clone()).await;

    let tenant = Tenant::new("Central", "c.png");
    let codec = TokenCodec::new(SECRET);
    let issued_at = chrono::Utc::now() - chrono::Duration::days(8);
    let claims = Claims::issue_at(UserId::new(), "Ana", Role::Admin, &tenant, issued_at);
    let expired = codec.sign(&claims).unwrap();

    let (mut ws, _) = connect_async(ws_request(addr, Some(&expired)))
        .await
        .expect("websocket connect failed");

    // The server closes without ever sending an ack.
    let frame = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("timed out waiting for close");
    match frame {
        None | Some(Ok(Message::Close(_))) | Some(Err(_)) => {}
        Some(other) => panic!("expected close, got {other:?}"),
    }

    // The connection was deregistered and never admitted to any group.
    wait_until(|| registry.count() == 0).await;
    assert_eq!(registry.group_size(tenant.id), 0);
}

#[tokio::test]
async fn missing_token_never_joins_the_registry() {
    let registry = ConnectionRegistry::new();
    let addr = spawn_gateway(registry.clone()).await;

    let (mut ws, _) = connect_async(ws_request(addr, None))
        .await
        .expect("websocket connect failed");

    let frame = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("timed out waiting for close");
    match frame {
        None | Some(Ok(Message::Close(_))) | Some(Err(_)) => {}
        Some(other) => panic!("expected close, got {other:?}"),
    }

    wait_until(|| registry.count() == 0).await;
}

#[tokio::test]
async fn admitted_connection_is_tracked_until_close() {
    let registry = ConnectionRegistry::new();
    let addr = spawn_gateway(registry.clone()).await;

    let tenant = Tenant::new("Central", "c.png");
    let codec = TokenCodec::new(SECRET);
    let claims = Claims::issue(UserId::new(), "Ana", Role::Admin, &tenant);
    let token = codec.sign(&claims).unwrap();

    let (mut ws, _) = connect_async(ws_request(addr, Some(&token)))
        .await
        .expect("websocket connect failed");

    // Admission ack arrives once the connection joined its tenant group.
    let frame = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("timed out waiting for ack")
        .expect("stream ended")
        .expect("transport error");
    match frame {
        Message::Text(text) => {
            let json: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(json["event"], "connected");
        }
        other => panic!("expected ack, got {other:?}"),
    }

    assert_eq!(registry.count(), 1);
    assert_eq!(registry.group_size(tenant.id), 1);

    drop(ws);
    wait_until(|| registry.count() == 0).await;
}
