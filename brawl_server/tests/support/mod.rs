// Shared helpers for booting a server and driving WebSocket clients in integration tests.
#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::{
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, OnceLock},
    time::Duration,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(10);

// Boot a fresh server (and therefore a fresh arena) and return its WebSocket URL.
//
// Each call gets its own arena because the arena caps the number of players, so tests in
// the same binary cannot share one.
pub fn start_server() -> String {
    // Local one-time slot where the server thread publishes its selected address.
    let published_addr = Arc::new(OnceLock::<String>::new());
    let published_addr_thread = Arc::clone(&published_addr);
    // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("test runtime");
        runtime.block_on(async move {
            // Bind to an ephemeral port to avoid collisions with local services.
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind ephemeral test port");
            let addr = listener.local_addr().expect("get local addr");
            let _ = published_addr_thread.set(addr.to_string());
            // Serve until the test process exits.
            brawl_server::run_until(listener, std::future::pending())
                .await
                .expect("server failed");
        });
    });

    let addr = wait_for_readiness(published_addr);
    format!("ws://{addr}/ws")
}

// Wait for address publication and then for the server socket to accept TCP connections.
fn wait_for_readiness(published_addr: Arc<OnceLock<String>>) -> String {
    let addr = loop {
        if let Some(addr) = published_addr.get() {
            break addr.clone();
        }
        // Avoid a tight loop while waiting for the background thread.
        std::thread::sleep(Duration::from_millis(10));
    };

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            return addr;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

pub async fn connect(url: &str) -> Client {
    let (client, _response) = connect_async(url).await.expect("websocket handshake");
    client
}

/// Connects and consumes the join prompt, returning the client and its player id.
pub async fn join(url: &str) -> (Client, String) {
    let mut client = connect(url).await;
    let prompt = next_of_type(&mut client, "choose_class").await;
    let player_id = prompt["data"]["player_id"]
        .as_str()
        .expect("player id is a string")
        .to_string();
    (client, player_id)
}

pub async fn send_json(client: &mut Client, value: Value) {
    client
        .send(Message::text(value.to_string()))
        .await
        .expect("send text frame");
}

/// Next text frame parsed as JSON. Panics on close or timeout.
pub async fn next_json(client: &mut Client) -> Value {
    tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            let msg = client
                .next()
                .await
                .expect("stream ended")
                .expect("websocket error");
            match msg {
                Message::Text(text) => {
                    return serde_json::from_str::<Value>(text.as_str())
                        .expect("server sent valid json");
                }
                Message::Close(frame) => panic!("connection closed: {frame:?}"),
                _ => {}
            }
        }
    })
    .await
    .expect("timed out waiting for a message")
}

/// Skips messages until one with the given `type` arrives.
pub async fn next_of_type(client: &mut Client, ty: &str) -> Value {
    next_matching(client, |msg| msg["type"] == ty).await
}

pub async fn next_matching(client: &mut Client, mut pred: impl FnMut(&Value) -> bool) -> Value {
    tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            let msg = next_json(client).await;
            if pred(&msg) {
                return msg;
            }
        }
    })
    .await
    .expect("timed out waiting for a matching message")
}

/// Reads until the server closes, returning the close code and reason.
pub async fn expect_close(client: &mut Client) -> (u16, String) {
    tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(Some(frame)))) => {
                    return (u16::from(frame.code), frame.reason.to_string());
                }
                Some(Ok(Message::Close(None))) | None | Some(Err(_)) => {
                    panic!("connection ended without a close frame");
                }
                Some(Ok(_)) => {}
            }
        }
    })
    .await
    .expect("timed out waiting for close")
}
