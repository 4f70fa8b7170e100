//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and driving WebSocket
//! clients through the gateway protocol.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chat_common::AppConfig;
use chat_gateway::{create_gateway_state, serve};
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long a client waits for any single frame
pub const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    shutdown: Option<oneshot::Sender<()>>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with default configuration
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start a test server with configuration overrides
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self> {
        let config = test_config(overrides)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = create_gateway_state(config);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            serve(listener, state, shutdown).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            shutdown: Some(shutdown_tx),
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the WebSocket gateway URL
    pub fn gateway_url(&self) -> String {
        format!("ws://{}/gateway", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Open a gateway connection and consume its Hello frame
    pub async fn connect(&self) -> Result<GatewayClient> {
        GatewayClient::connect(&self.gateway_url()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Create a test configuration from defaults plus overrides
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let overrides: Vec<(String, String)> = overrides
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();

    AppConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A WebSocket client speaking the gateway protocol
pub struct GatewayClient {
    ws: WsStream,
    /// Payload of the Hello frame received on connect
    pub hello: Value,
}

impl GatewayClient {
    /// Connect and read the Hello frame
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws, _) = connect_async(url).await.context("WebSocket connect failed")?;
        let mut client = Self {
            ws,
            hello: Value::Null,
        };

        let hello = client.next_frame().await?;
        if hello["op"] != 10 {
            bail!("Expected Hello, got {hello}");
        }
        client.hello = hello["d"].clone();

        Ok(client)
    }

    /// Send a raw text frame
    pub async fn send_raw(&mut self, text: impl Into<String>) -> Result<()> {
        self.ws.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Send an op 2 chat event
    pub async fn send_event(&mut self, name: &str, data: Value) -> Result<()> {
        self.send_raw(json!({"op": 2, "t": name, "d": data}).to_string())
            .await
    }

    /// Send an op 1 heartbeat
    pub async fn heartbeat(&mut self, last_sequence: Option<u64>) -> Result<()> {
        self.send_raw(json!({"op": 1, "d": last_sequence}).to_string())
            .await
    }

    /// Claim a nickname, enter a room and wait for the acceptance
    pub async fn join(&mut self, nickname: &str, room: &str) -> Result<()> {
        self.send_event("joinRoom", json!({"nickname": nickname, "room": room}))
            .await?;
        self.next_event("nicknameAccepted").await?;
        Ok(())
    }

    /// Next JSON frame, skipping control frames
    pub async fn next_frame(&mut self) -> Result<Value> {
        loop {
            let msg = tokio::time::timeout(FRAME_TIMEOUT, self.ws.next())
                .await
                .context("Timed out waiting for a frame")?;

            match msg {
                Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(&text)?),
                Some(Ok(Message::Close(frame))) => bail!("Connection closed: {frame:?}"),
                Some(Ok(_)) => {}
                Some(Err(e)) => bail!("WebSocket error: {e}"),
                None => bail!("Connection ended"),
            }
        }
    }

    /// Payload of the next Dispatch named `name`, skipping other frames
    pub async fn next_event(&mut self, name: &str) -> Result<Value> {
        self.next_event_where(name, |_| true).await
    }

    /// Payload of the next Dispatch named `name` that satisfies `accept`
    pub async fn next_event_where(
        &mut self,
        name: &str,
        accept: impl Fn(&Value) -> bool,
    ) -> Result<Value> {
        loop {
            let frame = self.next_frame().await?;
            if frame["op"] == 0 && frame["t"] == name && accept(&frame["d"]) {
                return Ok(frame["d"].clone());
            }
        }
    }

    /// Fail if a Dispatch named `name` arrives within `window`
    pub async fn assert_no_event(&mut self, name: &str, window: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + window;

        loop {
            let Ok(msg) = tokio::time::timeout_at(deadline, self.ws.next()).await else {
                return Ok(());
            };

            match msg {
                Some(Ok(Message::Text(text))) => {
                    let frame: Value = serde_json::from_str(&text)?;
                    if frame["op"] == 0 && frame["t"] == name {
                        bail!("Unexpected {name} event: {frame}");
                    }
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                _ => return Ok(()),
            }
        }
    }

    /// Wait for the server to close the connection; returns the close code
    pub async fn wait_closed(&mut self) -> Result<Option<u16>> {
        loop {
            let msg = tokio::time::timeout(FRAME_TIMEOUT, self.ws.next())
                .await
                .context("Timed out waiting for close")?;

            match msg {
                Some(Ok(Message::Close(frame))) => return Ok(frame.map(|f| u16::from(f.code))),
                Some(Ok(_)) => {}
                Some(Err(_)) | None => return Ok(None),
            }
        }
    }

    /// Close the connection from the client side
    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}
