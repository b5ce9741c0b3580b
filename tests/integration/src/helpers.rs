//! Test helpers for integration tests
//!
//! Spawns both servers, issues tokens, seeds profiles and drives the
//! WebSocket protocol.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use market_common::{AppConfig, JwtService};
use market_db::PgPool;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

/// How long a gateway read may take before the test fails
const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// A seeded profile with a valid access token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

/// API and gateway running in-process
pub struct TestServer {
    pub api_addr: SocketAddr,
    pub gateway_addr: SocketAddr,
    pub client: Client,
    pool: PgPool,
    jwt: JwtService,
    _handles: Vec<JoinHandle<()>>,
}

async fn spawn(app: axum::Router) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok((addr, handle))
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let jwt = JwtService::from_config(&config.jwt);

        // The API state runs migrations before the gateway touches the schema
        let api_state = market_api::create_app_state(config.clone()).await?;
        let pool = api_state.service_context().pool().clone();
        let gateway_state = market_gateway::create_gateway_state(config).await?;

        let (api_addr, api_handle) = spawn(market_api::create_app(api_state)).await?;
        let (gateway_addr, gateway_handle) = spawn(market_gateway::create_app(gateway_state)).await?;

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            api_addr,
            gateway_addr,
            client,
            pool,
            jwt,
            _handles: vec![api_handle, gateway_handle],
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.api_addr)
    }

    pub fn gateway_url(&self) -> String {
        format!("ws://{}/gateway", self.gateway_addr)
    }

    /// Insert a profile and mint a token for it
    pub async fn create_user(&self, name: &str) -> Result<TestUser> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO profiles (id, full_name) VALUES ($1, $2)")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await
            .context("seeding profile")?;
        let token = self.jwt.issue(id, 3600)?;
        Ok(TestUser { id, token })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url(), path)
    }

    fn authed(builder: RequestBuilder, user: &TestUser) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", user.token))
    }

    /// GET outside the `/api/v1` prefix
    pub async fn get_raw(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(format!("{}{}", self.base_url(), path)).send().await?)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Anonymous POST without a body, optionally carrying a Cookie header
    pub async fn post_anonymous(&self, path: &str, cookie: Option<&str>) -> Result<Response> {
        let mut builder = self.client.post(self.url(path));
        if let Some(cookie) = cookie {
            builder = builder.header("Cookie", cookie);
        }
        Ok(builder.send().await?)
    }

    pub async fn get_auth(&self, path: &str, user: &TestUser) -> Result<Response> {
        Ok(Self::authed(self.client.get(self.url(path)), user).send().await?)
    }

    pub async fn post_auth<T: Serialize>(&self, path: &str, user: &TestUser, body: &T) -> Result<Response> {
        Ok(Self::authed(self.client.post(self.url(path)), user)
            .json(body)
            .send()
            .await?)
    }

    pub async fn patch_auth<T: Serialize>(&self, path: &str, user: &TestUser, body: &T) -> Result<Response> {
        Ok(Self::authed(self.client.patch(self.url(path)), user)
            .json(body)
            .send()
            .await?)
    }

    pub async fn put_auth<T: Serialize>(&self, path: &str, user: &TestUser, body: &T) -> Result<Response> {
        Ok(Self::authed(self.client.put(self.url(path)), user)
            .json(body)
            .send()
            .await?)
    }

    pub async fn delete_auth(&self, path: &str, user: &TestUser) -> Result<Response> {
        Ok(Self::authed(self.client.delete(self.url(path)), user).send().await?)
    }
}

/// Configuration from the environment
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    // Suites fire requests back to back against a fresh server
    config.rate_limit.requests_per_second = 1000;
    config.rate_limit.burst = 1000;
    Ok(config)
}

/// Integration tests only run with a database and Redis configured
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    for var in ["DATABASE_URL", "REDIS_URL", "JWT_SECRET"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// WebSocket client speaking the gateway protocol
pub struct GatewayClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl GatewayClient {
    /// Connect and consume HELLO
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws, _) = connect_async(url).await?;
        let mut client = Self { ws };
        let hello = client.next_frame().await?;
        if hello["op"] != 10 {
            bail!("expected HELLO, got {hello}");
        }
        Ok(client)
    }

    /// Connect, identify and wait for READY
    pub async fn identified(url: &str, user: &TestUser) -> Result<Self> {
        let mut client = Self::connect(url).await?;
        client.send(2, json!({ "token": user.token })).await?;
        let ready = client.next_frame().await?;
        if ready["op"] != 12 {
            bail!("expected READY, got {ready}");
        }
        Ok(client)
    }

    pub async fn send(&mut self, op: u8, d: Value) -> Result<()> {
        let frame = json!({ "op": op, "d": d });
        self.ws.send(Message::Text(frame.to_string())).await?;
        Ok(())
    }

    pub async fn subscribe(&mut self, conversation_id: Uuid) -> Result<Value> {
        self.send(3, json!({ "conversation_id": conversation_id })).await?;
        self.next_frame().await
    }

    pub async fn next_frame(&mut self) -> Result<Value> {
        loop {
            let msg = tokio::time::timeout(FRAME_TIMEOUT, self.ws.next())
                .await
                .context("timed out waiting for a frame")?
                .context("gateway closed the stream")??;
            match msg {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Close(frame) => bail!("gateway closed the connection: {frame:?}"),
                _ => {}
            }
        }
    }

    /// Skip frames until a dispatch of the given type arrives
    pub async fn next_dispatch(&mut self, event_type: &str) -> Result<Value> {
        loop {
            let frame = self.next_frame().await?;
            if frame["op"] == 0 && frame["t"] == event_type {
                return Ok(frame);
            }
        }
    }
}
