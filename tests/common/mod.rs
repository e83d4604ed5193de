#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use guestbook_api::{
    app,
    config::AppConfig,
    store::{EntryStore, KeyPage, MemoryStore, StoreError},
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_SECRET: &str = "secret";
pub const IP_HEADER: &str = "CF-Connecting-IP";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.admin_secret = ADMIN_SECRET.to_string();
    config
}

/// Router over a fresh memory store with a tiny page size, so every listing
/// walks several pages
pub fn test_app() -> (Router, Arc<MemoryStore>) {
    test_app_with(test_config())
}

pub fn test_app_with(config: AppConfig) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_page_size(2));
    let state = AppState::new(config, store.clone());
    (app(state), store)
}

/// Midday, so one-day moderation tests never straddle UTC midnight
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
}

/// Like `test_app`, but the service clock always reads `fixed_now()`
pub fn test_app_at_fixed_time() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_page_size(2));
    let state = AppState::new(test_config(), store.clone()).with_clock(fixed_now);
    (app(state), store)
}

pub fn failing_app() -> Router {
    app(AppState::new(test_config(), Arc::new(FailingStore)))
}

/// Store whose every call fails, for the 500 paths
pub struct FailingStore;

#[async_trait]
impl EntryStore for FailingStore {
    async fn list(&self, _prefix: &str, _cursor: Option<String>) -> Result<KeyPage, StoreError> {
        Err(StoreError::Backend("KV Error".into()))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Backend("KV Error".into()))
    }

    async fn put(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Backend("KV Error".into()))
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("KV Error".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("KV Error".into()))
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| panic!("invalid JSON body {:?}: {}", self.text(), e))
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("readable body");
    TestResponse {
        status,
        body: body.to_vec(),
    }
}

/// Build a request with an optional caller IP and optional raw body
pub fn request(method: &str, uri: &str, ip: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ip) = ip {
        builder = builder.header(IP_HEADER, ip);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request"),
        None => builder.body(Body::empty()).expect("valid request"),
    }
}

pub fn json_request(method: &str, uri: &str, ip: Option<&str>, body: Value) -> Request<Body> {
    request(method, uri, ip, Some(&body.to_string()))
}

pub async fn seed(store: &MemoryStore, key: &str, value: Value) {
    store.put(key, value.to_string()).await.expect("memory store put");
}

pub async fn stored(store: &MemoryStore, key: &str) -> Option<Value> {
    store
        .get(key)
        .await
        .expect("memory store get")
        .map(|raw| serde_json::from_str(&raw).expect("stored JSON"))
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
}

/// Serve the app on a real socket in the background
pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let (router, store) = test_app_at_fixed_time();
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind {}", port))?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let server = TestServer { port, base_url, store };
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

impl TestServer {
    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}
