use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, StoreBackend};
use crate::guestbook::{EntryRepository, GuestbookService};
use crate::handlers;
use crate::store::{EntryStore, MemoryStore, PostgresStore, StoreError};

/// Shared handler state. Cheap to clone; holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub service: GuestbookService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the service on top of an already constructed store
    pub fn new(config: AppConfig, store: Arc<dyn EntryStore>) -> Self {
        let repo = EntryRepository::new(store, config.guestbook.key_prefix.clone());
        let service = GuestbookService::new(repo, config.moderation_policy(), config.entry_limits());
        Self {
            service,
            config: Arc::new(config),
        }
    }

    /// Pin the service clock, so moderation sees a fixed "now"
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.service = self.service.with_clock(clock);
        self
    }

    /// Build the configured store backend, then the state around it
    pub async fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn EntryStore> = match config.store.backend {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory guestbook store; entries are lost on restart");
                Arc::new(MemoryStore::with_page_size(config.store.page_size))
            }
            StoreBackend::Postgres => {
                let url = config
                    .store
                    .database_url
                    .as_deref()
                    .ok_or_else(|| StoreError::Unavailable("DATABASE_URL is not set".to_string()))?;
                Arc::new(PostgresStore::connect(url, config.store.page_size).await?)
            }
        };
        Ok(Self::new(config, store))
    }
}

pub fn app(state: AppState) -> Router {
    let enable_cors = state.config.security.enable_cors;

    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(guestbook_routes())
        // Shared-secret admin surface
        .merge(admin_routes())
        .with_state(state);

    let router = if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

fn guestbook_routes() -> Router<AppState> {
    use handlers::guestbook;

    Router::new().route(
        "/guestbook",
        get(guestbook::list)
            .post(guestbook::create)
            .delete(guestbook::delete),
    )
}

fn admin_routes() -> Router<AppState> {
    use handlers::admin;

    Router::new().route(
        "/guestbook-admin",
        get(admin::list).delete(admin::delete).put(admin::update),
    )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Guestbook API",
        "version": version,
        "endpoints": {
            "guestbook": "GET, POST, DELETE /guestbook (public, caller IP header required)",
            "admin": "GET, PUT, DELETE /guestbook-admin (admin secret required)",
            "health": "/health",
        }
    }))
}

async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.service.repository().store().ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": "unavailable"
                })),
            )
        }
    }
}
