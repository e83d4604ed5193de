// handlers/admin.rs - operator endpoints guarded by the shared admin secret
//
// The secret is checked before anything touches the store.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_body, require_key};
use crate::app::AppState;
use crate::error::ApiError;
use crate::guestbook::{authorize_admin, AdminAccess, AdminEntry};

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminDeleteBody {
    pub key: Option<String>,
    pub secret: Option<String>,
    #[serde(default)]
    pub hard: bool,
}

#[derive(Debug, Deserialize)]
pub struct AdminUpdateBody {
    pub key: Option<String>,
    pub secret: Option<String>,
    #[serde(default)]
    pub approve: bool,
}

fn authorize(state: &AppState, secret: Option<&str>) -> Result<AdminAccess, ApiError> {
    authorize_admin(&state.config.security.admin_secret, secret).map_err(ApiError::from)
}

/// GET /guestbook-admin?secret=... - every entry, including hidden ones
///
/// An unparseable query string counts as a missing secret.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<AdminQuery>, QueryRejection>,
) -> Result<Json<Vec<AdminEntry>>, ApiError> {
    let secret = query.ok().and_then(|Query(query)| query.secret);
    let access = authorize(&state, secret.as_deref())?;

    let entries = state
        .service
        .admin_list(access)
        .await
        .map_err(|e| ApiError::from_guestbook(e, "Failed to fetch entries"))?;

    Ok(Json(entries))
}

/// DELETE /guestbook-admin - body `{ key, secret, hard? }`
pub async fn delete(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let body: AdminDeleteBody = parse_body(&body, state.config.api.strict_body_validation)?;
    let access = authorize(&state, body.secret.as_deref())?;
    let key = require_key(body.key)?;

    state
        .service
        .admin_delete(access, &key, body.hard)
        .await
        .map_err(|e| ApiError::from_guestbook(e, "Failed to delete entry"))?;

    Ok(Json(json!({ "success": true })))
}

/// PUT /guestbook-admin - body `{ key, secret, approve? }`; without `approve` the entry is undeleted
pub async fn update(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let body: AdminUpdateBody = parse_body(&body, state.config.api.strict_body_validation)?;
    let access = authorize(&state, body.secret.as_deref())?;
    let key = require_key(body.key)?;

    state
        .service
        .admin_update(access, &key, body.approve)
        .await
        .map_err(|e| ApiError::from_guestbook(e, "Failed to update entry"))?;

    Ok(Json(json!({ "success": true })))
}
