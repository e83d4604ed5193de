// handlers/guestbook.rs - public guestbook endpoints
//
// GET    /guestbook  list visible entries, redacted for the caller
// POST   /guestbook  submit a new entry
// DELETE /guestbook  soft-delete the caller's own entry

use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_body, require_key};
use crate::app::AppState;
use crate::error::ApiError;
use crate::guestbook::{NewEntry, PublicEntry};
use crate::middleware::ClientIp;

#[derive(Debug, Deserialize)]
pub struct DeleteBody {
    pub key: Option<String>,
}

/// GET /guestbook - entries that are neither deleted nor pending approval
pub async fn list(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
) -> Result<Json<Vec<PublicEntry>>, ApiError> {
    let entries = state
        .service
        .list_public(&ip)
        .await
        .map_err(|e| ApiError::from_guestbook(e, "Failed to fetch entries"))?;

    Ok(Json(entries))
}

/// POST /guestbook - body `{ "name": ..., "remarks"?: ... }`
pub async fn create(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    body: Bytes,
) -> Result<Json<PublicEntry>, ApiError> {
    let input: NewEntry = parse_body(&body, state.config.api.strict_body_validation)?;

    let created = state
        .service
        .create(input, &ip)
        .await
        .map_err(|e| ApiError::from_guestbook(e, "Failed to create entry"))?;

    Ok(Json(created))
}

/// DELETE /guestbook - body `{ "key": ... }`, only the submitting IP may delete
pub async fn delete(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let body: DeleteBody = parse_body(&body, state.config.api.strict_body_validation)?;
    let key = require_key(body.key)?;

    state
        .service
        .owner_delete(&key, &ip)
        .await
        .map_err(|e| ApiError::from_guestbook(e, "Failed to delete entry"))?;

    Ok(Json(json!({ "success": true })))
}
