// handlers/mod.rs - two surfaces over the same guestbook service
//
// guestbook: public, identified only by the caller IP header
// admin:     shared-secret operator surface
pub mod admin;
pub mod guestbook;

use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Decode a JSON request body.
///
/// Malformed input has historically been answered with 500; `strict`
/// switches that to a 400 validation error.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8], strict: bool) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Malformed request body: {}", e);
        if strict {
            ApiError::bad_request("Invalid request body")
        } else {
            ApiError::internal_server_error("Failed to process request")
        }
    })
}

/// `Some(key)` unless the key is absent or blank
pub(crate) fn require_key(key: Option<String>) -> Result<String, ApiError> {
    key.filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing entry key"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Body {
        key: Option<String>,
    }

    #[test]
    fn malformed_body_status_depends_on_strictness() {
        let lenient = parse_body::<Body>(b"{ invalid json", false).unwrap_err();
        assert_eq!(lenient.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        let strict = parse_body::<Body>(b"{ invalid json", true).unwrap_err();
        assert_eq!(strict.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn blank_keys_are_missing() {
        let body: Body = parse_body(br#"{"key":""}"#, false).unwrap();
        assert!(require_key(body.key).is_err());
        assert_eq!(require_key(Some("entry-1".into())).unwrap(), "entry-1");
    }
}
