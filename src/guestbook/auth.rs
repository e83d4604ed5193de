use sha2::{Digest, Sha256};

use super::error::GuestbookError;

/// Proof that the caller passed [`authorize_admin`]. Admin operations take it
/// by value, so they cannot run before the secret check.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess {
    _private: (),
}

/// Check a caller-supplied admin secret against the configured one.
///
/// Both sides are hashed first so the final comparison is over fixed-length
/// digests. An empty configured secret disables the admin surface entirely.
pub fn authorize_admin(configured: &str, supplied: Option<&str>) -> Result<AdminAccess, GuestbookError> {
    let supplied = match supplied {
        Some(s) if !s.is_empty() => s,
        _ => return Err(GuestbookError::forbidden("Unauthorized")),
    };

    if configured.is_empty() {
        tracing::warn!("Admin request rejected: no admin secret configured");
        return Err(GuestbookError::forbidden("Unauthorized"));
    }

    let expected = Sha256::digest(configured.as_bytes());
    let actual = Sha256::digest(supplied.as_bytes());

    if expected == actual {
        Ok(AdminAccess { _private: () })
    } else {
        tracing::warn!("Admin request rejected: secret mismatch");
        Err(GuestbookError::forbidden("Unauthorized"))
    }
}
