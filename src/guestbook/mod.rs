//! Guestbook domain: entry model, moderation gate, visibility rules and the
//! lifecycle operations built on top of the key-value store.

pub mod auth;
pub mod error;
pub mod models;
pub mod moderation;
pub mod repository;
pub mod service;
pub mod visibility;

pub use auth::{authorize_admin, AdminAccess};
pub use error::GuestbookError;
pub use models::{AdminEntry, Entry, PublicEntry, StoredEntry, Submission};
pub use moderation::{HoldReason, ModerationDecision, ModerationPolicy};
pub use repository::EntryRepository;
pub use service::{EntryLimits, GuestbookService, NewEntry};
