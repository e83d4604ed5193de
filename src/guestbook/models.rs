use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A stored guestbook submission, exactly as persisted in the store.
///
/// Every field defaults so records written by older clients (or by hand)
/// still decode; a missing flag reads as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Entry {
    pub name: String,
    pub remarks: String,
    /// ISO-8601 creation instant. Kept as text; see [`Entry::created_at`].
    pub timestamp: String,
    pub ip: String,
    pub deleted: bool,
    pub needs_approval: bool,
}

impl Entry {
    pub fn new(name: String, remarks: String, ip: String, created_at: DateTime<Utc>) -> Self {
        Self {
            name,
            remarks,
            timestamp: format_timestamp(created_at),
            ip,
            deleted: false,
            needs_approval: false,
        }
    }

    /// Parsed creation instant, `None` when the stored text is not ISO-8601
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    pub fn is_public(&self) -> bool {
        !self.deleted && !self.needs_approval
    }
}

/// An entry paired with its store key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub key: String,
    pub entry: Entry,
}

/// Redacted shape returned to unauthenticated callers. Has no `ip` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicEntry {
    pub key: String,
    pub name: String,
    pub remarks: String,
    pub timestamp: String,
    pub needs_approval: bool,
    pub ip_match: bool,
}

/// Full shape returned to authenticated operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminEntry {
    pub key: String,
    #[serde(flatten)]
    pub entry: Entry,
}

/// Metadata of an incoming submission the moderation engine looks at
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub ip: &'a str,
    pub timestamp: DateTime<Utc>,
}

/// Millisecond-precision UTC timestamp, e.g. `2023-01-01T00:00:00.000Z`
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
