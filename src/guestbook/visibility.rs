use super::models::{AdminEntry, Entry, PublicEntry, StoredEntry};

/// Redacted view for a public caller, or `None` if the entry is hidden
pub fn to_public_view(key: &str, entry: &Entry, requester_ip: &str) -> Option<PublicEntry> {
    if !entry.is_public() {
        return None;
    }
    Some(redact(key, entry, requester_ip))
}

/// Unconditional redaction, used for the submitter's own just-created entry
pub(crate) fn redact(key: &str, entry: &Entry, requester_ip: &str) -> PublicEntry {
    PublicEntry {
        key: key.to_string(),
        name: entry.name.clone(),
        remarks: entry.remarks.clone(),
        timestamp: entry.timestamp.clone(),
        needs_approval: entry.needs_approval,
        ip_match: entry.ip == requester_ip,
    }
}

pub fn to_admin_view(entry: &Entry, key: &str) -> AdminEntry {
    AdminEntry {
        key: key.to_string(),
        entry: entry.clone(),
    }
}

pub fn public_listing(entries: &[StoredEntry], requester_ip: &str) -> Vec<PublicEntry> {
    entries
        .iter()
        .filter_map(|stored| to_public_view(&stored.key, &stored.entry, requester_ip))
        .collect()
}

pub fn admin_listing(entries: &[StoredEntry]) -> Vec<AdminEntry> {
    entries
        .iter()
        .map(|stored| to_admin_view(&stored.entry, &stored.key))
        .collect()
}
