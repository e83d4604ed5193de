use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use super::auth::AdminAccess;
use super::error::GuestbookError;
use super::models::{AdminEntry, Entry, PublicEntry, Submission};
use super::moderation::ModerationPolicy;
use super::repository::EntryRepository;
use super::visibility;

/// Length bounds for submitted text, counted in characters
#[derive(Debug, Clone, Copy)]
pub struct EntryLimits {
    pub max_name_length: usize,
    pub max_remarks_length: usize,
}

impl Default for EntryLimits {
    fn default() -> Self {
        Self {
            max_name_length: 50,
            max_remarks_length: 200,
        }
    }
}

/// Body of a public submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEntry {
    pub name: Option<String>,
    pub remarks: Option<String>,
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Entry lifecycle: create, list, owner delete and the admin transitions.
///
/// Holds no per-request state; every call reads what it needs from the store.
#[derive(Clone)]
pub struct GuestbookService {
    repo: EntryRepository,
    policy: ModerationPolicy,
    limits: EntryLimits,
    clock: Clock,
}

impl GuestbookService {
    pub fn new(repo: EntryRepository, policy: ModerationPolicy, limits: EntryLimits) -> Self {
        Self {
            repo,
            policy,
            limits,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock, mainly for deterministic tests
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn repository(&self) -> &EntryRepository {
        &self.repo
    }

    /// Entries visible to the public, redacted for `requester_ip`
    pub async fn list_public(&self, requester_ip: &str) -> Result<Vec<PublicEntry>, GuestbookError> {
        let entries = self.repo.list_entries().await?;
        Ok(visibility::public_listing(&entries, requester_ip))
    }

    /// Validate, moderate and persist a new submission
    pub async fn create(&self, input: NewEntry, ip: &str) -> Result<PublicEntry, GuestbookError> {
        let name = match input.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(GuestbookError::validation("Missing required fields")),
        };
        let remarks = input.remarks.unwrap_or_default();

        if name.chars().count() > self.limits.max_name_length
            || remarks.chars().count() > self.limits.max_remarks_length
        {
            return Err(GuestbookError::validation("Content too long"));
        }

        // Read-then-decide-then-write; the listing must be complete first
        let existing: Vec<Entry> = self
            .repo
            .list_entries()
            .await?
            .into_iter()
            .map(|stored| stored.entry)
            .collect();

        let now = (self.clock)();
        let decision = self.policy.evaluate(&Submission { ip, timestamp: now }, &existing);
        if decision.needs_approval() {
            info!("Holding new guestbook entry for approval: {:?}", decision.reasons);
        }

        let key = self.repo.fresh_key().await?;
        let mut entry = Entry::new(name, remarks, ip.to_string(), now);
        entry.needs_approval = decision.needs_approval();

        self.repo.put(&key, &entry).await?;
        debug!("Created guestbook entry {}", key);

        Ok(visibility::redact(&key, &entry, ip))
    }

    /// Soft-delete an entry on behalf of the address that created it
    pub async fn owner_delete(&self, key: &str, requester_ip: &str) -> Result<(), GuestbookError> {
        let mut entry = self.repo.get_404(key).await?;

        if entry.ip != requester_ip {
            return Err(GuestbookError::forbidden("IP mismatch"));
        }

        entry.deleted = true;
        self.repo.put(key, &entry).await?;
        info!("Owner soft-deleted guestbook entry {}", key);
        Ok(())
    }

    pub async fn admin_list(&self, _access: AdminAccess) -> Result<Vec<AdminEntry>, GuestbookError> {
        let entries = self.repo.list_entries().await?;
        Ok(visibility::admin_listing(&entries))
    }

    /// `hard` removes the record permanently; otherwise it is flagged deleted
    pub async fn admin_delete(&self, _access: AdminAccess, key: &str, hard: bool) -> Result<(), GuestbookError> {
        let mut entry = self.repo.get_404(key).await?;

        if hard {
            self.repo.delete(key).await?;
            info!("Admin hard-deleted guestbook entry {}", key);
        } else {
            entry.deleted = true;
            self.repo.put(key, &entry).await?;
            info!("Admin soft-deleted guestbook entry {}", key);
        }
        Ok(())
    }

    /// `approve` clears the moderation hold; without it the entry is undeleted
    pub async fn admin_update(&self, _access: AdminAccess, key: &str, approve: bool) -> Result<(), GuestbookError> {
        let mut entry = self.repo.get_404(key).await?;

        if approve {
            entry.needs_approval = false;
            info!("Admin approved guestbook entry {}", key);
        } else {
            entry.deleted = false;
            info!("Admin restored guestbook entry {}", key);
        }

        self.repo.put(key, &entry).await
    }
}
