use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use crate::guestbook::{EntryLimits, ModerationPolicy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub guestbook: GuestbookConfig,
    pub moderation: ModerationConfig,
    pub store: StoreConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestbookConfig {
    pub max_name_length: usize,
    pub max_remarks_length: usize,
    /// Prefix of every entry key in the store
    pub key_prefix: String,
}

/// Longest accepted velocity window, one year
pub const MAX_VELOCITY_WINDOW_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    pub velocity_window_hours: i64,
    pub velocity_threshold: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    /// Reject malformed JSON bodies with 400 instead of 500
    pub strict_body_validation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing, default)]
    pub admin_secret: String,
    /// Header carrying the client address, set by the fronting proxy
    pub ip_header: String,
    pub enable_cors: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Guestbook overrides
        if let Ok(v) = env::var("GUESTBOOK_MAX_NAME_LENGTH") {
            self.guestbook.max_name_length = v.parse().unwrap_or(self.guestbook.max_name_length);
        }
        if let Ok(v) = env::var("GUESTBOOK_MAX_REMARKS_LENGTH") {
            self.guestbook.max_remarks_length = v.parse().unwrap_or(self.guestbook.max_remarks_length);
        }
        if let Ok(v) = env::var("GUESTBOOK_KEY_PREFIX") {
            self.guestbook.key_prefix = v;
        }

        // Moderation overrides
        if let Ok(v) = env::var("MODERATION_VELOCITY_WINDOW_HOURS") {
            self.moderation.velocity_window_hours = parse_window_hours(&v, self.moderation.velocity_window_hours);
        }
        if let Ok(v) = env::var("MODERATION_VELOCITY_THRESHOLD") {
            self.moderation.velocity_threshold = v.parse().unwrap_or(self.moderation.velocity_threshold);
        }

        // Store overrides
        if let Ok(v) = env::var("STORE_BACKEND") {
            self.store.backend = match v.to_ascii_lowercase().as_str() {
                "postgres" | "postgresql" => StoreBackend::Postgres,
                "memory" => StoreBackend::Memory,
                _ => self.store.backend,
            };
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.store.database_url = Some(v);
        }
        if let Ok(v) = env::var("STORE_PAGE_SIZE") {
            self.store.page_size = v.parse().unwrap_or(self.store.page_size);
        }

        // API overrides
        if let Some(port) = env::var("GUESTBOOK_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_STRICT_BODY_VALIDATION") {
            self.api.strict_body_validation = v.parse().unwrap_or(self.api.strict_body_validation);
        }

        // Security overrides
        if let Ok(v) = env::var("GUESTBOOK_ADMIN_SECRET").or_else(|_| env::var("ADMIN_SECRET")) {
            self.security.admin_secret = v;
        }
        if let Ok(v) = env::var("GUESTBOOK_IP_HEADER") {
            self.security.ip_header = v;
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            guestbook: GuestbookConfig {
                max_name_length: 50,
                max_remarks_length: 200,
                key_prefix: "entry-".to_string(),
            },
            moderation: ModerationConfig {
                velocity_window_hours: 12,
                velocity_threshold: 5,
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                database_url: None,
                page_size: 1000,
            },
            api: ApiConfig {
                port: 3000,
                strict_body_validation: false,
            },
            security: SecurityConfig {
                admin_secret: String::new(),
                ip_header: "CF-Connecting-IP".to_string(),
                enable_cors: true,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            store: StoreConfig {
                backend: StoreBackend::Postgres,
                database_url: None,
                page_size: 1000,
            },
            security: SecurityConfig {
                admin_secret: String::new(),
                ip_header: "CF-Connecting-IP".to_string(),
                enable_cors: false,
            },
            ..Self::development()
        }
    }

    /// Out-of-range windows fall back to the default policy window
    pub fn moderation_policy(&self) -> ModerationPolicy {
        let hours = self.moderation.velocity_window_hours;
        let velocity_window = Some(hours)
            .filter(|h| (1..=MAX_VELOCITY_WINDOW_HOURS).contains(h))
            .and_then(chrono::Duration::try_hours)
            .unwrap_or_else(|| {
                warn!("Ignoring velocity window of {} hours", hours);
                ModerationPolicy::default().velocity_window
            });

        ModerationPolicy {
            velocity_window,
            velocity_threshold: self.moderation.velocity_threshold,
        }
    }

    pub fn entry_limits(&self) -> EntryLimits {
        EntryLimits {
            max_name_length: self.guestbook.max_name_length,
            max_remarks_length: self.guestbook.max_remarks_length,
        }
    }
}

/// Window hours must be a whole number in `1..=MAX_VELOCITY_WINDOW_HOURS`
fn parse_window_hours(raw: &str, current: i64) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(hours) if (1..=MAX_VELOCITY_WINDOW_HOURS).contains(&hours) => hours,
        _ => {
            warn!(
                "MODERATION_VELOCITY_WINDOW_HOURS={:?} is outside 1..={}; keeping {}",
                raw, MAX_VELOCITY_WINDOW_HOURS, current
            );
            current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.guestbook.max_name_length, 50);
        assert_eq!(config.guestbook.max_remarks_length, 200);
        assert!(!config.api.strict_body_validation);
        assert!(config.security.admin_secret.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert!(!config.security.enable_cors);
        assert_eq!(config.guestbook.key_prefix, "entry-");
    }

    #[test]
    fn derives_domain_settings() {
        let mut config = AppConfig::development();
        config.moderation.velocity_window_hours = 6;
        config.moderation.velocity_threshold = 3;

        let policy = config.moderation_policy();
        assert_eq!(policy.velocity_window, chrono::Duration::hours(6));
        assert_eq!(policy.velocity_threshold, 3);
        assert_eq!(config.entry_limits().max_name_length, 50);
    }

    #[test]
    fn window_hours_outside_range_keep_current_value() {
        assert_eq!(parse_window_hours("24", 12), 24);
        assert_eq!(parse_window_hours(" 6 ", 12), 6);
        assert_eq!(parse_window_hours("0", 12), 12);
        assert_eq!(parse_window_hours("-3", 12), 12);
        assert_eq!(parse_window_hours("2500000000", 12), 12);
        assert_eq!(parse_window_hours(&i64::MAX.to_string(), 12), 12);
        assert_eq!(parse_window_hours("twelve", 12), 12);
    }

    #[test]
    fn out_of_range_window_falls_back_to_default_policy() {
        let mut config = AppConfig::development();

        for hours in [i64::MAX, 2_500_000_000, 0, -1] {
            config.moderation.velocity_window_hours = hours;
            assert_eq!(config.moderation_policy().velocity_window, chrono::Duration::hours(12));
        }
    }

    #[test]
    fn admin_secret_is_not_serialized() {
        let mut config = AppConfig::development();
        config.security.admin_secret = "hunter2".to_string();

        let value = serde_json::to_value(&config).unwrap();
        assert!(value["security"].get("admin_secret").is_none());
    }
}
