//! Per-pass configuration handed to every sync stage.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::app_config::AppConfig;

/// Lightspeed API credentials. Never validated beyond non-emptiness.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns `true` when both the username and the password are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// How the reconciler treats a record whose sku already exists in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileMode {
    /// Look up by sku, update when found, create otherwise.
    #[default]
    #[serde(rename = "upsert")]
    Upsert,
    /// Always create a new stored product, never looking up existing ones.
    /// Re-running a pass duplicates every product.
    #[serde(rename = "append")]
    AppendOnly,
}

impl ReconcileMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReconcileMode::Upsert => "upsert",
            ReconcileMode::AppendOnly => "append",
        }
    }
}

impl FromStr for ReconcileMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upsert" => Ok(ReconcileMode::Upsert),
            "append" | "append-only" | "append_only" => Ok(ReconcileMode::AppendOnly),
            other => Err(format!(
                "unknown reconcile mode \"{other}\"; expected \"upsert\" or \"append\""
            )),
        }
    }
}

impl std::fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable configuration for a single sync pass.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub fetch_interval_hours: u64,
    pub debug_enabled: bool,
    pub request_timeout_secs: u64,
    pub accept_invalid_certs: bool,
    pub user_agent: String,
    pub reconcile_mode: ReconcileMode,
}

impl SyncConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            credentials: Credentials::new(&config.api_username, &config.api_password),
            fetch_interval_hours: config.fetch_interval_hours,
            debug_enabled: config.enable_debug,
            request_timeout_secs: config.request_timeout_secs,
            accept_invalid_certs: config.accept_invalid_certs,
            user_agent: config.user_agent.clone(),
            reconcile_mode: config.reconcile_mode,
        }
    }

    /// Interval between scheduled passes.
    #[must_use]
    pub fn fetch_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_interval_hours.max(1).saturating_mul(3600))
    }
}
