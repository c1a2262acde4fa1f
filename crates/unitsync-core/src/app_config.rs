use std::net::SocketAddr;

use crate::sync_config::ReconcileMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Lightspeed endpoint base; the `/Unit` path is appended per request.
    pub api_base_url: String,
    pub api_username: String,
    pub api_password: String,
    /// Hours between scheduled passes. Always `>= 1`.
    pub fetch_interval_hours: u64,
    pub enable_debug: bool,
    pub request_timeout_secs: u64,
    /// When `true`, TLS certificate verification is disabled for the Lightspeed client.
    pub accept_invalid_certs: bool,
    pub user_agent: String,
    pub reconcile_mode: ReconcileMode,
    /// Upper bound on retained debug log entries, in memory and in the database.
    pub debug_log_capacity: usize,
    /// Bearer tokens accepted by the HTTP API. Empty disables auth in development.
    pub api_keys: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("api_base_url", &self.api_base_url)
            .field("api_username", &self.api_username)
            .field("api_password", &"[redacted]")
            .field("fetch_interval_hours", &self.fetch_interval_hours)
            .field("enable_debug", &self.enable_debug)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("user_agent", &self.user_agent)
            .field("reconcile_mode", &self.reconcile_mode)
            .field("debug_log_capacity", &self.debug_log_capacity)
            .field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
            .finish()
    }
}
