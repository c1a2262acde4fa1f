mod app_config;
mod config;
mod debug_log;
mod products;
mod sync_config;

pub use app_config::{AppConfig, Environment};
pub use debug_log::{render_debug_log, DebugLogEntry};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{NormalizedProduct, StockFlag, StoredProduct, PRODUCT_TYPE_SIMPLE};
pub use sync_config::{Credentials, ReconcileMode, SyncConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
