use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the sync debug log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugLogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl DebugLogEntry {
    #[must_use]
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
        }
    }

    /// Renders the entry as `YYYY-MM-DD HH:MM:SS - <message>`.
    #[must_use]
    pub fn line(&self) -> String {
        format!("{} - {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"), self.message)
    }
}

/// Joins entries into the newline-separated text blob shown to operators.
#[must_use]
pub fn render_debug_log(entries: &[DebugLogEntry]) -> String {
    entries
        .iter()
        .map(DebugLogEntry::line)
        .collect::<Vec<_>>()
        .join("\n")
}
