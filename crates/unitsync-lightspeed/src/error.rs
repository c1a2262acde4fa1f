use thiserror::Error;

#[derive(Debug, Error)]
pub enum LightspeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a JSON array of units, got {found}")]
    NotAnArray { found: &'static str },

    #[error("response contained no units")]
    EmptyPayload,

    #[error("unit is missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
}

impl LightspeedError {
    /// Returns `true` for errors that mean the response carried nothing to sync.
    #[must_use]
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            LightspeedError::Deserialize { .. }
                | LightspeedError::NotAnArray { .. }
                | LightspeedError::EmptyPayload
        )
    }
}
