//! HTTP client for the Lightspeed dealer `Unit` endpoint.

use std::time::Duration;

use reqwest::{Client, Url};
use unitsync_core::{Credentials, SyncConfig};

use crate::error::LightspeedError;
use crate::types::RawResponse;

const UNIT_PATH: &str = "Unit";

/// HTTP client for the Lightspeed `Unit` endpoint.
///
/// Issues a single authenticated GET per call. Status handling is left to
/// [`crate::validate_response`] so callers can log the status and body
/// before the response is judged. No retries.
pub struct LightspeedClient {
    client: Client,
    units_url: Url,
}

impl LightspeedClient {
    /// Creates a client from the pass configuration: request timeout,
    /// `User-Agent`, and certificate-verification policy.
    ///
    /// When `accept_invalid_certs` is set, TLS certificates are not
    /// verified. Lightspeed dealer hosts are commonly served with
    /// certificates that do not chain, and the upstream deployment runs
    /// this way.
    ///
    /// # Errors
    ///
    /// - [`LightspeedError::Http`] if the `reqwest::Client` cannot be built.
    /// - [`LightspeedError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(config: &SyncConfig) -> Result<Self, LightspeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for the Lightspeed client");
        }

        Ok(Self {
            client,
            units_url: Self::units_url(&config.base_url)?,
        })
    }

    /// The fully-qualified `Unit` URL this client requests.
    #[must_use]
    pub fn url(&self) -> &str {
        self.units_url.as_str()
    }

    /// Fetches the unit inventory snapshot.
    ///
    /// Sends `Authorization: Basic base64(username:password)` and
    /// `Accept: application/json`. Any HTTP status is returned as-is
    /// together with the body text.
    ///
    /// # Errors
    ///
    /// Returns [`LightspeedError::Http`] on network, TLS, or timeout failure,
    /// or if the body cannot be read.
    pub async fn fetch_units(
        &self,
        credentials: &Credentials,
    ) -> Result<RawResponse, LightspeedError> {
        let response = self
            .client
            .get(self.units_url.clone())
            .basic_auth(&credentials.username, Some(&credentials.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(url = %self.units_url, status, bytes = body.len(), "lightspeed response received");

        Ok(RawResponse {
            url: self.units_url.to_string(),
            status,
            body,
        })
    }

    /// Builds `{base_url}/Unit`, tolerating a trailing slash on the base.
    ///
    /// # Errors
    ///
    /// Returns [`LightspeedError::InvalidBaseUrl`] if the base is not an
    /// absolute http(s) URL.
    fn units_url(base_url: &str) -> Result<Url, LightspeedError> {
        let invalid = |reason: String| LightspeedError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };

        let joined = format!("{}/{UNIT_PATH}", base_url.trim_end_matches('/'));
        let url = Url::parse(&joined).map_err(|e| invalid(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
        }

        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
