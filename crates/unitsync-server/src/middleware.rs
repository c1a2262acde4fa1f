//! Request correlation and bearer-token auth for the HTTP API.
//!
//! `x-request-id` is assigned and echoed by tower-http's request-id layers
//! (see [`crate::api::build_app`]); handlers read it through [`RequestId`].

use std::collections::HashSet;
use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use unitsync_core::{AppConfig, Environment};
use uuid::Uuid;

use crate::api::ApiError;

/// Correlation id of the current request.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Absent only when a route is mounted outside the request-id layers.
        let id = parts
            .extensions
            .get::<tower_http::request_id::RequestId>()
            .and_then(|id| id.header_value().to_str().ok())
            .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);
        Ok(Self(id))
    }
}

/// Which callers the protected routes admit.
#[derive(Debug, Clone)]
pub enum BearerAuth {
    /// No keys configured in development; every request passes.
    Disabled,
    Keys(Arc<HashSet<String>>),
}

impl BearerAuth {
    /// # Errors
    ///
    /// Fails outside development when `UNITSYNC_API_KEYS` is empty.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Self::new(&config.api_keys, config.env == Environment::Development)
    }

    /// # Errors
    ///
    /// Fails when `keys` is empty and `is_development` is false.
    pub fn new(keys: &[String], is_development: bool) -> anyhow::Result<Self> {
        if !keys.is_empty() {
            return Ok(Self::Keys(Arc::new(keys.iter().cloned().collect())));
        }
        anyhow::ensure!(
            is_development,
            "UNITSYNC_API_KEYS is required outside development; provide comma-separated bearer tokens"
        );
        tracing::warn!("UNITSYNC_API_KEYS is empty; bearer auth disabled in development");
        Ok(Self::Disabled)
    }

    fn admits(&self, headers: &HeaderMap) -> bool {
        match self {
            Self::Disabled => true,
            Self::Keys(keys) => bearer_token(headers).is_some_and(|token| keys.contains(token)),
        }
    }
}

/// Rejects requests to protected routes that lack an accepted bearer token.
pub async fn require_bearer_auth(
    State(auth): State<BearerAuth>,
    req_id: RequestId,
    req: Request,
    next: Next,
) -> Response {
    if auth.admits(req.headers()) {
        return next.run(req).await;
    }
    tracing::debug!(request_id = %req_id.0, path = %req.uri().path(), "bearer auth rejected");
    ApiError::new(req_id.0, "unauthorized", "missing or invalid bearer token").into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
