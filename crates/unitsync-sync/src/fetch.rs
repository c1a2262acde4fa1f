use std::future::Future;

use unitsync_core::Credentials;
use unitsync_lightspeed::{LightspeedClient, LightspeedError, RawResponse};

/// Source of raw unit snapshots.
pub trait UnitFetcher: Send + Sync {
    /// URL requested by [`UnitFetcher::fetch`], for logging.
    fn endpoint(&self) -> &str;

    fn fetch(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<RawResponse, LightspeedError>> + Send;
}

impl UnitFetcher for LightspeedClient {
    fn endpoint(&self) -> &str {
        self.url()
    }

    fn fetch(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<RawResponse, LightspeedError>> + Send {
        self.fetch_units(credentials)
    }
}
