use std::future::Future;

use unitsync_core::{NormalizedProduct, StoredProduct};

use crate::error::StoreError;

/// Persistence seam for synced products.
///
/// Implementations only need to be correct for sequential calls; passes are
/// serialized by [`crate::SyncGuard`].
pub trait ProductStore: Send + Sync {
    /// Returns the stored product for `sku`. When duplicates exist, the
    /// oldest one.
    fn find_by_sku(
        &self,
        sku: &str,
    ) -> impl Future<Output = Result<Option<StoredProduct>, StoreError>> + Send;

    /// Creates a new published product.
    fn create(
        &self,
        product: &NormalizedProduct,
    ) -> impl Future<Output = Result<StoredProduct, StoreError>> + Send;

    /// Replaces every synced attribute of product `id`.
    fn update(
        &self,
        id: i64,
        product: &NormalizedProduct,
    ) -> impl Future<Output = Result<StoredProduct, StoreError>> + Send;

    /// Total stored products, duplicates included.
    fn count(&self) -> impl Future<Output = Result<usize, StoreError>> + Send;
}
