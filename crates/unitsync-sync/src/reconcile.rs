//! Per-record reconciliation against a [`ProductStore`].

use serde::Serialize;
use unitsync_core::{NormalizedProduct, ReconcileMode, StoredProduct};

use crate::error::StoreError;
use crate::store::ProductStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    Created,
    Updated,
}

/// Makes the store reflect `product`.
///
/// In [`ReconcileMode::Upsert`] the sku is looked up first and an existing
/// product is updated in place. [`ReconcileMode::AppendOnly`] always
/// creates, so repeated passes accumulate duplicates.
///
/// # Errors
///
/// Propagates any [`StoreError`] from the lookup, create, or update.
pub async fn reconcile_product<S: ProductStore>(
    store: &S,
    product: &NormalizedProduct,
    mode: ReconcileMode,
) -> Result<(ReconcileAction, StoredProduct), StoreError> {
    if mode == ReconcileMode::Upsert {
        if let Some(existing) = store.find_by_sku(&product.sku).await? {
            let stored = store.update(existing.id, product).await?;
            return Ok((ReconcileAction::Updated, stored));
        }
    }

    let stored = store.create(product).await?;
    Ok((ReconcileAction::Created, stored))
}
