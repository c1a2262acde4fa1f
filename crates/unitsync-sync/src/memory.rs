//! In-process [`ProductStore`], used for dry runs and tests.

use chrono::Utc;
use tokio::sync::Mutex;
use unitsync_core::{NormalizedProduct, StoredProduct};

use crate::error::StoreError;
use crate::store::ProductStore;

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    products: Vec<StoredProduct>,
}

#[derive(Debug, Default)]
pub struct MemoryProductStore {
    state: Mutex<MemoryState>,
}

impl MemoryProductStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored products in insertion order.
    pub async fn products(&self) -> Vec<StoredProduct> {
        self.state.lock().await.products.clone()
    }
}

impl ProductStore for MemoryProductStore {
    async fn find_by_sku(&self, sku: &str) -> Result<Option<StoredProduct>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .products
            .iter()
            .find(|p| p.product.sku == sku)
            .cloned())
    }

    async fn create(&self, product: &NormalizedProduct) -> Result<StoredProduct, StoreError> {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let now = Utc::now();
        let stored = StoredProduct {
            id: state.next_id,
            status: StoredProduct::STATUS_PUBLISH.to_owned(),
            post_type: StoredProduct::POST_TYPE_PRODUCT.to_owned(),
            product: product.clone(),
            created_at: now,
            updated_at: now,
        };
        state.products.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: i64,
        product: &NormalizedProduct,
    ) -> Result<StoredProduct, StoreError> {
        let mut state = self.state.lock().await;
        let stored = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound { id })?;
        stored.product = product.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.state.lock().await.products.len())
    }
}
