use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product type taxonomy term attached to every synced product.
pub const PRODUCT_TYPE_SIMPLE: &str = "simple";

/// Stock flag persisted with each product: `1` in stock, `0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum StockFlag {
    OutOfStock,
    InStock,
}

impl StockFlag {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            StockFlag::OutOfStock => 0,
            StockFlag::InStock => 1,
        }
    }
}

impl From<StockFlag> for i32 {
    fn from(flag: StockFlag) -> Self {
        flag.as_i32()
    }
}

impl TryFrom<i32> for StockFlag {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StockFlag::OutOfStock),
            1 => Ok(StockFlag::InStock),
            other => Err(format!("stock flag must be 0 or 1, got {other}")),
        }
    }
}

/// A Lightspeed unit mapped onto the canonical product shape.
///
/// Text fields are the upstream values, unmodified. Optional upstream
/// attributes that were absent are stored as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    /// `Make` and `Model` joined by a single space, e.g. `"Acme X1"`.
    pub title: String,
    /// Upstream `CodeName`, or empty.
    pub description: String,
    /// Upstream `StockNumber`; the natural key for reconciliation.
    pub sku: String,
    /// Upstream `WebPrice`, as sent.
    pub price: String,
    pub stock: StockFlag,
    pub vin: String,
    pub model_year: String,
    pub condition: String,
    pub color: String,
    pub length: String,
    pub width: String,
    /// Always [`PRODUCT_TYPE_SIMPLE`].
    pub product_type: String,
}

/// A persisted product as returned by a product store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProduct {
    pub id: i64,
    /// Publication status; synced products are always `"publish"`.
    pub status: String,
    /// Entity kind; synced products are always `"product"`.
    pub post_type: String,
    pub product: NormalizedProduct,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredProduct {
    pub const STATUS_PUBLISH: &'static str = "publish";
    pub const POST_TYPE_PRODUCT: &'static str = "product";
}
