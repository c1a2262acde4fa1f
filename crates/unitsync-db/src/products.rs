//! Database operations for `products`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use unitsync_core::{NormalizedProduct, StockFlag, StoredProduct};

use crate::DbError;

const PRODUCT_COLUMNS: &str = "id, sku, title, description, price, stock, vin, model_year, \
     condition, color, length, width, product_type, status, post_type, created_at, updated_at";

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub sku: String,
    pub title: String,
    pub description: String,
    pub price: String,
    /// `0` or `1`, enforced by a `CHECK` constraint.
    pub stock: i32,
    pub vin: String,
    pub model_year: String,
    pub condition: String,
    pub color: String,
    pub length: String,
    pub width: String,
    pub product_type: String,
    pub status: String,
    pub post_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for StoredProduct {
    fn from(row: ProductRow) -> Self {
        let stock = if row.stock == 1 {
            StockFlag::InStock
        } else {
            StockFlag::OutOfStock
        };
        StoredProduct {
            id: row.id,
            status: row.status,
            post_type: row.post_type,
            product: NormalizedProduct {
                title: row.title,
                description: row.description,
                sku: row.sku,
                price: row.price,
                stock,
                vin: row.vin,
                model_year: row.model_year,
                condition: row.condition,
                color: row.color,
                length: row.length,
                width: row.width,
                product_type: row.product_type,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Inserts a new published product row without checking for an existing sku.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_product(
    pool: &PgPool,
    product: &NormalizedProduct,
) -> Result<ProductRow, DbError> {
    let sql = format!(
        "INSERT INTO products \
             (sku, title, description, price, stock, vin, model_year, condition, \
              color, length, width, product_type, status, post_type) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         RETURNING {PRODUCT_COLUMNS}"
    );

    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(&product.sku)
        .bind(&product.title)
        .bind(&product.description)
        .bind(&product.price)
        .bind(product.stock.as_i32())
        .bind(&product.vin)
        .bind(&product.model_year)
        .bind(&product.condition)
        .bind(&product.color)
        .bind(&product.length)
        .bind(&product.width)
        .bind(&product.product_type)
        .bind(StoredProduct::STATUS_PUBLISH)
        .bind(StoredProduct::POST_TYPE_PRODUCT)
        .fetch_one(pool)
        .await?;

    Ok(row)
}

/// Overwrites every synced attribute of product `id` and bumps `updated_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    product: &NormalizedProduct,
) -> Result<ProductRow, DbError> {
    let sql = format!(
        "UPDATE products SET \
             sku          = $2, \
             title        = $3, \
             description  = $4, \
             price        = $5, \
             stock        = $6, \
             vin          = $7, \
             model_year   = $8, \
             condition    = $9, \
             color        = $10, \
             length       = $11, \
             width        = $12, \
             product_type = $13, \
             updated_at   = NOW() \
         WHERE id = $1 \
         RETURNING {PRODUCT_COLUMNS}"
    );

    sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .bind(&product.sku)
        .bind(&product.title)
        .bind(&product.description)
        .bind(&product.price)
        .bind(product.stock.as_i32())
        .bind(&product.vin)
        .bind(&product.model_year)
        .bind(&product.condition)
        .bind(&product.color)
        .bind(&product.length)
        .bind(&product.width)
        .bind(&product.product_type)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Returns the oldest product row carrying `sku`, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_product_by_sku(pool: &PgPool, sku: &str) -> Result<Option<ProductRow>, DbError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = $1 ORDER BY id LIMIT 1");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(sku)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lists products, most recently updated first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(pool: &PgPool, limit: i64) -> Result<Vec<ProductRow>, DbError> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY updated_at DESC, id DESC LIMIT $1"
    );
    let rows = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Counts all product rows, duplicates included.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_products(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
