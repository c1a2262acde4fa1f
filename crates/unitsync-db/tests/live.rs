//! Live integration tests for unitsync-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database from the sqlx
//! test harness, which needs `DATABASE_URL` pointing at a server it can
//! create databases on. Run with `cargo test -- --ignored`.

use unitsync_core::{DebugLogEntry, NormalizedProduct, StockFlag};
use unitsync_db::{
    append_debug_entries, clear_debug_log, complete_sync_run, count_products, create_sync_run,
    fail_sync_run, find_product_by_sku, insert_product, list_debug_entries, list_products,
    list_sync_runs, start_sync_run, trim_debug_log, try_acquire_sync_lock, update_product, DbError,
};

fn make_product(sku: &str, price: &str) -> NormalizedProduct {
    NormalizedProduct {
        title: "Acme X1".to_string(),
        description: String::new(),
        sku: sku.to_string(),
        price: price.to_string(),
        stock: StockFlag::InStock,
        vin: "1ACME".to_string(),
        model_year: "2024".to_string(),
        condition: "New".to_string(),
        color: "Red".to_string(),
        length: "12".to_string(),
        width: "5".to_string(),
        product_type: "simple".to_string(),
    }
}

// ---------------------------------------------------------------------------
// products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn insert_then_find_by_sku(pool: sqlx::PgPool) {
    let inserted = insert_product(&pool, &make_product("SN1", "1000"))
        .await
        .expect("insert");
    assert_eq!(inserted.status, "publish");
    assert_eq!(inserted.post_type, "product");

    let found = find_product_by_sku(&pool, "SN1")
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(found.id, inserted.id);
    assert!(find_product_by_sku(&pool, "missing").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn insert_allows_duplicate_skus(pool: sqlx::PgPool) {
    let first = insert_product(&pool, &make_product("SN1", "1000")).await.unwrap();
    insert_product(&pool, &make_product("SN1", "1000")).await.unwrap();

    assert_eq!(count_products(&pool).await.unwrap(), 2);
    let found = find_product_by_sku(&pool, "SN1").await.unwrap().unwrap();
    assert_eq!(found.id, first.id, "lookup returns the oldest row");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn update_overwrites_fields(pool: sqlx::PgPool) {
    let inserted = insert_product(&pool, &make_product("SN1", "1000")).await.unwrap();
    let mut changed = make_product("SN1", "900");
    changed.stock = StockFlag::OutOfStock;

    let updated = update_product(&pool, inserted.id, &changed).await.unwrap();
    assert_eq!(updated.price, "900");
    assert_eq!(updated.stock, 0);
    assert!(updated.updated_at >= inserted.updated_at);
    assert_eq!(list_products(&pool, 10).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn update_missing_id_is_not_found(pool: sqlx::PgPool) {
    let err = update_product(&pool, 9_999, &make_product("SN1", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound));
}

// ---------------------------------------------------------------------------
// sync_runs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn sync_run_lifecycle(pool: sqlx::PgPool) {
    let run = create_sync_run(&pool, "manual").await.unwrap();
    assert_eq!(run.status, "queued");

    start_sync_run(&pool, run.id).await.unwrap();
    complete_sync_run(&pool, run.id, 3).await.unwrap();

    let runs = list_sync_runs(&pool, 10).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, "succeeded");
    assert_eq!(runs[0].records_processed, 3);
    assert!(runs[0].completed_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn sync_run_cannot_complete_before_start(pool: sqlx::PgPool) {
    let run = create_sync_run(&pool, "cli").await.unwrap();
    let err = complete_sync_run(&pool, run.id, 0).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::InvalidSyncRunTransition {
            expected_status: "running",
            ..
        }
    ));

    fail_sync_run(&pool, run.id, "aborted").await.unwrap();
    let runs = list_sync_runs(&pool, 10).await.unwrap();
    assert_eq!(runs[0].status, "failed");
    assert_eq!(runs[0].error_message.as_deref(), Some("aborted"));
}

// ---------------------------------------------------------------------------
// debug_log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn debug_log_append_trim_and_clear(pool: sqlx::PgPool) {
    let entries: Vec<DebugLogEntry> = (0..5)
        .map(|i| DebugLogEntry::now(format!("entry {i}")))
        .collect();
    assert_eq!(append_debug_entries(&pool, &entries).await.unwrap(), 5);

    assert_eq!(trim_debug_log(&pool, 3).await.unwrap(), 2);
    let kept = list_debug_entries(&pool, 100).await.unwrap();
    let messages: Vec<&str> = kept.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, vec!["entry 2", "entry 3", "entry 4"]);

    assert_eq!(clear_debug_log(&pool).await.unwrap(), 3);
    assert!(list_debug_entries(&pool, 100).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn debug_log_stores_messages_containing_nul(pool: sqlx::PgPool) {
    let entries = vec![DebugLogEntry::now("Raw Response: [\u{0}]")];
    assert_eq!(append_debug_entries(&pool, &entries).await.unwrap(), 1);

    let kept = list_debug_entries(&pool, 10).await.unwrap();
    assert_eq!(kept[0].message, "Raw Response: [\u{FFFD}]");
}

// ---------------------------------------------------------------------------
// sync lock
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn sync_lock_is_exclusive_until_released(pool: sqlx::PgPool) {
    let held = try_acquire_sync_lock(&pool).await.unwrap().expect("first lock");
    assert!(try_acquire_sync_lock(&pool).await.unwrap().is_none());

    held.release().await.unwrap();
    let again = try_acquire_sync_lock(&pool).await.unwrap();
    assert!(again.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn dropped_sync_lock_is_released(pool: sqlx::PgPool) {
    let held = try_acquire_sync_lock(&pool).await.unwrap();
    assert!(held.is_some());
    drop(held);

    // The rollback is flushed when the connection goes back to the pool.
    let mut reacquired = None;
    for _ in 0..20 {
        reacquired = try_acquire_sync_lock(&pool).await.unwrap();
        if reacquired.is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    assert!(reacquired.is_some());
}
