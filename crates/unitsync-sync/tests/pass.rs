//! End-to-end sync passes against a `wiremock` Lightspeed endpoint and the
//! in-memory product store.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unitsync_core::{Credentials, NormalizedProduct, ReconcileMode, StockFlag, StoredProduct, SyncConfig};
use unitsync_lightspeed::LightspeedClient;
use unitsync_sync::{
    run_pass, AbortReason, DebugLog, FailureKind, MemoryProductStore, ProductStore, StoreError,
    SyncGuard, SyncOutcome, SyncReport, SyncService, TriggerSource,
};

fn config(base_url: &str, mode: ReconcileMode) -> SyncConfig {
    SyncConfig {
        base_url: base_url.to_owned(),
        credentials: Credentials::new("dealer", "s3cret"),
        fetch_interval_hours: 1,
        debug_enabled: true,
        request_timeout_secs: 5,
        accept_invalid_certs: false,
        user_agent: "unitsync-test/0.1".to_owned(),
        reconcile_mode: mode,
    }
}

async fn serve(body: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Unit"))
        .respond_with(body)
        .mount(&server)
        .await;
    server
}

async fn pass_once(
    server: &MockServer,
    mode: ReconcileMode,
    store: &MemoryProductStore,
    debug: &DebugLog,
) -> SyncReport {
    let config = config(&server.uri(), mode);
    let client = LightspeedClient::new(&config).expect("client");
    run_pass(&config, &client, store, debug).await
}

fn entries_starting_with(report: &SyncReport, prefix: &str) -> usize {
    report
        .log
        .iter()
        .filter(|e| e.message.starts_with(prefix))
        .count()
}

fn acme() -> Value {
    json!({
        "Make": "Acme",
        "Model": "X1",
        "StockNumber": "SN1",
        "WebPrice": "1000",
        "OnHold": ""
    })
}

#[tokio::test]
async fn single_available_unit_becomes_in_stock_product() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!([acme()]))).await;
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    let report = pass_once(&server, ReconcileMode::Upsert, &store, &debug).await;

    assert_eq!(report.outcome, SyncOutcome::Completed);
    assert_eq!((report.fetched, report.created, report.updated), (1, 1, 0));

    let products = store.products().await;
    assert_eq!(products.len(), 1);
    let product = &products[0].product;
    assert_eq!(product.title, "Acme X1");
    assert_eq!(product.sku, "SN1");
    assert_eq!(product.price, "1000");
    assert_eq!(product.stock, StockFlag::InStock);
    assert_eq!(products[0].status, "publish");
}

#[tokio::test]
async fn unit_missing_required_fields_is_skipped() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!([{"Make": "Acme"}]))).await;
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    let report = pass_once(&server, ReconcileMode::Upsert, &store, &debug).await;

    assert_eq!(report.outcome, SyncOutcome::Completed);
    assert_eq!(store.count().await.unwrap(), 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, FailureKind::Record);
    assert_eq!(entries_starting_with(&report, "Missing required data for Unit:"), 1);
}

#[tokio::test]
async fn invalid_units_do_not_stop_later_units() {
    let body = json!([{"Make": "Acme"}, acme(), 7]);
    let server = serve(ResponseTemplate::new(200).set_body_json(body)).await;
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    let report = pass_once(&server, ReconcileMode::Upsert, &store, &debug).await;

    assert_eq!(report.fetched, 3);
    assert_eq!(report.created, 1);
    let indexes: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
    assert_eq!(indexes, vec![0, 2]);
}

#[tokio::test]
async fn on_hold_values_map_to_stock_flag() {
    let body = json!([
        {"Make": "A", "Model": "1", "StockNumber": "S1", "WebPrice": "1", "OnHold": ""},
        {"Make": "A", "Model": "2", "StockNumber": "S2", "WebPrice": "1", "OnHold": "Smith"},
        {"Make": "A", "Model": "3", "StockNumber": "S3", "WebPrice": "1"}
    ]);
    let server = serve(ResponseTemplate::new(200).set_body_json(body)).await;
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    pass_once(&server, ReconcileMode::Upsert, &store, &debug).await;

    let stock: Vec<(String, StockFlag)> = store
        .products()
        .await
        .into_iter()
        .map(|p| (p.product.sku, p.product.stock))
        .collect();
    assert_eq!(
        stock,
        vec![
            ("S1".to_owned(), StockFlag::InStock),
            ("S2".to_owned(), StockFlag::OutOfStock),
            ("S3".to_owned(), StockFlag::OutOfStock),
        ]
    );
}

#[tokio::test]
async fn non_success_status_aborts_without_touching_store() {
    let server = serve(ResponseTemplate::new(401).set_body_string("Unauthorized")).await;
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    let report = pass_once(&server, ReconcileMode::Upsert, &store, &debug).await;

    assert!(matches!(
        report.outcome,
        SyncOutcome::Aborted { reason: AbortReason::Transport, .. }
    ));
    assert_eq!(store.count().await.unwrap(), 0);
    assert_eq!(entries_starting_with(&report, "Response Code: 401"), 1);
}

#[tokio::test]
async fn unreachable_endpoint_aborts_as_transport() {
    let config = config("http://127.0.0.1:1", ReconcileMode::Upsert);
    let client = LightspeedClient::new(&config).expect("client");
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    let report = run_pass(&config, &client, &store, &debug).await;

    assert!(matches!(
        report.outcome,
        SyncOutcome::Aborted { reason: AbortReason::Transport, .. }
    ));
    assert_eq!(store.count().await.unwrap(), 0);
    assert_eq!(entries_starting_with(&report, "Lightspeed Inventory Sync Error:"), 1);
}

#[tokio::test]
async fn empty_or_non_array_bodies_abort_as_payload() {
    for body in ["", "[]", r#"{"units":[]}"#, "not json"] {
        let server = serve(ResponseTemplate::new(200).set_body_string(body)).await;
        let store = MemoryProductStore::new();
        let debug = DebugLog::default();

        let report = pass_once(&server, ReconcileMode::Upsert, &store, &debug).await;

        assert!(
            matches!(
                report.outcome,
                SyncOutcome::Aborted { reason: AbortReason::Payload, .. }
            ),
            "body {body:?} gave {:?}",
            report.outcome
        );
        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(
            entries_starting_with(&report, "No valid data returned from the API"),
            1,
            "body {body:?}"
        );
    }
}

#[tokio::test]
async fn missing_credentials_abort_before_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([acme()])))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config(&server.uri(), ReconcileMode::Upsert);
    config.credentials = Credentials::new("dealer", "");
    let client = LightspeedClient::new(&config).expect("client");
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    let report = run_pass(&config, &client, &store, &debug).await;

    assert!(matches!(
        report.outcome,
        SyncOutcome::Aborted { reason: AbortReason::Configuration, .. }
    ));
    assert_eq!(
        debug.entries()[0].message,
        "API credentials are missing. Please provide both username and password."
    );
}

#[tokio::test]
async fn debug_disabled_records_nothing() {
    let server = serve(ResponseTemplate::new(200).set_body_string("[]")).await;
    let mut config = config(&server.uri(), ReconcileMode::Upsert);
    config.debug_enabled = false;
    let client = LightspeedClient::new(&config).expect("client");
    let debug = DebugLog::default();

    let report = run_pass(&config, &client, &MemoryProductStore::new(), &debug).await;

    assert!(!report.is_completed());
    assert!(report.log.is_empty());
    assert!(debug.is_empty());
}

#[tokio::test]
async fn debug_log_never_contains_password() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!([acme()]))).await;
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    pass_once(&server, ReconcileMode::Upsert, &store, &debug).await;

    let rendered = debug.render();
    assert!(rendered.contains("Username: dealer"));
    assert!(rendered.contains("Password length: 6"));
    assert!(!rendered.contains("s3cret"));
}

#[tokio::test]
async fn append_only_duplicates_on_second_pass() {
    let body = json!([acme(), {"Make": "Bolt", "Model": "Z", "StockNumber": "SN2", "WebPrice": "5"}]);
    let server = serve(ResponseTemplate::new(200).set_body_json(body)).await;
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    pass_once(&server, ReconcileMode::AppendOnly, &store, &debug).await;
    pass_once(&server, ReconcileMode::AppendOnly, &store, &debug).await;

    assert_eq!(store.count().await.unwrap(), 4);
}

#[tokio::test]
async fn upsert_keeps_one_product_per_sku_and_applies_changes() {
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    let first = serve(ResponseTemplate::new(200).set_body_json(json!([acme()]))).await;
    pass_once(&first, ReconcileMode::Upsert, &store, &debug).await;

    let mut changed = acme();
    changed["WebPrice"] = json!("950");
    changed["OnHold"] = json!("Deal 42");
    let second = serve(ResponseTemplate::new(200).set_body_json(json!([changed]))).await;
    let report = pass_once(&second, ReconcileMode::Upsert, &store, &debug).await;

    assert_eq!((report.created, report.updated), (0, 1));
    let products = store.products().await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product.price, "950");
    assert_eq!(products[0].product.stock, StockFlag::OutOfStock);
}

#[tokio::test]
async fn defaulted_optional_fields_are_logged() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!([acme()]))).await;
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    let report = pass_once(&server, ReconcileMode::Upsert, &store, &debug).await;

    let entry = report
        .log
        .iter()
        .find(|e| e.message.starts_with("Unit SN1 missing optional fields"))
        .expect("defaulted entry");
    assert!(entry.message.ends_with("VIN, ModelYear, Condition, Color, Length, Width"));
    assert_eq!(store.products().await[0].product.vin, "");
}

/// Store that rejects every write.
struct RejectingStore;

impl ProductStore for RejectingStore {
    async fn find_by_sku(&self, _sku: &str) -> Result<Option<StoredProduct>, StoreError> {
        Ok(None)
    }

    async fn create(&self, _product: &NormalizedProduct) -> Result<StoredProduct, StoreError> {
        Err(StoreError::Db(unitsync_db::DbError::Sqlx(sqlx::Error::PoolTimedOut)))
    }

    async fn update(
        &self,
        id: i64,
        _product: &NormalizedProduct,
    ) -> Result<StoredProduct, StoreError> {
        Err(StoreError::NotFound { id })
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(0)
    }
}

#[tokio::test]
async fn persistence_failure_skips_record_and_continues() {
    let body = json!([acme(), {"Make": "Bolt", "Model": "Z", "StockNumber": "SN2", "WebPrice": "5"}]);
    let server = serve(ResponseTemplate::new(200).set_body_json(body)).await;
    let config = config(&server.uri(), ReconcileMode::Upsert);
    let client = LightspeedClient::new(&config).expect("client");
    let debug = DebugLog::default();

    let report = run_pass(&config, &client, &RejectingStore, &debug).await;

    assert_eq!(report.outcome, SyncOutcome::Completed);
    assert_eq!(report.failures_of(FailureKind::Persistence), 2);
    assert_eq!(entries_starting_with(&report, "Failed to create product for Unit:"), 2);
    assert_eq!(report.failures[1].sku.as_deref(), Some("SN2"));
    assert!(report.failures[0].error.contains("pool timed out"));
}

#[tokio::test]
async fn overlapping_trigger_is_skipped() {
    let server = serve(
        ResponseTemplate::new(200)
            .set_body_json(json!([acme()]))
            .set_delay(Duration::from_millis(200)),
    )
    .await;
    let config = config(&server.uri(), ReconcileMode::Upsert);
    let client = LightspeedClient::new(&config).expect("client");
    let service = SyncService::new(config, client, MemoryProductStore::new(), 50);

    let (first, second) = tokio::join!(
        service.trigger(TriggerSource::Scheduler),
        service.trigger(TriggerSource::Manual)
    );

    assert_eq!(first.outcome, SyncOutcome::Completed);
    assert_eq!(second.outcome, SyncOutcome::Skipped);
    assert_eq!(service.store().count().await.unwrap(), 1);
    assert!(!service.is_running());

    let third = service.trigger(TriggerSource::Manual).await;
    assert_eq!(third.outcome, SyncOutcome::Completed);
    assert_eq!(third.updated, 1);
}

#[tokio::test]
async fn debug_log_is_bounded_across_passes() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!([acme()]))).await;
    let store = MemoryProductStore::new();
    let debug = DebugLog::new(5);

    for _ in 0..3 {
        pass_once(&server, ReconcileMode::Upsert, &store, &debug).await;
    }

    assert_eq!(debug.len(), 5);
    assert!(debug.entries()[4]
        .message
        .starts_with("Lightspeed Inventory Sync Finished"));
}

#[tokio::test]
async fn services_sharing_a_guard_never_overlap() {
    let server = serve(
        ResponseTemplate::new(200)
            .set_body_json(json!([acme()]))
            .set_delay(Duration::from_millis(200)),
    )
    .await;
    let config = config(&server.uri(), ReconcileMode::Upsert);
    let guard = SyncGuard::new();
    let scheduler = SyncService::with_guard(
        config.clone(),
        LightspeedClient::new(&config).expect("client"),
        MemoryProductStore::new(),
        50,
        guard.clone(),
    );
    let manual = SyncService::with_guard(
        config.clone(),
        LightspeedClient::new(&config).expect("client"),
        MemoryProductStore::new(),
        50,
        guard,
    );

    let (first, second) = tokio::join!(
        scheduler.trigger(TriggerSource::Scheduler),
        manual.trigger(TriggerSource::Cli)
    );

    let skipped = [&first, &second]
        .iter()
        .filter(|r| r.outcome == SyncOutcome::Skipped)
        .count();
    assert_eq!(skipped, 1);
    let stored = scheduler.store().count().await.unwrap() + manual.store().count().await.unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn each_trigger_reports_only_its_own_bounded_log() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!([acme()]))).await;
    let config = config(&server.uri(), ReconcileMode::Upsert);
    let client = LightspeedClient::new(&config).expect("client");
    let service = SyncService::new(config, client, MemoryProductStore::new(), 3);

    for _ in 0..2 {
        let report = service.trigger(TriggerSource::Manual).await;
        assert_eq!(report.log.len(), 3);
        assert!(report.log[2]
            .message
            .starts_with("Lightspeed Inventory Sync Finished"));
        assert_eq!(entries_starting_with(&report, "Lightspeed Inventory Sync Started"), 0);
    }
    assert_eq!(service.debug_log_capacity(), 3);
}

#[tokio::test]
async fn validated_payload_is_logged_once_before_reconciling() {
    let body = json!([acme(), {"Make": "Bolt"}]);
    let server = serve(ResponseTemplate::new(200).set_body_json(body)).await;
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    let report = pass_once(&server, ReconcileMode::Upsert, &store, &debug).await;

    let data: Vec<&str> = report
        .log
        .iter()
        .map(|e| e.message.as_str())
        .filter(|m| m.starts_with("Lightspeed Inventory Sync Data: "))
        .collect();
    assert_eq!(data.len(), 1);
    assert!(data[0].contains(r#""StockNumber":"SN1""#));
    assert!(data[0].contains(r#""Make":"Bolt""#));

    let data_at = report
        .log
        .iter()
        .position(|e| e.message.starts_with("Lightspeed Inventory Sync Data: "));
    let missing_at = report
        .log
        .iter()
        .position(|e| e.message.starts_with("Missing required data for Unit:"));
    assert!(data_at < missing_at);
}

#[tokio::test]
async fn payload_failures_do_not_log_data() {
    let server = serve(ResponseTemplate::new(200).set_body_string("[]")).await;
    let store = MemoryProductStore::new();
    let debug = DebugLog::default();

    let report = pass_once(&server, ReconcileMode::Upsert, &store, &debug).await;

    assert_eq!(entries_starting_with(&report, "Lightspeed Inventory Sync Data:"), 0);
}
