//! The inventory sync pass: fetch a Lightspeed unit snapshot, validate and
//! normalize each record, and reconcile it against the product store.

pub mod debug;
pub mod error;
pub mod fetch;
pub mod guard;
pub mod memory;
pub mod pass;
pub mod postgres;
pub mod reconcile;
pub mod report;
pub mod service;
pub mod store;

pub use debug::DebugLog;
pub use error::{StoreError, SyncError};
pub use fetch::UnitFetcher;
pub use guard::{SyncGuard, SyncPermit};
pub use memory::MemoryProductStore;
pub use pass::run_pass;
pub use postgres::{run_tracked_pass, PgProductStore};
pub use reconcile::{reconcile_product, ReconcileAction};
pub use report::{AbortReason, FailureKind, RecordFailure, SyncOutcome, SyncReport};
pub use service::{SyncService, TriggerSource};
pub use store::ProductStore;
