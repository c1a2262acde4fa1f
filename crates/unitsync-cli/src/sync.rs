//! `sync` command handlers.

use clap::Subcommand;
use unitsync_core::{AppConfig, SyncConfig};
use unitsync_lightspeed::LightspeedClient;
use unitsync_sync::{
    run_tracked_pass, MemoryProductStore, PgProductStore, SyncOutcome, SyncReport, SyncService,
    TriggerSource,
};

use crate::connect;

/// Sub-commands available under `sync`.
#[derive(Debug, Subcommand)]
pub enum SyncCommands {
    /// Fetch the Lightspeed unit feed and reconcile it into the product store
    Run {
        /// Fetch, validate and normalize only; print what would be written
        #[arg(long)]
        dry_run: bool,
    },
    /// List recent sync runs
    History {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

pub(crate) async fn run(config: &AppConfig, command: SyncCommands) -> anyhow::Result<()> {
    match command {
        SyncCommands::Run { dry_run: true } => run_dry(config).await,
        SyncCommands::Run { dry_run: false } => run_sync(config).await,
        SyncCommands::History { limit } => history(config, limit).await,
    }
}

async fn run_sync(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let sync_config = SyncConfig::from_app_config(config);
    let client = LightspeedClient::new(&sync_config)?;
    let service = SyncService::new(
        sync_config,
        client,
        PgProductStore::new(pool.clone()),
        config.debug_log_capacity,
    );

    let report = run_tracked_pass(&service, &pool, TriggerSource::Cli).await?;
    finish(&report)
}

/// Runs the pass against an in-memory store seeded empty, so every valid
/// unit shows up as a create.
async fn run_dry(config: &AppConfig) -> anyhow::Result<()> {
    let sync_config = SyncConfig::from_app_config(config);
    let client = LightspeedClient::new(&sync_config)?;
    let service = SyncService::new(
        sync_config,
        client,
        MemoryProductStore::new(),
        config.debug_log_capacity,
    );

    let report = service.trigger(TriggerSource::Cli).await;

    for stored in service.store().products().await {
        println!("dry-run: would write {}", serde_json::to_string(&stored.product)?);
    }
    for entry in &report.log {
        println!("{}", entry.line());
    }
    finish(&report)
}

fn finish(report: &SyncReport) -> anyhow::Result<()> {
    println!("sync {}", report.summary());
    for failure in &report.failures {
        println!(
            "  unit #{} ({}): {}",
            failure.index,
            failure.sku.as_deref().unwrap_or("no sku"),
            failure.error
        );
    }

    match &report.outcome {
        SyncOutcome::Aborted { message, .. } => anyhow::bail!("sync pass aborted: {message}"),
        SyncOutcome::Skipped => {
            println!("another sync pass is running; nothing was done");
            Ok(())
        }
        SyncOutcome::Completed => Ok(()),
    }
}

async fn history(config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let runs = unitsync_db::list_sync_runs(&pool, limit).await?;
    if runs.is_empty() {
        println!("no sync runs recorded");
        return Ok(());
    }

    for run in runs {
        let started = run
            .started_at
            .map_or_else(|| "-".to_owned(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string());
        println!(
            "{:>6}  {:<10} {:<9} {}  processed={}{}",
            run.id,
            run.trigger_source,
            run.status,
            started,
            run.records_processed,
            run.error_message
                .map(|m| format!("  error={m}"))
                .unwrap_or_default()
        );
    }
    Ok(())
}
