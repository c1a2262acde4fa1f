mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use unitsync_core::SyncConfig;
use unitsync_lightspeed::LightspeedClient;
use unitsync_sync::{PgProductStore, SyncService};

use crate::{
    api::{build_app, AppState},
    middleware::BearerAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = unitsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(?config, "configuration loaded");
    let auth = BearerAuth::from_config(&config)?;

    let pool_config = unitsync_db::PoolConfig::from_app_config(&config);
    let pool = unitsync_db::connect_pool(&config.database_url, pool_config).await?;
    unitsync_db::run_migrations(&pool).await?;

    let sync_config = SyncConfig::from_app_config(&config);
    let client = LightspeedClient::new(&sync_config)?;
    let service = SyncService::new(
        sync_config,
        client,
        PgProductStore::new(pool.clone()),
        config.debug_log_capacity,
    );
    let state = AppState {
        pool,
        service: Arc::new(service),
    };

    let _scheduler = scheduler::build_scheduler(state.clone()).await?;

    let app = build_app(state, auth);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "unitsync-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
