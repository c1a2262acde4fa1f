mod sync;

use clap::{Parser, Subcommand};
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;
use unitsync_core::{render_debug_log, AppConfig, DebugLogEntry};

use crate::sync::SyncCommands;

#[derive(Debug, Parser)]
#[command(name = "unitsync-cli")]
#[command(about = "Lightspeed inventory sync command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a sync pass or inspect past runs
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Inspect synced products
    Products {
        #[command(subcommand)]
        command: ProductsCommands,
    },
    /// Show or clear the sync debug log
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ProductsCommands {
    /// List products, most recently updated first
    List {
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
}

#[derive(Debug, Subcommand)]
enum DebugCommands {
    /// Print the retained debug log
    Show,
    /// Delete every debug log entry
    Clear,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("unitsync-cli ready; run with --help to list commands");
        return Ok(());
    };

    let config = unitsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Sync { command } => sync::run(&config, command).await,
        Commands::Products {
            command: ProductsCommands::List { limit },
        } => list_products(&config, limit).await,
        Commands::Debug { command } => {
            let pool = connect(&config).await?;
            match command {
                DebugCommands::Show => show_debug_log(&pool, &config).await,
                DebugCommands::Clear => {
                    let removed = unitsync_db::clear_debug_log(&pool).await?;
                    println!("debug log cleared ({removed} entries removed)");
                    Ok(())
                }
            }
        }
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    unitsync_db::health_check(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = unitsync_db::run_migrations(&pool).await?;
                    println!("migrations applied: {applied}");
                }
            }
            Ok(())
        }
    }
}

pub(crate) async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool_config = unitsync_db::PoolConfig::from_app_config(config);
    let pool = unitsync_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

async fn list_products(config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let rows = unitsync_db::list_products(&pool, limit).await?;
    if rows.is_empty() {
        println!("no products");
        return Ok(());
    }

    for row in rows {
        println!(
            "{:>6}  {:<16} {:<32} {:>10}  stock={}",
            row.id, row.sku, row.title, row.price, row.stock
        );
    }
    Ok(())
}

async fn show_debug_log(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let limit = i64::try_from(config.debug_log_capacity).unwrap_or(i64::MAX);
    let entries: Vec<DebugLogEntry> = unitsync_db::list_debug_entries(pool, limit)
        .await?
        .into_iter()
        .map(DebugLogEntry::from)
        .collect();

    if entries.is_empty() {
        println!("debug log is empty");
    } else {
        println!("{}", render_debug_log(&entries));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
