//! Spendlog CLI
//!
//! Records expenses and prints spending analytics as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Record a spend for the configured owner
//! spendlog --owner $OWNER add --title "Lunch" --amount 12.50 --category Food
//!
//! # January statistics
//! spendlog --owner $OWNER monthly 2025 1
//!
//! # Last six weeks, oldest first
//! spendlog --owner $OWNER timeseries --period week --limit 6
//!
//! # Point at another database
//! SPENDLOG_DATABASE__POSTGRES_URL=postgres://... spendlog --owner $OWNER summary
//! ```

mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spendlog_analytics::ExpenseService;
use spendlog_db::Database;
use spendlog_types::OwnerId;

use crate::commands::Command;
use crate::config::AppConfig;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Spendlog - personal expense tracking and spending analytics
#[derive(Parser, Debug)]
#[command(name = "spendlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "SPENDLOG_CONFIG", global = true)]
    config: Option<String>,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SPENDLOG_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "SPENDLOG_LOG_FORMAT", global = true)]
    log_format: Option<String>,

    /// User whose expenses are read and written
    #[arg(long, env = "SPENDLOG_OWNER", global = true)]
    owner: Option<String>,

    #[command(subcommand)]
    command: Command,
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut app_config = AppConfig::load(cli.config.as_deref())?;

    if let Some(db_url) = cli.database_url {
        app_config.database.postgres_url = db_url;
    }
    if let Some(level) = cli.log_level {
        app_config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        app_config.logging.format = format;
    }

    init_logging(&app_config.logging);

    if let Some(output) = commands::run_offline(&cli.command)? {
        println!("{}", output);
        return Ok(());
    }

    let owner = parse_owner(cli.owner.as_deref())?;
    validate_config(&app_config)?;

    let db = init_database(&app_config.database).await?;
    let service = ExpenseService::new(db.expense_repo());

    tracing::debug!(owner = %owner, command = ?cli.command, "Dispatching command");
    let output = commands::run(&service, owner, cli.command, &app_config.queries).await?;
    println!("{}", output);

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging. Logs go to stderr so stdout stays valid JSON.
fn init_logging(config: &config::LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true).with_writer(std::io::stderr))
                .init();
        }
    }
}

fn parse_owner(raw: Option<&str>) -> anyhow::Result<OwnerId> {
    let Some(raw) = raw else {
        anyhow::bail!("An owner is required. Pass --owner or set SPENDLOG_OWNER.");
    };
    OwnerId::parse(raw).map_err(|e| anyhow::anyhow!("Invalid owner id {}: {}", raw, e))
}

/// Validate configuration
fn validate_config(config: &AppConfig) -> anyhow::Result<()> {
    if config.database.postgres_url.trim().is_empty() {
        anyhow::bail!("Database URL is empty. Set DATABASE_URL or database.postgres_url.");
    }
    if config.database.min_connections > config.database.max_connections {
        anyhow::bail!(
            "database.min_connections ({}) exceeds database.max_connections ({})",
            config.database.min_connections,
            config.database.max_connections
        );
    }
    if config.queries.page_size < 1 || config.queries.chart_limit < 1 {
        tracing::warn!("Query defaults below 1 will be rejected by every list or chart command");
    }
    Ok(())
}

/// Initialize database connection
async fn init_database(config: &config::DatabaseSettings) -> anyhow::Result<Database> {
    let db = Database::connect(&config.to_db_config()).await?;

    if config.run_migrations {
        db.migrate().await?;
    }

    let health = db.health_check().await;
    if !health.healthy {
        anyhow::bail!("Database health check failed");
    }
    tracing::info!(postgres = health.postgres, "Database health check passed");

    Ok(db)
}
