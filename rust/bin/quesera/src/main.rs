//! `quesera` — command-line front end for the farm production and account stores.
//!
//! Usage:
//!   quesera [--config PATH] [--data-dir DIR] [--db PATH] [--memory] <command>
//!
//! Settings come from the TOML file (default `./quesera.toml`) and are
//! overridden by flags. Output is pretty-printed JSON.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use quesera_core::{Latency, ServiceConfig};
use tracing::debug;

use commands::{BatchAction, ProfileAction, SecurityAction};

/// Quesera farm-management CLI.
#[derive(Parser, Debug)]
#[command(name = "quesera", about = "Cheese production batches and account settings")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short = 'c', long = "config", global = true, default_value = "quesera.toml")]
    config: PathBuf,

    /// Data directory (seed records, default database location).
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Database file (overrides `{data-dir}/quesera.redb`).
    #[arg(long = "db", global = true)]
    db: Option<PathBuf>,

    /// Keep everything in memory for this run.
    #[arg(long = "memory", global = true)]
    memory: bool,

    /// Simulated save latency in milliseconds.
    #[arg(long = "latency-ms", global = true)]
    latency_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Production batches.
    Batch {
        #[command(subcommand)]
        action: BatchAction,
    },

    /// The user profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Password, two-factor and login activity.
    Security {
        #[command(subcommand)]
        action: SecurityAction,
    },
}

impl Cli {
    /// File settings overridden by flags.
    fn service_config(&self) -> anyhow::Result<ServiceConfig> {
        let mut config = ServiceConfig::load(&self.config)?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(db) = &self.db {
            config.db_path = Some(db.clone());
        }
        if self.memory {
            config.in_memory = true;
        }
        if let Some(ms) = self.latency_ms {
            config.latency = Duration::from_millis(ms);
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.service_config()?;
    debug!(?config, "resolved configuration");

    let kv = config.open_store()?;

    match cli.command {
        Commands::Batch { action } => {
            let store = Arc::new(production::BatchStore::new(kv));
            let service = production::ProductionService::new(store, Latency::new(config.latency));
            commands::batch::run(&service, action).await
        }
        Commands::Profile { action } => {
            commands::profile::run(&account::ProfileStore::new(kv), action)
        }
        Commands::Security { action } => {
            commands::security::run(&account::SecurityStore::new(kv), action)
        }
    }
}
