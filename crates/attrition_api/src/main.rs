//! Employee attrition prediction service
//!
//! Serves predictions over HTTP and manages the employee feature store.

use core::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use attrition_api::commands;
use clap::{Parser, Subcommand};
use config::Config;
use database::{create_pool, run_migrations};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Employee attrition prediction service
#[derive(Parser)]
#[command(name = "attrition")]
#[command(about = "Scores employees for attrition risk and logs every prediction")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP prediction service
    Serve {
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Path to the model bundle (overrides `MODEL_PATH`)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Run database migrations
    Migrate,

    /// Import employee records from a JSON Lines file
    Import {
        /// Path to the JSON Lines file
        #[arg(short, long)]
        file: PathBuf,

        /// Field holding the ground-truth label
        #[arg(short, long, default_value = "démission")]
        target_field: String,
    },

    /// Score one feature object without logging it
    Score {
        /// Features as a JSON object, e.g. '{"age": 35}'
        #[arg(short, long)]
        features: String,

        /// Path to the model bundle (overrides `MODEL_PATH`)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { bind, model } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(model) = model {
                config.model_path = model;
            }
            let pool = create_pool(&config.database_url).await?;
            commands::serve::run(pool, &config).await?;
        }
        Commands::Migrate => {
            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;
            info!("Migrations completed successfully");
        }
        Commands::Import { file, target_field } => {
            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;
            commands::import::run(&pool, &file, &target_field).await?;
        }
        Commands::Score { features, model } => {
            let model_path = model.unwrap_or(config.model_path);
            commands::score::run(&model_path, &features)?;
        }
    }

    Ok(())
}
