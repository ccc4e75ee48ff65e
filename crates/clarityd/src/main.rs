//! Clarity Daemon - debt-clarity plan service
//!
//! Sends free-form financial text to a generative model and returns a
//! repaired, schema-conformant plan.

use anyhow::Result;
use clap::{Parser, Subcommand};
use clarity_shared::TrustedInputs;
use clarityd::commands;
use clarityd::config::Config;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clarityd")]
#[command(about = "Clarity - calm, structured debt plans from messy text", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to /etc/clarity/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve,

    /// Normalize a captured model reply and print the result
    Normalize {
        /// File containing the model's reply (JSON, optionally fenced)
        #[arg(long)]
        input: PathBuf,

        /// Trusted monthly salary
        #[arg(long)]
        salary: Option<f64>,

        /// Trusted monthly essential expenses
        #[arg(long)]
        essentials: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref());

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve => {
            info!("Clarity Daemon v{} starting", env!("CARGO_PKG_VERSION"));
            commands::serve(&config).await
        }
        Commands::Normalize {
            input,
            salary,
            essentials,
        } => {
            let result = commands::normalize_file(&input, &TrustedInputs::new(salary, essentials))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}
