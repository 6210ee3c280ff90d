//! adsentry - AI agent that watches ad platform performance

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

mod commands;

use commands::{alerts_command, analyze_command, init_command, report_command, status_command};

/// adsentry - ad performance monitoring agent
#[derive(Parser)]
#[command(name = "adsentry")]
#[command(about = "AI agent that watches ad platform performance")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config and data directory
    Init,
    /// Run one analysis over a rows file
    Analyze {
        /// JSON file with aggregated platform-day rows
        #[arg(short, long)]
        data: PathBuf,
        /// Print the full decision record as JSON
        #[arg(short, long)]
        json: bool,
        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// List persisted alerts
    Alerts {
        /// Remove all persisted alerts
        #[arg(long)]
        clear: bool,
    },
    /// Show the latest report
    Report,
    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Analyze { verbose: true, .. }) {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let result = match cli.command {
        Commands::Init => init_command().await,
        Commands::Analyze { data, json, .. } => analyze_command(data, json).await,
        Commands::Alerts { clear } => alerts_command(clear).await,
        Commands::Report => report_command().await,
        Commands::Status => status_command().await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
