use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod credentials;

#[derive(Parser)]
#[command(name = "fedi-backfill")]
#[command(about = "Backfill a user's Mastodon posts into a target instance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, reconstruct, filter and write the SQL script
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Overrides `output` from the config file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the posts that would be written, as JSON
    Dump {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the prepared statement declaration
    Template,
}

/// `RUST_LOG` directives as given, or `info` when unset, blank or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => commands::run::run(config, output).await?,
        Commands::Dump { config } => commands::dump::run(config).await?,
        Commands::Template => commands::template::run(),
    }

    Ok(())
}
