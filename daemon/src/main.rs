//! accord: run the reference governance scenario or inspect configuration.

mod config;
mod demo;

use accord_types::SECS_PER_DAY;
use accord_utils::{format_duration, init_logging, LogFormat};
use clap::Parser;
use config::AccordConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "accord", about = "Confidential governance ledger tooling")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base; CLI
    /// flags and env vars override them.
    #[arg(long, env = "ACCORD_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ACCORD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output: "human" or "json".
    #[arg(long, env = "ACCORD_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the reference scenario and print the decrypted results.
    Demo {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base = match cli.config {
        Some(ref path) => AccordConfig::load(path)?,
        None => AccordConfig::default(),
    };
    let config = base.merge(cli.log_level, cli.log_format);

    init_logging(config.log_format, &config.log_level)?;
    if let Some(ref path) = cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Demo { json } => {
            tracing::info!(
                "Running scenario (attestations valid for {})",
                format_duration(u64::from(config.session.duration_days) * SECS_PER_DAY)
            );
            let report = demo::run(&config).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("initiatives          {}", report.initiatives);
                println!("total requested      {}", report.total_requested);
                println!("total allocated      {}", report.total_allocated);
                println!("total priority       {}", report.total_priority);
                println!("snapshot requested   {}", report.snapshot_requested);
                println!("snapshot allocated   {}", report.snapshot_allocated);
                println!("snapshot remaining   {}", report.snapshot_remaining);
                println!("combined priority    {}", report.combined_priority);
                println!("proposer allocation  {}", report.proposer_allocation);
                println!("reviewed detail      {}", report.reviewed_detail);
            }
        }
        Command::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}
