use anyhow::Result;
use clap::Parser;
use keystone_console::{ConsoleSettings, commands::Commands};
use keystone_core::tracing::init_tracing;
use std::path::PathBuf;
use tracing::{debug, error};

/// Keystone console - user and membership administration
#[derive(Parser, Debug)]
#[command(name = "keystone", author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = ConsoleSettings::load(cli.config.as_deref())?;
    init_tracing(&settings.instrumentation())?;
    debug!(base_url = %settings.api.base_url, "settings loaded");

    let client = settings.client()?;
    let mut stdout = std::io::stdout().lock();

    if let Err(e) = cli.command.execute(&client, &mut stdout).await {
        error!("Command failed: {e:#}");
        return Err(e);
    }

    Ok(())
}
