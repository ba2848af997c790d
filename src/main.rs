//! hrobot-cli - command line client for the Hetzner Robot webservice
//!
//! Lists and inspects servers, SSH keys, IPs, reverse DNS entries and
//! failover IPs, and drives interactive rename, reversal, rescue and reset
//! workflows.

mod api;
mod cli;
mod config;
mod output;
mod prompt;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api::RobotClient;
use crate::cli::{App, Cli, Commands};
use crate::config::{Config, OutputFormat};
use crate::prompt::{PromptError, TerminalPrompt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if let Commands::Version = cli.command {
        cli::print_version();
        return Ok(());
    }

    // Load configuration
    let mut config = Config::load()?;
    if let Some(ref format) = cli.format {
        let format = OutputFormat::parse(format)
            .ok_or_else(|| anyhow!("Unknown output format: {}", format))?;
        config = config.with_output_format(format);
    }

    let client = RobotClient::new(&config)?;
    let mut app = App::new(client, TerminalPrompt::new(), config);

    // Execute command
    match cli::execute(&mut app, cli.command).await {
        Err(e) if matches!(e.downcast_ref::<PromptError>(), Some(PromptError::Aborted)) => {
            output::warning("Aborted");
            Ok(())
        }
        result => result,
    }
}
