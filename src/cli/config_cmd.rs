//! Config command

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use crate::api::RobotApi;
use crate::cli::App;
use crate::output;
use crate::prompt::Prompt;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Test API connection and credentials
    Test,
}

pub async fn execute<C: RobotApi, P: Prompt>(app: &mut App<C, P>, args: ConfigArgs) -> Result<()> {
    let config = &app.config;

    match args.command {
        ConfigCommand::Show => {
            output::info("Current configuration:");
            println!("  User: {}", config.user);
            println!("  Password: (set)");
            println!("  Base URL: {}", config.base_url);
            println!("  Timeout: {}s", config.timeout.as_secs());
            println!("  Output Format: {:?}", config.output_format);
            println!("  Environment file: .env (current directory)");
        }

        ConfigCommand::Test => {
            output::info(&format!("Testing API connection to {} ...", config.base_url));

            let servers = match app.client.server_list().await {
                Ok(servers) => servers,
                Err(e) if e.status() == Some(401) => {
                    bail!(
                        "Credentials for {} were rejected: {}",
                        config.user,
                        e.body().unwrap_or_default()
                    )
                }
                Err(e) => return Err(e.into()),
            };
            output::success(&format!(
                "Credentials are valid, {} servers visible",
                servers.len()
            ));
        }
    }

    Ok(())
}
