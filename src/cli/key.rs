//! SSH key commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::RobotApi;
use crate::cli::App;
use crate::output;
use crate::prompt::Prompt;

#[derive(Args, Debug)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: Option<KeyCommand>,
}

#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// List all SSH keys
    List,
}

pub async fn execute<C: RobotApi, P: Prompt>(app: &mut App<C, P>, args: KeyArgs) -> Result<()> {
    match args.command.unwrap_or(KeyCommand::List) {
        KeyCommand::List => {
            let keys = app.client.key_list().await?;

            output::print_output(&keys, &app.config.output_format, || {
                output::table_header(&["NAME", "TYPE", "SIZE", "FINGERPRINT"]);
                for key in &keys {
                    output::print_key(key);
                }
                output::total(keys.len(), "keys");
            })?;
        }
    }

    Ok(())
}
