//! IP address commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::RobotApi;
use crate::cli::App;
use crate::output;
use crate::prompt::Prompt;

#[derive(Args, Debug)]
pub struct IpArgs {
    #[command(subcommand)]
    pub command: Option<IpCommand>,
}

#[derive(Subcommand, Debug)]
pub enum IpCommand {
    /// List all IPs, grouped by server
    List,
}

pub async fn execute<C: RobotApi, P: Prompt>(app: &mut App<C, P>, args: IpArgs) -> Result<()> {
    match args.command.unwrap_or(IpCommand::List) {
        IpCommand::List => {
            let mut ips = app.client.ip_list().await?;
            // stable: keeps API order within one server
            ips.sort_by(|a, b| a.server_ip.cmp(&b.server_ip));

            output::print_output(&ips, &app.config.output_format, || {
                output::table_header(&["IP", "SERVER IP", "SERVER NUMBER", "LOCKED"]);
                for ip in &ips {
                    output::print_ip(ip);
                }
                output::total(ips.len(), "IPs");
            })?;
        }
    }

    Ok(())
}
