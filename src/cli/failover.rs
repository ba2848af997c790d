//! Failover IP commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::RobotApi;
use crate::cli::{chosen, App};
use crate::output;
use crate::prompt::Prompt;

#[derive(Args, Debug)]
pub struct FailoverArgs {
    #[command(subcommand)]
    pub command: Option<FailoverCommand>,
}

#[derive(Subcommand, Debug)]
pub enum FailoverCommand {
    /// List all failover IPs
    List,

    /// Show one interactively chosen failover IP
    Get,
}

pub async fn execute<C: RobotApi, P: Prompt>(
    app: &mut App<C, P>,
    args: FailoverArgs,
) -> Result<()> {
    match args.command.unwrap_or(FailoverCommand::List) {
        FailoverCommand::List => {
            let failovers = app.client.failover_list().await?;

            output::print_output(&failovers, &app.config.output_format, || {
                output::table_header(&["IP", "SERVER NUMBER", "ACTIVE SERVER IP"]);
                for failover in &failovers {
                    output::print_failover(failover);
                }
                output::total(failovers.len(), "failover IPs");
            })?;
        }

        FailoverCommand::Get => {
            let failovers = app.client.failover_list().await?;
            let labels: Vec<String> = failovers
                .iter()
                .map(|f| {
                    format!(
                        "{} ({})",
                        f.ip,
                        f.active_server_ip.as_deref().unwrap_or("unrouted")
                    )
                })
                .collect();

            let index = app.prompt.select("Select failover IP", &labels)?;
            let entry = chosen(&failovers, index)?;
            output::info(&format!("Chosen failover IP: {}", entry.ip));

            let failover = app.client.failover_get(&entry.ip).await?;

            output::print_output(&failover, &app.config.output_format, || {
                output::table_header(&["FIELD", "VALUE"]);
                output::field("ip", &failover.ip);
                output::field("net mask", &failover.netmask);
                output::field("server number", failover.server_number);
                output::field("server ip", &failover.server_ip);
                output::field(
                    "active server ip",
                    failover.active_server_ip.as_deref().unwrap_or("-"),
                );
            })?;
        }
    }

    Ok(())
}
