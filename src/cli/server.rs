//! Server commands

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use crate::api::models::{Rescue, RescueSetInput, ResetSetInput, ResetType, Server};
use crate::api::RobotApi;
use crate::cli::{chosen, inventory, rename, App};
use crate::output;
use crate::prompt::Prompt;

#[derive(Args, Debug)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub command: Option<ServerCommand>,
}

#[derive(Subcommand, Debug)]
pub enum ServerCommand {
    /// List all servers
    List,

    /// Show details of one interactively chosen server
    Get,

    /// Rename interactively chosen servers using a common prefix
    Rename,

    /// Withdraw the cancellation of a server
    Reverse,

    /// Activate the rescue system and reboot into it
    Rescue,

    /// Reset a server
    Reset {
        /// Reset type
        #[arg(short = 't', long = "type", value_enum, default_value_t = ResetType::Hw)]
        reset_type: ResetType,
    },

    /// Print an ansible inventory built from server names and datacenters
    AnsibleInventory,
}

pub async fn execute<C: RobotApi, P: Prompt>(app: &mut App<C, P>, args: ServerArgs) -> Result<()> {
    match args.command.unwrap_or(ServerCommand::List) {
        ServerCommand::List => {
            let servers = app.client.server_list().await?;

            output::print_output(&servers, &app.config.output_format, || {
                output::table_header(&["ID", "IP", "NAME", "DATACENTER", "CANCELLED"]);
                for server in &servers {
                    output::print_server(server);
                }
                output::total(servers.len(), "servers");
            })?;
        }

        ServerCommand::Get => {
            let chosen = app.select_server().await?;
            // the single-server endpoint carries more detail than the list
            let server = app.client.server_get(&chosen.server_ip).await?;

            output::print_output(&server, &app.config.output_format, || {
                print_server_details(&server);
            })?;
        }

        ServerCommand::Rename => rename_servers(app).await?,

        ServerCommand::Reverse => {
            let server = app.select_server().await?;
            if !app.confirm(&format!(
                "Really reverse server {} ({})?",
                server.server_name, server.server_ip
            ))? {
                return Ok(());
            }

            let cancellation = app.client.server_reverse(&server.server_ip).await?;
            output::success(&format!(
                "Server {} reversed, cancelled: {}",
                cancellation.server_ip, cancellation.cancelled
            ));
        }

        ServerCommand::Rescue => activate_rescue(app).await?,

        ServerCommand::Reset { reset_type } => {
            let server = app.select_server().await?;
            if !app.confirm(&format!(
                "Really reset ({}) server {} ({})?",
                reset_type.as_str(),
                server.server_name,
                server.server_ip
            ))? {
                return Ok(());
            }

            app.client
                .reset_set(&server.server_ip, &ResetSetInput { reset_type })
                .await?;
            output::success(&format!("Server {} reset", server.server_ip));
        }

        ServerCommand::AnsibleInventory => {
            let servers = app.client.server_list().await?;
            print!("{}", inventory::generate(&servers));
        }
    }

    Ok(())
}

fn print_server_details(server: &Server) {
    let subnets = if server.subnet.is_empty() {
        "-".to_string()
    } else {
        server
            .subnet
            .iter()
            .map(|s| format!("{}/{}", s.ip, s.mask))
            .collect::<Vec<_>>()
            .join(", ")
    };

    output::table_header(&["FIELD", "VALUE"]);
    output::field("number", server.server_number);
    output::field("ip", &server.server_ip);
    output::field("name", &server.server_name);
    output::field("data center", &server.dc);
    output::field("product", &server.product);
    output::field("status", &server.status);
    output::field("ips", server.ip.join(", "));
    output::field("subnets", subnets);
    output::field("traffic", &server.traffic);
    output::field("paid until", &server.paid_until);
    output::field("cancelled", server.cancelled);
}

async fn rename_servers<C: RobotApi, P: Prompt>(app: &mut App<C, P>) -> Result<()> {
    let servers = app.client.server_list().await?;
    let chosen = rename::choose_servers(&mut app.prompt, servers)?;

    if chosen.is_empty() {
        output::warning("No servers selected, nothing to rename");
        return Ok(());
    }

    let prefix = app.prompt.input("Add server name prefix")?;
    let prefix = prefix.trim();
    if prefix.is_empty() {
        bail!("Server name prefix must not be empty");
    }

    output::info(&format!("Chosen server prefix: {}", prefix));
    output::table_header(&["ID", "IP", "CURRENT NAME", "NEW NAME"]);
    for server in &chosen {
        println!(
            "{}\t{}\t{}\t{}",
            server.server_number,
            server.server_ip,
            server.server_name,
            rename::generate_server_name(server, prefix)
        );
    }
    output::total(chosen.len(), "servers");

    if !app.confirm(&format!(
        "Really set names as shown above for {} servers?",
        chosen.len()
    ))? {
        return Ok(());
    }

    let outcomes = rename::apply(&app.client, &chosen, prefix).await;
    let failed: Vec<String> = outcomes
        .iter()
        .filter(|o| o.result.is_err())
        .map(|o| format!("{} -> {}", o.server_ip, o.new_name))
        .collect();

    if !failed.is_empty() {
        bail!(
            "{} of {} renames failed: {}",
            failed.len(),
            outcomes.len(),
            failed.join(", ")
        );
    }

    output::success(&format!("Renamed {} servers", outcomes.len()));
    Ok(())
}

async fn activate_rescue<C: RobotApi, P: Prompt>(app: &mut App<C, P>) -> Result<()> {
    let server = app.select_server().await?;
    let options = app.client.boot_rescue_get(&server.server_ip).await?;

    if options.os.is_empty() || options.arch.is_empty() {
        bail!(
            "No rescue systems offered for {} (active: {})",
            server.server_ip,
            options.active
        );
    }

    let os_index = app
        .prompt
        .select("Select rescue operating system", &options.os)?;
    let os = chosen(&options.os, os_index)?.clone();
    output::info(&format!("Chosen OS: {}", os));

    let arch_labels: Vec<String> = options.arch.iter().map(|a| a.to_string()).collect();
    let arch_index = app
        .prompt
        .select("Select rescue operating system architecture", &arch_labels)?;
    let arch = *chosen(&options.arch, arch_index)?;
    output::info(&format!("Chosen arch: {}", arch));

    let mut authorized_key = None;
    if app.prompt.confirm("Use SSH key for rescue system?", true)? {
        let keys = app.client.key_list().await?;
        if keys.is_empty() {
            output::warning("No SSH keys in account, using password instead");
        } else {
            let labels: Vec<String> = keys
                .iter()
                .map(|k| format!("{} ({})", k.name, k.fingerprint))
                .collect();
            let key = chosen(&keys, app.prompt.select("Select key", &labels)?)?;
            output::info(&format!("Chosen key: {} {}", key.name, key.fingerprint));
            authorized_key = Some(key.fingerprint.clone());
        }
    } else {
        output::info("Chosen to use password instead of key.");
    }

    if !app.confirm(&format!(
        "Really activate rescue system and reboot server {} ({})?",
        server.server_name, server.server_ip
    ))? {
        return Ok(());
    }

    let use_password = authorized_key.is_none();
    let input = RescueSetInput {
        os,
        arch,
        authorized_key,
    };
    let rescue = app.client.boot_rescue_set(&server.server_ip, &input).await?;

    app.client
        .reset_set(
            &server.server_ip,
            &ResetSetInput {
                reset_type: ResetType::Hw,
            },
        )
        .await?;

    if use_password {
        match password_notice(&rescue) {
            Some(notice) => output::info(&notice),
            None => output::warning("The API returned no rescue password"),
        }
    }

    output::success("Rescue mode activated and server rebooted.");
    Ok(())
}

/// Line telling the user how to log into a password protected rescue system
fn password_notice(rescue: &Rescue) -> Option<String> {
    rescue
        .password
        .as_ref()
        .map(|password| format!("Password for accessing rescue mode: {}", password))
}
