//! CLI commands module

pub mod config_cmd;
pub mod failover;
pub mod inventory;
pub mod ip;
pub mod key;
pub mod rdns;
pub mod rename;
pub mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::models::Server;
use crate::api::RobotApi;
use crate::config::Config;
use crate::output;
use crate::prompt::Prompt;

/// hrobot-cli - Hetzner Robot webservice CLI
#[derive(Parser, Debug)]
#[command(name = "hrobot-cli")]
#[command(version)]
#[command(about = "CLI application for the Hetzner Robot webservice", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: json, table, compact
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List, inspect and operate dedicated servers
    Server(server::ServerArgs),

    /// List SSH keys
    Key(key::KeyArgs),

    /// List IP addresses
    Ip(ip::IpArgs),

    /// Reverse DNS entries
    Rdns(rdns::RdnsArgs),

    /// Failover IPs
    Failover(failover::FailoverArgs),

    /// Configuration management
    Config(config_cmd::ConfigArgs),

    /// Print the version number of hrobot-cli
    Version,
}

/// Everything a command needs: API access, user interaction and settings
pub struct App<C, P> {
    pub client: C,
    pub prompt: P,
    pub config: Config,
}

impl<C: RobotApi, P: Prompt> App<C, P> {
    pub fn new(client: C, prompt: P, config: Config) -> Self {
        Self {
            client,
            prompt,
            config,
        }
    }

    /// Fetch the server list and let the user pick one
    pub async fn select_server(&mut self) -> Result<Server> {
        let servers = self.client.server_list().await?;
        let labels: Vec<String> = servers.iter().map(output::server_label).collect();

        let index = self.prompt.select("Select server", &labels)?;
        let server = chosen(&servers, index)?.clone();

        output::info(&format!("Chosen server: {}", server.server_ip));
        Ok(server)
    }

    /// Ask for confirmation of a mutating call; `false` means the user declined
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        if self.prompt.confirm(question, false)? {
            return Ok(true);
        }
        output::warning("Aborted, nothing was changed");
        Ok(false)
    }
}

/// Entry of `items` picked by a prompt
pub fn chosen<T>(items: &[T], index: usize) -> Result<&T> {
    items
        .get(index)
        .ok_or_else(|| anyhow::anyhow!("Choice #{} is out of range", index))
}

pub async fn execute<C: RobotApi, P: Prompt>(app: &mut App<C, P>, command: Commands) -> Result<()> {
    match command {
        Commands::Server(args) => server::execute(app, args).await,
        Commands::Key(args) => key::execute(app, args).await,
        Commands::Ip(args) => ip::execute(app, args).await,
        Commands::Rdns(args) => rdns::execute(app, args).await,
        Commands::Failover(args) => failover::execute(app, args).await,
        Commands::Config(args) => config_cmd::execute(app, args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

pub fn print_version() {
    println!(
        "Hetzner Robot webservice command line interface version: {}",
        env!("CARGO_PKG_VERSION")
    );
}
