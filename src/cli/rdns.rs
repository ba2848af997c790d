//! Reverse DNS commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::RobotApi;
use crate::cli::{chosen, App};
use crate::output;
use crate::prompt::Prompt;

#[derive(Args, Debug)]
pub struct RdnsArgs {
    #[command(subcommand)]
    pub command: Option<RdnsCommand>,
}

#[derive(Subcommand, Debug)]
pub enum RdnsCommand {
    /// List all reverse DNS entries
    List,

    /// Show one interactively chosen reverse DNS entry
    Get,
}

pub async fn execute<C: RobotApi, P: Prompt>(app: &mut App<C, P>, args: RdnsArgs) -> Result<()> {
    match args.command.unwrap_or(RdnsCommand::List) {
        RdnsCommand::List => {
            let entries = app.client.rdns_list().await?;

            output::print_output(&entries, &app.config.output_format, || {
                output::table_header(&["IP", "PTR"]);
                for rdns in &entries {
                    output::print_rdns(rdns);
                }
                output::total(entries.len(), "entries");
            })?;
        }

        RdnsCommand::Get => {
            let entries = app.client.rdns_list().await?;
            let labels: Vec<String> = entries
                .iter()
                .map(|r| format!("{} ({})", r.ip, r.ptr))
                .collect();

            let index = app.prompt.select("Select reverse DNS entry", &labels)?;
            let entry = chosen(&entries, index)?;
            output::info(&format!("Chosen reverse DNS entry: {}", entry.ip));

            let rdns = app.client.rdns_get(&entry.ip).await?;

            output::print_output(&rdns, &app.config.output_format, || {
                output::table_header(&["FIELD", "VALUE"]);
                output::field("ip", &rdns.ip);
                output::field("ptr", &rdns.ptr);
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Rdns;
    use crate::api::MockRobotApi;
    use crate::cli::test_support::app;
    use crate::prompt::MockPrompt;
    use mockall::predicate::eq;

    fn rdns(ip: &str, ptr: &str) -> Rdns {
        Rdns {
            ip: ip.to_string(),
            ptr: ptr.to_string(),
        }
    }

    #[tokio::test]
    async fn get_fetches_the_chosen_entry() {
        let mut client = MockRobotApi::new();
        client.expect_rdns_list().returning(|| {
            Ok(vec![
                rdns("10.0.0.1", "a.example.com"),
                rdns("10.0.0.2", "b.example.com"),
            ])
        });
        client
            .expect_rdns_get()
            .with(eq("10.0.0.2"))
            .times(1)
            .returning(|ip| Ok(rdns(ip, "b.example.com")));

        let mut prompt = MockPrompt::new();
        prompt
            .expect_select()
            .withf(|_, items| items[1] == "10.0.0.2 (b.example.com)")
            .returning(|_, _| Ok(1));

        let mut app = app(client, prompt);
        execute(
            &mut app,
            RdnsArgs {
                command: Some(RdnsCommand::Get),
            },
        )
        .await
        .unwrap();
    }
}
