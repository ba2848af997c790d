//! Bulk server renaming
//!
//! The user picks servers one by one from a shrinking candidate pool until
//! choosing the `Done` entry, then all chosen servers get a generated name
//! built from a common prefix.

use tracing::error;

use crate::api::models::{Server, ServerSetNameInput};
use crate::api::{RobotApi, RobotError};
use crate::output;
use crate::prompt::{Prompt, PromptError};

/// Label of the entry that ends the selection, always listed first
pub const DONE: &str = "Done";

/// Name given to `server` for the chosen prefix
pub fn generate_server_name(server: &Server, prefix: &str) -> String {
    format!(
        "{}-{}-{}-{}",
        prefix,
        server.product.to_lowercase(),
        server.dc.to_lowercase(),
        server.server_number
    )
}

/// Result of one selection step
#[derive(Debug, PartialEq)]
pub enum Pick {
    /// The `Done` entry was chosen
    Done,
    /// A server moved from the pool to the chosen set; further pool entries
    /// with the same server IP were dropped with it
    Added { server_ip: String, duplicates: usize },
    /// The index does not refer to any entry
    Invalid,
}

/// Candidate pool and chosen set; no server IP is ever in both
#[derive(Debug, Default)]
pub struct Selection {
    pool: Vec<Server>,
    chosen: Vec<Server>,
}

impl Selection {
    pub fn new(servers: Vec<Server>) -> Self {
        Self {
            pool: servers,
            chosen: Vec::new(),
        }
    }

    /// Prompt entries: `Done` followed by the remaining candidates
    pub fn labels(&self) -> Vec<String> {
        std::iter::once(DONE.to_string())
            .chain(self.pool.iter().map(output::server_label))
            .collect()
    }

    /// Apply the choice of entry `index` of [`labels`](Self::labels)
    pub fn pick(&mut self, index: usize) -> Pick {
        if index == 0 {
            return Pick::Done;
        }
        if index > self.pool.len() {
            return Pick::Invalid;
        }

        let server = self.pool.remove(index - 1);
        let before = self.pool.len();
        self.pool.retain(|s| s.server_ip != server.server_ip);
        let duplicates = before - self.pool.len();

        let server_ip = server.server_ip.clone();
        self.chosen.push(server);
        Pick::Added {
            server_ip,
            duplicates,
        }
    }

    pub fn pool(&self) -> &[Server] {
        &self.pool
    }

    /// Chosen servers in selection order
    pub fn chosen(&self) -> &[Server] {
        &self.chosen
    }

    pub fn into_chosen(self) -> Vec<Server> {
        self.chosen
    }
}

/// Run the interactive selection loop until the user picks `Done`
pub fn choose_servers<P: Prompt + ?Sized>(
    prompt: &mut P,
    servers: Vec<Server>,
) -> Result<Vec<Server>, PromptError> {
    let mut selection = Selection::new(servers);

    loop {
        if selection.chosen().is_empty() {
            output::info("No servers currently selected.");
        } else {
            output::info("Servers currently selected:");
            output::table_header(&["NAME", "IP"]);
            for server in selection.chosen() {
                println!("{}\t{}", server.server_name, server.server_ip);
            }
            output::total(selection.chosen().len(), "servers");
        }
        if selection.pool().is_empty() {
            output::info("No candidates left, choose Done to continue.");
        }

        let index = prompt.select("Choose servers", &selection.labels())?;
        match selection.pick(index) {
            Pick::Done => return Ok(selection.into_chosen()),
            Pick::Added {
                server_ip,
                duplicates,
            } => {
                output::info(&format!("Chosen server: {}", server_ip));
                if duplicates > 0 {
                    output::warning(&format!(
                        "Server {} was listed {} more time(s), selected once",
                        server_ip, duplicates
                    ));
                }
            }
            Pick::Invalid => output::warning(&format!("No entry #{}", index)),
        }
    }
}

/// Outcome of renaming one server
#[derive(Debug)]
pub struct RenameOutcome {
    pub server_ip: String,
    pub new_name: String,
    pub result: Result<(), RobotError>,
}

/// Rename every server in order; a failure is reported and the loop moves on
pub async fn apply<C: RobotApi + ?Sized>(
    client: &C,
    servers: &[Server],
    prefix: &str,
) -> Vec<RenameOutcome> {
    let mut outcomes = Vec::with_capacity(servers.len());

    for server in servers {
        let input = ServerSetNameInput {
            name: generate_server_name(server, prefix),
        };
        output::info(&format!(
            "Set server name for {} to {} ...",
            server.server_ip, input.name
        ));

        let result = client
            .server_set_name(&server.server_ip, &input)
            .await
            .map(|_| ());

        match result {
            Ok(()) => output::success(&format!("{} renamed", server.server_ip)),
            Err(ref e) => {
                error!(server_ip = %server.server_ip, "rename failed: {}", e);
                output::error(&format!("Renaming {} failed: {}", server.server_ip, e));
            }
        }

        outcomes.push(RenameOutcome {
            server_ip: server.server_ip.clone(),
            new_name: input.name,
            result,
        });
    }

    outcomes
}
