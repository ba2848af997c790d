//! Ansible inventory derived from server naming conventions
//!
//! The first `-`-separated token of a server name is its purpose group
//! (`mongodb-prod-1` belongs to `[mongodb]`); the first token of the
//! datacenter gives the location group (`FSN1-DC8` belongs to `[dc-fsn1]`).

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::api::models::Server;

/// Render the inventory: all hosts, then purpose groups, then location groups
pub fn generate(servers: &[Server]) -> String {
    let mut purposes: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut locations: BTreeMap<String, Vec<&str>> = BTreeMap::new();

    let mut out = String::from("[servers]\n");
    for server in servers {
        let name = server.server_name.as_str();
        let purpose = name.split('-').next().unwrap_or_default();
        let location = server
            .dc
            .split('-')
            .next()
            .unwrap_or_default()
            .to_lowercase();

        purposes.entry(purpose).or_default().push(name);
        locations.entry(location).or_default().push(name);

        let _ = writeln!(out, "{} ansible_host={}", name, server.server_ip);
    }

    for (purpose, hosts) in &purposes {
        write_group(&mut out, purpose, hosts);
    }
    for (location, hosts) in &locations {
        write_group(&mut out, &format!("dc-{}", location), hosts);
    }

    out
}

fn write_group(out: &mut String, group: &str, hosts: &[&str]) {
    let _ = writeln!(out, "\n[{}]", group);
    for host in hosts {
        let _ = writeln!(out, "{}", host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::server;

    /// Hosts listed under `[group]`
    fn group<'a>(inventory: &'a str, group: &str) -> Vec<&'a str> {
        let header = format!("[{}]", group);
        inventory
            .lines()
            .skip_while(|line| *line != header)
            .skip(1)
            .take_while(|line| !line.is_empty())
            .collect()
    }

    #[test]
    fn location_groups_from_datacenter_prefix() {
        let servers = vec![
            server(1, "10.0.0.1", "app-prod-42", "AX41", "fsn1-dc8"),
            server(2, "10.0.0.2", "db-prod-84", "AX41", "nbg1-dc3"),
        ];

        let inventory = generate(&servers);

        assert_eq!(group(&inventory, "dc-fsn1"), vec!["app-prod-42"]);
        assert_eq!(group(&inventory, "dc-nbg1"), vec!["db-prod-84"]);
    }

    #[test]
    fn servers_block_keeps_list_order_and_purpose_groups_collect_hosts() {
        let servers = vec![
            server(2, "10.0.0.2", "mongodb-2", "AX41", "FSN1-DC8"),
            server(1, "10.0.0.1", "mongodb-1", "AX41", "FSN1-DC14"),
            server(3, "10.0.0.3", "web-1", "EX44", "HEL1-DC2"),
        ];

        let inventory = generate(&servers);

        assert_eq!(
            group(&inventory, "servers"),
            vec![
                "mongodb-2 ansible_host=10.0.0.2",
                "mongodb-1 ansible_host=10.0.0.1",
                "web-1 ansible_host=10.0.0.3",
            ]
        );
        assert_eq!(group(&inventory, "mongodb"), vec!["mongodb-2", "mongodb-1"]);
        assert_eq!(group(&inventory, "web"), vec!["web-1"]);
        assert_eq!(group(&inventory, "dc-fsn1"), vec!["mongodb-2", "mongodb-1"]);
        assert_eq!(group(&inventory, "dc-hel1"), vec!["web-1"]);
    }

    #[test]
    fn empty_server_list() {
        assert_eq!(generate(&[]), "[servers]\n");
    }
}
