//! Output formatting module

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

use crate::api::models::{Failover, Ip, Key, Rdns, Server};
use crate::config::OutputFormat;

/// Print output in the configured format; `table` renders the table view
pub fn print_output<T: Serialize>(
    data: &T,
    format: &OutputFormat,
    table: impl FnOnce(),
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(data),
        OutputFormat::Compact => print_compact(data),
        OutputFormat::Table => {
            table();
            Ok(())
        }
    }
}

/// Print as formatted JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string(data)?);
    Ok(())
}

/// Print compact output
pub fn print_compact<T: Serialize>(data: &T) -> Result<()> {
    let value = serde_json::to_value(data)?;
    print_value_compact(&value, 0);
    Ok(())
}

fn print_value_compact(value: &Value, indent: usize) {
    let prefix = "  ".repeat(indent);

    match value {
        Value::Object(map) => {
            for (key, val) in map {
                match val {
                    Value::Object(_) | Value::Array(_) => {
                        println!("{}{}: ", prefix, key.cyan());
                        print_value_compact(val, indent + 1);
                    }
                    _ => {
                        println!("{}{}: {}", prefix, key.cyan(), format_value(val));
                    }
                }
            }
        }
        Value::Array(arr) => {
            for (i, val) in arr.iter().enumerate() {
                println!("{}[{}]", prefix, i.to_string().dimmed());
                print_value_compact(val, indent + 1);
            }
        }
        _ => {
            println!("{}{}", prefix, format_value(value));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".dimmed().to_string(),
        Value::Bool(b) => format_bool(*b),
        Value::Number(n) => n.to_string().yellow().to_string(),
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

fn format_bool(b: bool) -> String {
    if b {
        "true".green().to_string()
    } else {
        "false".red().to_string()
    }
}

/// Print success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

/// Print a table header
pub fn table_header(columns: &[&str]) {
    let header: Vec<String> = columns
        .iter()
        .map(|c| c.bold().underline().to_string())
        .collect();
    println!("{}", header.join("\t"));
}

/// Print the footer line of a listing
pub fn total(count: usize, noun: &str) {
    info(&format!("Total: {} {}", count, noun));
}

/// Print one `field value` line of a detail table
pub fn field(name: &str, value: impl std::fmt::Display) {
    println!("{}\t{}", name.dimmed(), value);
}

/// One-line label of a server, used in listings and selection prompts
pub fn server_label(server: &Server) -> String {
    format!(
        "{} ({} - {} - {})",
        server.server_name, server.server_ip, server.product, server.dc
    )
}

/// Print server in table format
pub fn print_server(server: &Server) {
    let cancelled = if server.cancelled {
        "yes".red().to_string()
    } else {
        "no".dimmed().to_string()
    };

    println!(
        "{}\t{}\t{}\t{}\t{}",
        server.server_number.to_string().dimmed(),
        server.server_ip.cyan(),
        server.server_name.bold(),
        server.dc,
        cancelled
    );
}

/// Print SSH key in table format
pub fn print_key(key: &Key) {
    println!(
        "{}\t{}\t{}\t{}",
        key.name.bold(),
        key.key_type.cyan(),
        key.size,
        key.fingerprint.dimmed()
    );
}

/// Print IP in table format
pub fn print_ip(ip: &Ip) {
    let locked = if ip.locked {
        "locked".red().to_string()
    } else {
        "-".dimmed().to_string()
    };

    println!(
        "{}\t{}\t{}\t{}",
        ip.ip.cyan(),
        ip.server_ip,
        ip.server_number.to_string().dimmed(),
        locked
    );
}

/// Print reverse DNS entry in table format
pub fn print_rdns(rdns: &Rdns) {
    println!("{}\t{}", rdns.ip.cyan(), rdns.ptr.bold());
}

/// Print failover IP in table format
pub fn print_failover(failover: &Failover) {
    let active = match failover.active_server_ip {
        Some(ref ip) => ip.green().to_string(),
        None => "unrouted".yellow().to_string(),
    };

    println!(
        "{}\t{}\t{}",
        failover.ip.cyan(),
        failover.server_number.to_string().dimmed(),
        active
    );
}
