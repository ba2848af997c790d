//! Records mirroring the Robot webservice JSON shapes

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Subnet routed to a server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    pub ip: String,
    pub mask: String,
}

/// Dedicated server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub server_number: u64,
    pub server_ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product: String,
    /// Datacenter, e.g. `FSN1-DC8`
    #[serde(default, deserialize_with = "null_as_default")]
    pub dc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paid_until: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub traffic: String,
    #[serde(default)]
    pub flatrate: bool,
    #[serde(default)]
    pub throttled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ip: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subnet: Vec<Subnet>,
}

/// Result of a cancellation reversal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cancellation {
    pub server_ip: String,
    pub server_number: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_name: String,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub cancellation_date: Option<String>,
    #[serde(default)]
    pub earliest_cancellation_date: Option<String>,
}

/// SSH key stored in the account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub name: String,
    pub fingerprint: String,
    #[serde(rename = "type")]
    pub key_type: String,
    pub size: u32,
    #[serde(default)]
    pub data: String,
}

/// Single IP address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ip {
    pub ip: String,
    pub server_ip: String,
    pub server_number: u64,
    #[serde(default)]
    pub locked: bool,
}

/// Reverse DNS entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rdns {
    pub ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ptr: String,
}

/// Failover IP and the server it is currently routed to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Failover {
    pub ip: String,
    pub netmask: String,
    pub server_ip: String,
    pub server_number: u64,
    /// `None` while the failover IP is not routed anywhere
    #[serde(default)]
    pub active_server_ip: Option<String>,
}

/// Rescue boot configuration of a server
///
/// While rescue is inactive `os`/`arch` carry the offered choices as lists;
/// once active they collapse to the single chosen value. Both shapes decode
/// into lists, and anything else decodes to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rescue {
    pub server_ip: String,
    pub server_number: u64,
    #[serde(default, deserialize_with = "string_list")]
    pub os: Vec<String>,
    #[serde(default, deserialize_with = "int_list")]
    pub arch: Vec<u32>,
    #[serde(default)]
    pub active: bool,
    /// Only present in the answer to an activation without SSH key
    #[serde(default)]
    pub password: Option<String>,
}

/// Result of a reset request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reset {
    pub server_ip: String,
    pub server_number: u64,
    #[serde(rename = "type", default, deserialize_with = "string_list")]
    pub reset_type: Vec<String>,
}

/// Reset flavours accepted by `/reset`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResetType {
    /// Send CTRL+ALT+DEL
    Sw,
    /// Press the hardware reset button
    #[default]
    Hw,
    /// Ask a technician to reset the machine
    Man,
    /// Cut power briefly
    Power,
}

impl ResetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sw => "sw",
            Self::Hw => "hw",
            Self::Man => "man",
            Self::Power => "power",
        }
    }
}

/// Payload for `POST /server/{ip}`
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSetNameInput {
    pub name: String,
}

impl ServerSetNameInput {
    pub fn form(&self) -> Vec<(&'static str, String)> {
        vec![("server_name", self.name.clone())]
    }
}

/// Payload for `POST /boot/{ip}/rescue`
#[derive(Debug, Clone, PartialEq)]
pub struct RescueSetInput {
    pub os: String,
    pub arch: u32,
    /// Fingerprint of the key to authorize; password login when `None`
    pub authorized_key: Option<String>,
}

impl RescueSetInput {
    pub fn form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![("os", self.os.clone()), ("arch", self.arch.to_string())];
        if let Some(ref fingerprint) = self.authorized_key {
            form.push(("authorized_key", fingerprint.clone()));
        }
        form
    }
}

/// Payload for `POST /reset/{ip}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetSetInput {
    pub reset_type: ResetType,
}

impl ResetSetInput {
    pub fn form(&self) -> Vec<(&'static str, String)> {
        vec![("type", self.reset_type.as_str().to_string())]
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    })
}

fn int_list<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let as_u32 = |value: &Value| value.as_u64().and_then(|n| u32::try_from(n).ok());

    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().filter_map(as_u32).collect(),
        other => as_u32(&other).into_iter().collect(),
    })
}
