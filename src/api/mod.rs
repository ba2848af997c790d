//! API client module

pub mod client;
pub mod error;
pub mod models;
pub mod response;

use async_trait::async_trait;

pub use client::RobotClient;
pub use error::RobotError;

use error::Result;
use models::{
    Cancellation, Failover, Ip, Key, Rdns, Rescue, RescueSetInput, Reset, ResetSetInput, Server,
    ServerSetNameInput,
};

/// Resource operations of the Robot webservice, one request each
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RobotApi: Send + Sync {
    async fn server_list(&self) -> Result<Vec<Server>>;
    async fn server_get(&self, ip: &str) -> Result<Server>;
    async fn server_set_name(&self, ip: &str, input: &ServerSetNameInput) -> Result<Server>;
    /// Withdraw a pending cancellation
    async fn server_reverse(&self, ip: &str) -> Result<Cancellation>;
    async fn key_list(&self) -> Result<Vec<Key>>;
    async fn ip_list(&self) -> Result<Vec<Ip>>;
    async fn rdns_list(&self) -> Result<Vec<Rdns>>;
    async fn rdns_get(&self, ip: &str) -> Result<Rdns>;
    async fn failover_list(&self) -> Result<Vec<Failover>>;
    async fn failover_get(&self, ip: &str) -> Result<Failover>;
    async fn boot_rescue_get(&self, ip: &str) -> Result<Rescue>;
    async fn boot_rescue_set(&self, ip: &str, input: &RescueSetInput) -> Result<Rescue>;
    async fn reset_set(&self, ip: &str, input: &ResetSetInput) -> Result<Reset>;
}
