//! HTTP client for the Hetzner Robot webservice

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::api::error::{Result, RobotError};
use crate::api::models::{
    Cancellation, Failover, Ip, Key, Rdns, Rescue, RescueSetInput, Reset, ResetSetInput, Server,
    ServerSetNameInput,
};
use crate::api::response::{decode_list, decode_one};
use crate::api::RobotApi;
use crate::config::Config;

pub const USER_AGENT: &str = concat!("hrobot-cli/", env!("CARGO_PKG_VERSION"));

type Form = Vec<(&'static str, String)>;

/// Robot webservice client
pub struct RobotClient {
    client: Client,
    base_url: String,
    user: String,
    password: String,
}

impl RobotClient {
    /// Create a new client from the loaded configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// Send one authenticated request and return the body of a successful answer
    async fn send(&self, method: Method, path: &str, form: Option<&Form>) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);

        let mut req = self
            .client
            .request(method.clone(), &url)
            .basic_auth(&self.user, Some(&self.password));

        if let Some(form) = form {
            debug!("{} {} with form: {:?}", method, url, form);
            req = req.form(form);
        } else {
            debug!("{} {}", method, url);
        }

        let response = req.send().await?;

        let status = response.status();
        let text = response.text().await?;
        trace!("Response ({}): {}", status, text);

        if !status.is_success() {
            return Err(RobotError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }

    async fn get_one<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<T> {
        let text = self.send(Method::GET, path, None).await?;
        Ok(decode_one(&text, key)?)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<Vec<T>> {
        let text = self.send(Method::GET, path, None).await?;
        Ok(decode_list(&text, key)?)
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: &Form, key: &str) -> Result<T> {
        let text = self.send(Method::POST, path, Some(form)).await?;
        Ok(decode_one(&text, key)?)
    }
}

#[async_trait]
impl RobotApi for RobotClient {
    async fn server_list(&self) -> Result<Vec<Server>> {
        self.get_list("/server", "server").await
    }

    async fn server_get(&self, ip: &str) -> Result<Server> {
        self.get_one(&format!("/server/{}", ip), "server").await
    }

    async fn server_set_name(&self, ip: &str, input: &ServerSetNameInput) -> Result<Server> {
        self.post_form(&format!("/server/{}", ip), &input.form(), "server")
            .await
    }

    async fn server_reverse(&self, ip: &str) -> Result<Cancellation> {
        self.post_form(&format!("/server/{}/reversal", ip), &Vec::new(), "cancellation")
            .await
    }

    async fn key_list(&self) -> Result<Vec<Key>> {
        self.get_list("/key", "key").await
    }

    async fn ip_list(&self) -> Result<Vec<Ip>> {
        self.get_list("/ip", "ip").await
    }

    async fn rdns_list(&self) -> Result<Vec<Rdns>> {
        self.get_list("/rdns", "rdns").await
    }

    async fn rdns_get(&self, ip: &str) -> Result<Rdns> {
        self.get_one(&format!("/rdns/{}", ip), "rdns").await
    }

    async fn failover_list(&self) -> Result<Vec<Failover>> {
        self.get_list("/failover", "failover").await
    }

    async fn failover_get(&self, ip: &str) -> Result<Failover> {
        self.get_one(&format!("/failover/{}", ip), "failover").await
    }

    async fn boot_rescue_get(&self, ip: &str) -> Result<Rescue> {
        self.get_one(&format!("/boot/{}/rescue", ip), "rescue").await
    }

    async fn boot_rescue_set(&self, ip: &str, input: &RescueSetInput) -> Result<Rescue> {
        self.post_form(&format!("/boot/{}/rescue", ip), &input.form(), "rescue")
            .await
    }

    async fn reset_set(&self, ip: &str, input: &ResetSetInput) -> Result<Reset> {
        self.post_form(&format!("/reset/{}", ip), &input.form(), "reset")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ResetType;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;
    use wiremock::matchers::{basic_auth, body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base_url: String, timeout_secs: Option<&str>) -> RobotClient {
        let mut vars: HashMap<&str, String> = HashMap::from([
            ("HROBOTCLI_USER", "robot".to_string()),
            ("HROBOTCLI_PASSWORD", "s3cret".to_string()),
            ("HROBOTCLI_BASE_URL", base_url),
        ]);
        if let Some(secs) = timeout_secs {
            vars.insert("HROBOTCLI_TIMEOUT", secs.to_string());
        }
        let config = Config::from_lookup(|name| vars.get(name).cloned()).unwrap();
        RobotClient::new(&config).unwrap()
    }

    fn test_client(server: &MockServer) -> RobotClient {
        client_for(server.uri(), None)
    }

    fn server_json(number: u64, ip: &str, name: &str) -> serde_json::Value {
        json!({
            "server": {
                "server_ip": ip,
                "server_number": number,
                "server_name": name,
                "product": "AX41",
                "dc": "FSN1-DC8",
                "traffic": "unlimited",
                "status": "ready",
                "cancelled": false,
                "paid_until": "2024-01-31",
                "ip": [ip],
                "subnet": [{"ip": "2a01:4f8::", "mask": "64"}]
            }
        })
    }

    #[tokio::test]
    async fn server_list_sends_credentials_and_unwraps_envelopes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server"))
            .and(basic_auth("robot", "s3cret"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                server_json(2, "10.0.0.2", "b-1"),
                server_json(1, "10.0.0.1", "a-1"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let servers = test_client(&server).server_list().await.unwrap();

        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].server_ip, "10.0.0.2");
        assert_eq!(servers[1].server_name, "a-1");
        assert_eq!(servers[1].subnet[0].mask, "64");
    }

    #[tokio::test]
    async fn unauthorized_surfaces_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server"))
            .respond_with(ResponseTemplate::new(401).set_body_string("UNAUTHORIZED"))
            .mount(&server)
            .await;

        let err = test_client(&server).server_list().await.unwrap_err();

        assert!(matches!(err, RobotError::Api { status: 401, .. }));
        assert_eq!(err.to_string(), "UNAUTHORIZED");
        assert_eq!(err.body(), Some("UNAUTHORIZED"));
    }

    #[tokio::test]
    async fn structured_error_body_is_kept_verbatim() {
        let server = MockServer::start().await;
        let body = r#"{"error":{"status":404,"code":"SERVER_NOT_FOUND","message":"Server not found"}}"#;
        Mock::given(method("GET"))
            .and(path("/server/10.0.0.9"))
            .respond_with(ResponseTemplate::new(404).set_body_string(body))
            .mount(&server)
            .await;

        let err = test_client(&server).server_get("10.0.0.9").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), body);
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/key"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[{\"key\": {\"name\": "))
            .mount(&server)
            .await;

        let err = test_client(&server).key_list().await.unwrap_err();
        assert!(matches!(err, RobotError::Decode(_)));
    }

    #[tokio::test]
    async fn wrong_shape_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rdns/10.0.0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rdns": {"ptr": 5}})))
            .mount(&server)
            .await;

        let err = test_client(&server).rdns_get("10.0.0.1").await.unwrap_err();
        assert!(matches!(err, RobotError::Decode(_)));
    }

    #[tokio::test]
    async fn set_name_posts_form_encoded_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/server/10.0.0.1"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("server_name=prod+web%2F1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(server_json(1, "10.0.0.1", "prod web/1")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let input = ServerSetNameInput {
            name: "prod web/1".into(),
        };
        let renamed = test_client(&server)
            .server_set_name("10.0.0.1", &input)
            .await
            .unwrap();

        assert_eq!(renamed.server_name, "prod web/1");
    }

    #[tokio::test]
    async fn rescue_set_and_reset_post_their_forms() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/boot/10.0.0.1/rescue"))
            .and(body_string("os=linux&arch=64&authorized_key=15%3A28%3Ab0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rescue": {
                    "server_ip": "10.0.0.1",
                    "server_number": 1,
                    "os": "linux",
                    "arch": 64,
                    "active": true,
                    "password": null
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/reset/10.0.0.1"))
            .and(body_string("type=hw"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reset": {"server_ip": "10.0.0.1", "server_number": 1, "type": "hw"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let rescue = client
            .boot_rescue_set(
                "10.0.0.1",
                &RescueSetInput {
                    os: "linux".into(),
                    arch: 64,
                    authorized_key: Some("15:28:b0".into()),
                },
            )
            .await
            .unwrap();
        assert!(rescue.active);
        assert_eq!(rescue.os, vec!["linux"]);

        let reset = client
            .reset_set(
                "10.0.0.1",
                &ResetSetInput {
                    reset_type: ResetType::Hw,
                },
            )
            .await
            .unwrap();
        assert_eq!(reset.reset_type, vec!["hw"]);
    }

    #[tokio::test]
    async fn failover_and_ip_lists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/failover"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "failover": {
                    "ip": "78.46.1.93",
                    "netmask": "255.255.255.255",
                    "server_ip": "10.0.0.1",
                    "server_number": 1,
                    "active_server_ip": "10.0.0.2"
                }
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "ip": {
                    "ip": "10.0.0.1",
                    "server_ip": "10.0.0.1",
                    "server_number": 1,
                    "locked": true,
                    "separate_mac": null
                }
            }])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let failovers = client.failover_list().await.unwrap();
        assert_eq!(failovers[0].active_server_ip.as_deref(), Some("10.0.0.2"));

        let ips = client.ip_list().await.unwrap();
        assert!(ips[0].locked);
        assert_eq!(ips[0].server_number, 1);
    }

    #[tokio::test]
    async fn slow_answer_hits_configured_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = client_for(server.uri(), Some("1"))
            .server_list()
            .await
            .unwrap_err();

        assert!(matches!(err, RobotError::Transport(ref e) if e.is_timeout()));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = client_for(format!("http://127.0.0.1:{}", port), Some("5"))
            .server_list()
            .await
            .unwrap_err();

        assert!(matches!(err, RobotError::Transport(_)));
        assert_eq!(err.body(), None);
    }
}
