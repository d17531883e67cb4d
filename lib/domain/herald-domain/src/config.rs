//! Runtime configuration shared by the service wiring and adapters.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HeraldConfig {
    pub debug: bool,
    pub bind_addr: SocketAddr,
    /// Public base URL the chat platform uses to reach this service.
    pub public_host: String,
    pub telegram: TelegramConfig,
    pub portainer: PortainerConfig,
    /// Services probed by the `/help` availability report, in display order.
    pub services: Vec<ServiceEndpoint>,
    pub store_path: PathBuf,
    pub health_check_interval: Duration,
}

impl HeraldConfig {
    /// Bot webhook URL: the token doubles as an unguessable path segment.
    pub fn bot_webhook_url(&self) -> String {
        format!(
            "{}/{}/",
            self.public_host.trim_end_matches('/'),
            self.telegram.bot_token
        )
    }
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: i64,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Clone)]
pub struct PortainerConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub environment_id: u32,
    pub verify_tls: bool,
}

impl fmt::Debug for PortainerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortainerConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("environment_id", &self.environment_id)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub name: String,
    pub url: String,
}

impl ServiceEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
