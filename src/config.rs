//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};

use herald_domain::{HeraldConfig, PortainerConfig, ServiceEndpoint, TelegramConfig};

/// Every setting can be given as a flag or through the environment; a `.env`
/// file is loaded before parsing.
#[derive(Debug, Clone, Parser)]
#[command(name = "relay-service", about = "Relays deployment events and alerts to a Telegram chat")]
pub struct Args {
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    #[arg(long, env = "CHAT_ID", allow_hyphen_values = true)]
    pub chat_id: i64,

    /// Public base URL the bot webhook is registered under.
    #[arg(long, env = "HOST")]
    pub host: String,

    #[arg(long, env = "PORTAINER_URL")]
    pub portainer_url: String,

    #[arg(long, env = "PORTAINER_USER")]
    pub portainer_user: String,

    #[arg(long, env = "PORTAINER_PASSWORD", hide_env_values = true)]
    pub portainer_password: String,

    #[arg(long, env = "PORTAINER_ENVIRONMENT_ID", default_value_t = 2)]
    pub portainer_environment_id: u32,

    #[arg(long, env = "PORTAINER_VERIFY_TLS", default_value_t = true, action = ArgAction::Set)]
    pub portainer_verify_tls: bool,

    #[arg(long, env = "GITLAB_URL")]
    pub gitlab_url: String,

    #[arg(long, env = "VAULT_URL")]
    pub vault_url: String,

    #[arg(long, env = "GRAFANA_URL")]
    pub grafana_url: String,

    #[arg(long, env = "SONAR_URL")]
    pub sonar_url: String,

    /// Human-readable logs instead of JSON.
    #[arg(long, env = "DEBUG", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub debug: bool,

    #[arg(long, env = "HERALD_BIND", default_value = "0.0.0.0:8086")]
    pub bind: SocketAddr,

    #[arg(long, env = "HERALD_STORE_PATH", default_value = "local.db")]
    pub store_path: PathBuf,

    #[arg(long, env = "HEALTH_CHECK_INTERVAL_SECS", default_value_t = 4 * 60 * 60)]
    pub health_check_interval_secs: u64,
}

impl Args {
    pub fn into_config(self) -> HeraldConfig {
        let services = vec![
            ServiceEndpoint::new("GitLab", self.gitlab_url),
            ServiceEndpoint::new("Portainer", self.portainer_url.clone()),
            ServiceEndpoint::new("Vault", self.vault_url),
            ServiceEndpoint::new("Grafana", self.grafana_url),
            ServiceEndpoint::new("Sonar", self.sonar_url),
        ];

        HeraldConfig {
            debug: self.debug,
            bind_addr: self.bind,
            public_host: self.host,
            telegram: TelegramConfig {
                bot_token: self.bot_token,
                chat_id: self.chat_id,
            },
            portainer: PortainerConfig {
                url: self.portainer_url,
                username: self.portainer_user,
                password: self.portainer_password,
                environment_id: self.portainer_environment_id,
                verify_tls: self.portainer_verify_tls,
            },
            services,
            store_path: self.store_path,
            // A zero interval would make the ticker panic.
            health_check_interval: Duration::from_secs(self.health_check_interval_secs.max(1)),
        }
    }
}
