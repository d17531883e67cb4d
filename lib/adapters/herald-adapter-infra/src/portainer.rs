//! Portainer API client.
//!
//! Logs in for a fresh JWT on every listing; health checks run a few times a
//! day so token caching is not worth the refresh handling.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use herald_domain::{ContainerSummary, PortainerConfig};
use herald_ports::ContainerPort;

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    #[serde(rename = "Username")]
    username: &'a str,
    #[serde(rename = "Password")]
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    jwt: String,
}

#[derive(Clone)]
pub struct PortainerClient {
    client: reqwest::Client,
    api_base: String,
    username: String,
    password: String,
    environment_id: u32,
}

impl std::fmt::Debug for PortainerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortainerClient")
            .field("api_base", &self.api_base)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("environment_id", &self.environment_id)
            .finish()
    }
}

impl PortainerClient {
    pub fn new(config: &PortainerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .context("failed to build portainer http client")?;
        Ok(Self {
            client,
            api_base: format!("{}/api", config.url.trim_end_matches('/')),
            username: config.username.clone(),
            password: config.password.clone(),
            environment_id: config.environment_id,
        })
    }

    pub fn auth_url(&self) -> String {
        format!("{}/auth", self.api_base)
    }

    pub fn containers_url(&self) -> String {
        format!(
            "{}/endpoints/{}/docker/containers/json?all=true",
            self.api_base, self.environment_id
        )
    }

    async fn login(&self) -> Result<String> {
        let response = self
            .client
            .post(self.auth_url())
            .json(&AuthRequest {
                username: &self.username,
                password: &self.password,
            })
            .send()
            .await
            .context("portainer login request failed")?
            .error_for_status()
            .context("portainer rejected login")?;
        let auth: AuthResponse = response
            .json()
            .await
            .context("portainer login returned no jwt")?;
        Ok(auth.jwt)
    }
}

#[async_trait]
impl ContainerPort for PortainerClient {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let token = self.login().await?;
        let containers: Vec<ContainerSummary> = self
            .client
            .get(self.containers_url())
            .bearer_auth(token)
            .send()
            .await
            .context("portainer container listing failed")?
            .error_for_status()
            .context("portainer rejected container listing")?
            .json()
            .await
            .context("portainer returned an unreadable container list")?;
        tracing::debug!(
            environment_id = self.environment_id,
            containers = containers.len(),
            "containers listed"
        );
        Ok(containers)
    }
}
