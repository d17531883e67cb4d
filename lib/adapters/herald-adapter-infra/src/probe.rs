use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;

use herald_domain::ServiceStatus;
use herald_ports::AvailabilityPort;

/// Plain GET probe: only `200 OK` counts as available.
#[derive(Debug, Clone)]
pub struct HttpAvailabilityProbe {
    client: reqwest::Client,
}

impl HttpAvailabilityProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build availability http client")?;
        Ok(Self { client })
    }
}

pub fn status_from_code(code: StatusCode) -> ServiceStatus {
    if code == StatusCode::OK {
        ServiceStatus::Available
    } else {
        ServiceStatus::Unavailable {
            reason: format!("HTTP {}", code.as_u16()),
        }
    }
}

#[async_trait]
impl AvailabilityPort for HttpAvailabilityProbe {
    async fn probe(&self, url: &str) -> ServiceStatus {
        match self.client.get(url).send().await {
            Ok(response) => status_from_code(response.status()),
            Err(err) => ServiceStatus::Unavailable {
                reason: err.to_string(),
            },
        }
    }
}
