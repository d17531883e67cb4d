//! Periodic container health check.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Timelike;

use herald_domain::OutboundMessage;
use herald_ports::{Clock, ContainerPort, NotificationPort};

use crate::messages;

/// Working hours are exclusive on both ends: 09:00 through 17:59.
pub fn is_working_hour(hour: u32) -> bool {
    8 < hour && hour < 18
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheckOutcome {
    OutsideWorkingHours,
    AllRunning { containers: usize },
    Reported { unhealthy: usize },
}

pub struct ContainerHealthCheck {
    containers: Arc<dyn ContainerPort>,
    notifier: Arc<dyn NotificationPort>,
    clock: Arc<dyn Clock>,
}

impl ContainerHealthCheck {
    pub fn new(
        containers: Arc<dyn ContainerPort>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            containers,
            notifier,
            clock,
        }
    }

    pub async fn check_once(&self) -> Result<HealthCheckOutcome> {
        if !is_working_hour(self.clock.now().hour()) {
            return Ok(HealthCheckOutcome::OutsideWorkingHours);
        }

        let containers = self
            .containers
            .list_containers()
            .await
            .context("failed to list containers")?;
        let Some(report) = messages::suspicious_containers(&containers) else {
            return Ok(HealthCheckOutcome::AllRunning {
                containers: containers.len(),
            });
        };

        let unhealthy = containers
            .iter()
            .filter(|container| !container.state().is_running())
            .count();
        self.notifier
            .send_message(OutboundMessage::text(report))
            .await
            .context("failed to send container report")?;
        Ok(HealthCheckOutcome::Reported { unhealthy })
    }

    /// Runs forever. The first check happens immediately; failures are logged
    /// and the loop keeps going.
    pub async fn run(self: Arc<Self>, every: Duration) {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            tracing::info!("container health check");
            match self.check_once().await {
                Ok(outcome) => tracing::info!(?outcome, "container health check finished"),
                Err(err) => tracing::error!(error = ?err, "container health check failed"),
            }
        }
    }
}
