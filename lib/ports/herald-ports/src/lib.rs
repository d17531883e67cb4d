//! Port traits between the application core and its adapters.

mod memory;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};

use herald_domain::{ContainerSummary, DeploymentId, EpochSeconds, OutboundMessage, ServiceStatus, StoreError};

pub use memory::{InMemoryNotifier, ManualClock, NotifierCall, StaticAvailability, StaticContainers};

/// Persisted mapping from deployment id to the instant its build started.
///
/// Every mutating call is durable once it returns.
#[async_trait]
pub trait DurationStore: Send + Sync {
    /// Overwrites any existing record for `id`.
    async fn put(&self, id: &DeploymentId, started_at: EpochSeconds) -> Result<(), StoreError>;

    /// `Ok(None)` when no record exists; `StoreError::Corrupt` when the stored
    /// value is not a finite number.
    async fn get(&self, id: &DeploymentId) -> Result<Option<EpochSeconds>, StoreError>;

    /// Idempotent.
    async fn delete(&self, id: &DeploymentId) -> Result<(), StoreError>;
}

/// Fire-and-forget chat transport. Sends always target the configured chat.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn send_message(&self, message: OutboundMessage) -> Result<()>;

    async fn edit_message(&self, chat_id: i64, message_id: i64, text: String) -> Result<()>;

    async fn answer_callback(&self, callback_id: &str) -> Result<()>;
}

#[async_trait]
pub trait ContainerPort: Send + Sync {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>>;
}

#[async_trait]
pub trait AvailabilityPort: Send + Sync {
    /// Never fails: transport errors are folded into `ServiceStatus::Unavailable`.
    async fn probe(&self, url: &str) -> ServiceStatus;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn now_epoch_seconds(&self) -> EpochSeconds {
        to_epoch_seconds(self.now())
    }
}

pub fn to_epoch_seconds(at: DateTime<Local>) -> EpochSeconds {
    at.timestamp() as f64 + f64::from(at.timestamp_subsec_micros()) / 1_000_000.0
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_seconds_keeps_subsecond_precision() {
        let at = DateTime::from_timestamp(1_700_000_000, 250_000_000)
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(to_epoch_seconds(at), 1_700_000_000.25);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_epoch_seconds() > 1_577_836_800.0);
    }
}
