//! In-memory port implementations for wiring tests and local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta};

use herald_domain::{ContainerSummary, OutboundMessage, ServiceStatus};

use crate::{AvailabilityPort, Clock, ContainerPort, NotificationPort};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    Send(OutboundMessage),
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
    },
    AnswerCallback(String),
}

/// Records every call; can be switched into a failing mode to simulate an
/// unreachable chat.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    calls: Arc<Mutex<Vec<NotifierCall>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        match self.calls.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => Vec::new(),
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                NotifierCall::Send(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: NotifierCall) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("chat transport unavailable");
        }
        if let Ok(mut guard) = self.calls.lock() {
            guard.push(call);
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationPort for InMemoryNotifier {
    async fn send_message(&self, message: OutboundMessage) -> Result<()> {
        self.record(NotifierCall::Send(message))
    }

    async fn edit_message(&self, chat_id: i64, message_id: i64, text: String) -> Result<()> {
        self.record(NotifierCall::Edit {
            chat_id,
            message_id,
            text,
        })
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.record(NotifierCall::AnswerCallback(callback_id.to_string()))
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(Mutex::new(at)),
        }
    }

    pub fn at_epoch(secs: i64) -> Self {
        let at = DateTime::from_timestamp(secs, 0)
            .unwrap_or_default()
            .with_timezone(&Local);
        Self::new(at)
    }

    pub fn advance_secs(&self, secs: i64) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += TimeDelta::seconds(secs);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Fixed container listing, or a fixed failure.
#[derive(Debug, Clone, Default)]
pub struct StaticContainers {
    containers: Vec<ContainerSummary>,
    error: Option<String>,
}

impl StaticContainers {
    pub fn new(containers: Vec<ContainerSummary>) -> Self {
        Self {
            containers,
            error: None,
        }
    }

    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            containers: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[async_trait]
impl ContainerPort for StaticContainers {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        if let Some(error) = &self.error {
            bail!("{error}");
        }
        Ok(self.containers.clone())
    }
}

/// Availability answers keyed by URL; unknown URLs are unavailable.
#[derive(Debug, Clone, Default)]
pub struct StaticAvailability {
    statuses: HashMap<String, ServiceStatus>,
}

impl StaticAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, status: ServiceStatus) -> Self {
        self.statuses.insert(url.into(), status);
        self
    }
}

#[async_trait]
impl AvailabilityPort for StaticAvailability {
    async fn probe(&self, url: &str) -> ServiceStatus {
        self.statuses
            .get(url)
            .cloned()
            .unwrap_or_else(|| ServiceStatus::Unavailable {
                reason: "no response".to_string(),
            })
    }
}
