//! Container and service health observations.

use serde::{Deserialize, Serialize};

/// Docker container state as reported through the Portainer proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Exited,
    Paused,
    Restarting,
    Other(String),
}

impl ContainerState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "running" => ContainerState::Running,
            "exited" => ContainerState::Exited,
            "paused" => ContainerState::Paused,
            "restarting" => ContainerState::Restarting,
            other => ContainerState::Other(other.to_string()),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ContainerState::Exited => "🛑",
            ContainerState::Paused => "⏸",
            ContainerState::Restarting => "🔄",
            ContainerState::Running | ContainerState::Other(_) => "⁉️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Names", default)]
    pub names: Vec<String>,
    #[serde(rename = "State", default)]
    pub state: String,
}

impl ContainerSummary {
    pub fn state(&self) -> ContainerState {
        ContainerState::parse(&self.state)
    }

    /// First name without the leading slash docker puts in front of it.
    pub fn display_name(&self) -> &str {
        match self.names.first() {
            Some(name) => name.trim_matches('/'),
            None => self.id.get(..12).unwrap_or(&self.id),
        }
    }
}

/// Outcome of probing an infrastructure service URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Available,
    Unavailable { reason: String },
}

impl ServiceStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ServiceStatus::Available)
    }
}
