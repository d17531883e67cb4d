//! Deployment events as delivered by the CI pipeline webhook.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a single deployment attempt.
///
/// The pipeline sends it as a number; the string form is what the duration
/// store uses as its key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawDeploymentId", into = "String")]
pub struct DeploymentId(String);

impl DeploymentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for DeploymentId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for DeploymentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<DeploymentId> for String {
    fn from(value: DeploymentId) -> Self {
        value.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDeploymentId {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

impl From<RawDeploymentId> for DeploymentId {
    fn from(raw: RawDeploymentId) -> Self {
        match raw {
            RawDeploymentId::Signed(value) => Self(value.to_string()),
            RawDeploymentId::Unsigned(value) => Self(value.to_string()),
            RawDeploymentId::Text(value) => Self(value),
        }
    }
}

/// Closed set of deployment statuses the tracker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Running,
    Success,
    Failed,
    Canceled,
}

impl DeploymentStatus {
    pub const ALL: [DeploymentStatus; 4] = [
        DeploymentStatus::Running,
        DeploymentStatus::Success,
        DeploymentStatus::Failed,
        DeploymentStatus::Canceled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentStatus::Running => "running",
            DeploymentStatus::Success => "success",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("event status not supported: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for DeploymentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Nested `{ "name": ... }` object used for both project and user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
}

impl NamedRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// A deployment status change. Descriptive fields are optional here and only
/// required by the messages that reference them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentEvent {
    pub deployment_id: DeploymentId,
    pub status: DeploymentStatus,
    #[serde(default)]
    pub project: Option<NamedRef>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub user: Option<NamedRef>,
    #[serde(default)]
    pub commit_title: Option<String>,
    #[serde(default)]
    pub deployable_url: Option<String>,
    #[serde(default)]
    pub environment_external_url: Option<String>,
}

impl DeploymentEvent {
    pub fn new(deployment_id: impl Into<DeploymentId>, status: DeploymentStatus) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            status,
            project: None,
            environment: None,
            git_ref: None,
            user: None,
            commit_title: None,
            deployable_url: None,
            environment_external_url: None,
        }
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project.as_ref().and_then(|p| p.name.as_deref())
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.name.as_deref())
    }
}
