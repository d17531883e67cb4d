//! Domain models and invariants.

pub mod alert;
pub mod chat;
pub mod config;
pub mod container;
pub mod deployment;
pub mod duration;
pub mod error;

pub use alert::{Alert, AlertBatch};
pub use chat::{CallbackQuery, Chat, ChatMessage, ChatUpdate, ChatUser, InlineButton, InlineKeyboard, OutboundMessage};
pub use config::{HeraldConfig, PortainerConfig, ServiceEndpoint, TelegramConfig};
pub use container::{ContainerState, ContainerSummary, ServiceStatus};
pub use deployment::{DeploymentEvent, DeploymentId, DeploymentStatus, NamedRef, UnknownStatus};
pub use duration::{BuildDuration, EpochSeconds};
pub use error::StoreError;
