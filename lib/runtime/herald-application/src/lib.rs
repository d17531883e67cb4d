//! Use cases: deployment tracking, alert relay, chat commands and
//! infrastructure health reporting.

pub mod alerts;
pub mod availability;
pub mod commands;
pub mod error;
pub mod health_check;
pub mod keyed_lock;
pub mod messages;
pub mod tracker;

pub use alerts::AlertRelay;
pub use availability::AvailabilityReporter;
pub use commands::{ChatCommands, CommandOutcome};
pub use error::{MissingField, RelayError, TrackerError};
pub use health_check::{ContainerHealthCheck, HealthCheckOutcome, is_working_hour};
pub use keyed_lock::KeyedLock;
pub use tracker::{LifecycleTracker, TrackOutcome};
