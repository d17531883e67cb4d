//! Deployment and alert relay service.

pub mod config;
pub mod observability;
pub mod service;

pub use config::Args;
pub use observability::{LogFormat, init_logging};
pub use service::{build_router, run};
