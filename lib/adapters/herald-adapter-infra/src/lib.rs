//! Infrastructure adapters: Portainer container listing and HTTP service probes.

pub mod portainer;
pub mod probe;

pub use portainer::PortainerClient;
pub use probe::HttpAvailabilityProbe;
