//! Infrastructure service availability report.

use std::sync::Arc;

use herald_domain::ServiceEndpoint;
use herald_ports::{AvailabilityPort, Clock};

pub struct AvailabilityReporter {
    probe: Arc<dyn AvailabilityPort>,
    clock: Arc<dyn Clock>,
    services: Vec<ServiceEndpoint>,
}

impl AvailabilityReporter {
    pub fn new(
        probe: Arc<dyn AvailabilityPort>,
        clock: Arc<dyn Clock>,
        services: Vec<ServiceEndpoint>,
    ) -> Self {
        Self {
            probe,
            clock,
            services,
        }
    }

    /// Probes every configured service in order and renders the report.
    pub async fn report(&self) -> String {
        let mut report = format!(
            "Доступность сервисов на {}\n\n",
            self.clock.now().format("%Y-%m-%d %H:%M:%S")
        );

        for service in &self.services {
            let status = self.probe.probe(&service.url).await;
            if status.is_available() {
                report.push_str(&format!("{} 🟢\n{}\n", capitalize(&service.name), service.url));
            } else {
                tracing::warn!(service = %service.name, url = %service.url, ?status, "service unavailable");
                report.push_str(&format!("🛑 {}\n", service.url));
            }
        }
        report
    }
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
