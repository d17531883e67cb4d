//! Service wiring: adapters in, router and background health check out.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;

use herald_adapter_infra::{HttpAvailabilityProbe, PortainerClient};
use herald_adapter_notification::TelegramNotifier;
use herald_adapter_storage::FileDurationStore;
use herald_adapter_webhook::WebhookState;
use herald_application::{
    AlertRelay, AvailabilityReporter, ChatCommands, ContainerHealthCheck, LifecycleTracker,
};
use herald_domain::HeraldConfig;
use herald_ports::{AvailabilityPort, Clock, ContainerPort, DurationStore, NotificationPort, SystemClock};

const PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything the use cases talk to.
#[derive(Clone)]
pub struct Ports {
    pub store: Arc<dyn DurationStore>,
    pub notifier: Arc<dyn NotificationPort>,
    pub containers: Arc<dyn ContainerPort>,
    pub availability: Arc<dyn AvailabilityPort>,
    pub clock: Arc<dyn Clock>,
}

pub fn build_router(config: &HeraldConfig, ports: &Ports) -> Router {
    let tracker = LifecycleTracker::new(
        Arc::clone(&ports.store),
        Arc::clone(&ports.notifier),
        Arc::clone(&ports.clock),
    );
    let alerts = AlertRelay::new(Arc::clone(&ports.notifier));
    let availability = AvailabilityReporter::new(
        Arc::clone(&ports.availability),
        Arc::clone(&ports.clock),
        config.services.clone(),
    );
    let commands = ChatCommands::new(Arc::clone(&ports.notifier), availability);

    herald_adapter_webhook::router(WebhookState::new(
        Arc::new(tracker),
        Arc::new(alerts),
        Arc::new(commands),
        &config.telegram.bot_token,
    ))
}

pub fn build_health_check(ports: &Ports) -> ContainerHealthCheck {
    ContainerHealthCheck::new(
        Arc::clone(&ports.containers),
        Arc::clone(&ports.notifier),
        Arc::clone(&ports.clock),
    )
}

/// Runs until ctrl-c.
pub async fn run(config: HeraldConfig) -> Result<()> {
    let store = FileDurationStore::open(&config.store_path)
        .await
        .with_context(|| format!("failed to open duration store {}", config.store_path.display()))?;
    tracing::info!(
        path = %store.path().display(),
        records = store.len().await,
        "duration store opened"
    );

    let telegram = Arc::new(TelegramNotifier::new(&config.telegram)?);
    let ports = Ports {
        store: Arc::new(store),
        notifier: telegram.clone(),
        containers: Arc::new(PortainerClient::new(&config.portainer)?),
        availability: Arc::new(HttpAvailabilityProbe::new(PROBE_TIMEOUT)?),
        clock: Arc::new(SystemClock),
    };

    telegram
        .delete_webhook()
        .await
        .context("failed to remove previous bot webhook")?;
    telegram
        .set_webhook(&config.bot_webhook_url())
        .await
        .context("failed to register bot webhook")?;

    let health_check = Arc::new(build_health_check(&ports));
    let health_task = tokio::spawn(health_check.run(config.health_check_interval));

    let router = build_router(&config, &ports);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!(
        addr = %config.bind_addr,
        health_check_interval_secs = config.health_check_interval.as_secs(),
        "relay service listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    health_task.abort();
    tracing::info!("relay service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use herald_adapter_storage::MemoryDurationStore;
    use herald_application::HealthCheckOutcome;
    use herald_domain::{PortainerConfig, ServiceEndpoint, TelegramConfig};
    use herald_ports::{InMemoryNotifier, ManualClock, StaticAvailability, StaticContainers};
    use tower::ServiceExt;

    fn config() -> HeraldConfig {
        HeraldConfig {
            debug: true,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            public_host: "https://herald.example".into(),
            telegram: TelegramConfig {
                bot_token: "42:token".into(),
                chat_id: -1,
            },
            portainer: PortainerConfig {
                url: "https://portainer.example".into(),
                username: "admin".into(),
                password: "pw".into(),
                environment_id: 2,
                verify_tls: true,
            },
            services: vec![ServiceEndpoint::new("GitLab", "https://gitlab.example")],
            store_path: PathBuf::from("unused.db"),
            health_check_interval: Duration::from_secs(3600),
        }
    }

    fn ports(notifier: &InMemoryNotifier, clock: ManualClock) -> Ports {
        Ports {
            store: Arc::new(MemoryDurationStore::new()),
            notifier: Arc::new(notifier.clone()),
            containers: Arc::new(StaticContainers::new(Vec::new())),
            availability: Arc::new(StaticAvailability::new()),
            clock: Arc::new(clock),
        }
    }

    #[tokio::test]
    async fn test_router_serves_bot_path_from_config() {
        let notifier = InMemoryNotifier::new();
        let router = build_router(&config(), &ports(&notifier, ManualClock::at_epoch(0)));

        let request = Request::builder()
            .method("POST")
            .uri("/42:token/")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"update_id":1,"message":{"message_id":1,"chat":{"id":-1},"text":"/help"}}"#,
            ))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("🛑 https://gitlab.example"));
    }

    #[tokio::test]
    async fn test_health_check_shares_ports() {
        use chrono::{Local, TimeZone};

        let notifier = InMemoryNotifier::new();
        let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap());
        let outcome = build_health_check(&ports(&notifier, clock))
            .check_once()
            .await
            .unwrap();

        assert_eq!(outcome, HealthCheckOutcome::AllRunning { containers: 0 });
    }

    #[tokio::test]
    async fn test_file_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("local.db");
        let id = herald_domain::DeploymentId::from(9);

        let store = FileDurationStore::open(&path).await.unwrap();
        store.put(&id, 1_700_000_000.5).await.unwrap();
        drop(store);

        let reopened = FileDurationStore::open(&path).await.unwrap();
        assert_eq!(reopened.get(&id).await.unwrap(), Some(1_700_000_000.5));
    }
}
