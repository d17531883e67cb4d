//! Inbound HTTP surface: GitLab deployment hooks, Alertmanager alerts and
//! Telegram bot updates.

pub mod error;
mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use herald_application::{AlertRelay, ChatCommands, LifecycleTracker};

pub use error::{ApiError, ApiErrorBody, ApiResult};

pub const DEPLOYMENT_PATH: &str = "/webhooks/gitlab/deployment/";
pub const ALERTS_PATH: &str = "/webhooks/alerts/";
pub const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
pub struct WebhookState {
    tracker: Arc<LifecycleTracker>,
    alerts: Arc<AlertRelay>,
    commands: Arc<ChatCommands>,
    bot_path: Arc<str>,
}

impl WebhookState {
    pub fn new(
        tracker: Arc<LifecycleTracker>,
        alerts: Arc<AlertRelay>,
        commands: Arc<ChatCommands>,
        bot_token: &str,
    ) -> Self {
        Self {
            tracker,
            alerts,
            commands,
            bot_path: format!("/{bot_token}/").into(),
        }
    }
}

pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(routes::health))
        .route(DEPLOYMENT_PATH, post(routes::gitlab_deployment))
        .route(ALERTS_PATH, post(routes::alerts))
        .fallback(routes::bot_update)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
