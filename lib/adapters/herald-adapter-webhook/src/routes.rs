use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, Uri};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use herald_domain::{AlertBatch, ChatUpdate, DeploymentEvent, DeploymentStatus};

use crate::WebhookState;
use crate::error::{ApiError, ApiResult};

fn parse_json<T: DeserializeOwned>(body: &[u8], what: &str) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|err| ApiError::bad_request(format!("malformed {what}: {err}")))
}

pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn gitlab_deployment(
    State(state): State<WebhookState>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let payload: Value = parse_json(&body, "deployment event")?;
    // Unsupported statuses get their own message instead of a serde variant error.
    let status: DeploymentStatus = payload
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::bad_request("payload is missing `status`"))?
        .parse()?;
    let event: DeploymentEvent = serde_json::from_value(payload)
        .map_err(|err| ApiError::bad_request(format!("malformed deployment event: {err}")))?;

    tracing::info!(deployment_id = %event.deployment_id, %status, "deployment event received");
    let outcome = state.tracker.handle(&event).await?;

    Ok(Json(json!({
        "status": "ok",
        "deployment_id": outcome.deployment_id,
        "event": outcome.status,
        "elapsed": outcome.elapsed.map(|elapsed| elapsed.to_string()),
        "dispatched": outcome.dispatched,
    })))
}

pub(crate) async fn alerts(
    State(state): State<WebhookState>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let batch: AlertBatch = parse_json(&body, "alert batch")?;
    tracing::info!(alerts = batch.alerts.len(), "alert batch received");
    let relayed = state.alerts.relay(&batch.alerts).await?;
    Ok(Json(json!({ "status": "ok", "relayed": relayed })))
}

/// Bot updates arrive on `/{bot_token}/`. The token is matched here rather
/// than in the route table since tokens contain `:`.
pub(crate) async fn bot_update(
    State(state): State<WebhookState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    if method != Method::POST || uri.path() != state.bot_path.as_ref() {
        return Err(ApiError::not_found("no route"));
    }

    let update: ChatUpdate = parse_json(&body, "bot update")?;
    match state.commands.handle(&update).await {
        Ok(outcome) => {
            tracing::debug!(update_id = update.update_id, ?outcome, "bot update handled");
        }
        Err(err) => {
            tracing::error!(update_id = update.update_id, error = ?err, "bot update failed");
        }
    }
    Ok(Json(json!({ "status": "ok" })))
}
