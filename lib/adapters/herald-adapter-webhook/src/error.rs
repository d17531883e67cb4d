//! HTTP error mapping for webhook handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use herald_application::{RelayError, TrackerError};
use herald_domain::UnknownStatus;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message)
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            code: self.code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<UnknownStatus> for ApiError {
    fn from(err: UnknownStatus) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        match &err {
            TrackerError::MissingField(_) => Self::bad_request(err.to_string()),
            TrackerError::MissingCorrelation(_) => Self::conflict(err.to_string()),
            TrackerError::CorruptRecord { .. } => {
                tracing::error!(error = %err, "duration store holds a corrupt record");
                Self::internal(err.to_string())
            }
            TrackerError::Store(_) => {
                tracing::error!(error = ?err, "duration store failure");
                Self::internal("duration store unavailable")
            }
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        if let RelayError::Dispatch(cause) = &err {
            tracing::error!(error = ?cause, "alert dispatch failed");
        }
        Self::bad_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_application::MissingField;
    use herald_domain::DeploymentId;

    #[test]
    fn test_tracker_errors_map_to_status_codes() {
        let missing: ApiError = TrackerError::from(MissingField("environment")).into();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let correlation: ApiError = TrackerError::MissingCorrelation(DeploymentId::from(7)).into();
        assert_eq!(correlation.status(), StatusCode::CONFLICT);
        assert_eq!(correlation.code(), "CONFLICT");

        let corrupt: ApiError = TrackerError::CorruptRecord {
            id: DeploymentId::from(7),
            value: "\"soon\"".into(),
        }
        .into();
        assert_eq!(corrupt.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_status_is_bad_request() {
        let err: ApiError = UnknownStatus("created".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "event status not supported: created");
    }
}
