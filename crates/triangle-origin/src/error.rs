use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::origin::{OriginError, QualificationServiceError, RepositoryError};
use crate::workflows::reference::ReferenceImportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Reference(ReferenceImportError),
    Origin(OriginError),
    Repository(RepositoryError),
    Input(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Reference(err) => write!(f, "reference data error: {}", err),
            AppError::Origin(err) => write!(f, "{}", err),
            AppError::Repository(err) => write!(f, "analysis storage error: {}", err),
            AppError::Input(err) => write!(f, "invalid input document: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Reference(err) => Some(err),
            AppError::Origin(err) => Some(err),
            AppError::Repository(err) => Some(err),
            AppError::Input(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Origin(OriginError::Validation(_)) | AppError::Input(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Origin(OriginError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Origin(OriginError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Origin(OriginError::ReferenceUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            AppError::Reference(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ReferenceImportError> for AppError {
    fn from(value: ReferenceImportError) -> Self {
        Self::Reference(value)
    }
}

impl From<OriginError> for AppError {
    fn from(value: OriginError) -> Self {
        Self::Origin(value)
    }
}

impl From<QualificationServiceError> for AppError {
    fn from(value: QualificationServiceError) -> Self {
        match value {
            QualificationServiceError::Origin(err) => Self::Origin(err),
            QualificationServiceError::Repository(err) => Self::Repository(err),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Input(value)
    }
}
