//! Error handling module for the gateway.
//!
//! Provides centralized error types with mapping to HTTP status codes, problem
//! bodies and alert headers.

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Message keys for errors that are not entity-specific.
pub mod codes {
    pub const BAD_REQUEST: &str = "error.http.400";
    pub const NOT_FOUND: &str = "error.http.404";
    pub const INTERNAL_ERROR: &str = "error.http.500";
    pub const BAD_GATEWAY: &str = "error.http.502";
}

/// Application error type.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Request rejected for a specific entity, with a translatable key
    BadRequestAlert {
        message: String,
        entity_name: String,
        error_key: String,
    },
    /// Malformed request
    BadRequest(String),
    /// Database error
    Database(String),
    /// Upstream call failed or returned an unreadable response
    Transport(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    pub fn alert(
        message: impl Into<String>,
        entity_name: impl Into<String>,
        error_key: impl Into<String>,
    ) -> Self {
        AppError::BadRequestAlert {
            message: message.into(),
            entity_name: entity_name.into(),
            error_key: error_key.into(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequestAlert { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message key for this error, e.g. `error.idexists`.
    pub fn error_key(&self) -> String {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND.to_string(),
            AppError::BadRequestAlert { error_key, .. } => format!("error.{}", error_key),
            AppError::BadRequest(_) => codes::BAD_REQUEST.to_string(),
            AppError::Database(_) => codes::INTERNAL_ERROR.to_string(),
            AppError::Transport(_) => codes::BAD_GATEWAY.to_string(),
            AppError::Internal(_) => codes::INTERNAL_ERROR.to_string(),
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::BadRequestAlert { message, .. } => message.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Database(msg) => msg.clone(),
            AppError::Transport(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Rebuild an error from a status code and the problem body an upstream
    /// gateway returned.
    pub fn from_problem(status: StatusCode, problem: Option<ErrorResponse>) -> Self {
        let Some(problem) = problem else {
            return match status {
                StatusCode::NOT_FOUND => AppError::NotFound("Not Found".to_string()),
                s if s.is_client_error() => AppError::BadRequest(s.to_string()),
                s => AppError::Transport(format!("Upstream responded with {}", s)),
            };
        };

        let text = problem.detail.clone().unwrap_or_else(|| problem.title.clone());
        match (status, problem.entity_name, problem.error_key) {
            (StatusCode::NOT_FOUND, _, _) => AppError::NotFound(text),
            (StatusCode::BAD_REQUEST, Some(entity_name), Some(error_key)) => {
                AppError::BadRequestAlert {
                    message: problem.title,
                    entity_name,
                    error_key,
                }
            }
            (s, _, _) if s.is_client_error() => AppError::BadRequest(text),
            _ => AppError::Internal(text),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_key(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("HTTP client error: {:?}", err);
        AppError::Transport(format!("HTTP client error: {}", err))
    }
}

/// Problem body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub title: String,
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let status = error.status_code();
        match error {
            AppError::BadRequestAlert {
                message,
                entity_name,
                error_key,
            } => Self {
                title: message.clone(),
                status: status.as_u16(),
                message: error.error_key(),
                entity_name: Some(entity_name.clone()),
                error_key: Some(error_key.clone()),
                detail: None,
            },
            _ => Self {
                title: status
                    .canonical_reason()
                    .unwrap_or("Unknown Error")
                    .to_string(),
                status: status.as_u16(),
                message: error.error_key(),
                entity_name: None,
                error_key: None,
                detail: Some(error.message()),
            },
        }
    }
}

/// Wrapper type for errors that carry the application name so the response
/// can be tagged with `X-<app>-error` headers.
pub struct AppErrorWithAlert {
    pub error: AppError,
    pub app_name: String,
}

impl IntoResponse for AppErrorWithAlert {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error);
        let mut response = (status, Json(body)).into_response();

        if let AppError::BadRequestAlert { entity_name, .. } = &self.error {
            let headers = response.headers_mut();
            if let Some((name, value)) = header_pair(&self.app_name, "error", &self.error.error_key())
            {
                headers.insert(name, value);
            }
            if let Some((name, value)) = header_pair(&self.app_name, "params", entity_name) {
                headers.insert(name, value);
            }
        }

        response
    }
}

/// Build an `X-<app>-<suffix>` header, skipping values that are not valid
/// header text.
pub fn header_pair(app_name: &str, suffix: &str, value: &str) -> Option<(HeaderName, HeaderValue)> {
    let name = HeaderName::try_from(format!("x-{}-{}", app_name.to_ascii_lowercase(), suffix)).ok()?;
    let value = HeaderValue::from_str(value).ok()?;
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_problem_body() {
        let err = AppError::alert(
            "A new department cannot already have an ID",
            "department",
            "idexists",
        );
        let body = ErrorResponse::new(&err);

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "error.idexists");
        assert_eq!(body.title, "A new department cannot already have an ID");
        assert_eq!(body.entity_name.as_deref(), Some("department"));
        assert!(body.detail.is_none());
    }

    #[test]
    fn test_not_found_problem_body() {
        let body = ErrorResponse::new(&AppError::NotFound("Employee 9 not found".to_string()));

        assert_eq!(body.status, 404);
        assert_eq!(body.title, "Not Found");
        assert_eq!(body.message, codes::NOT_FOUND);
        assert_eq!(body.detail.as_deref(), Some("Employee 9 not found"));
    }

    #[test]
    fn test_from_problem_rebuilds_alert() {
        let err = AppError::alert("Invalid ID", "employee", "idinvalid");
        let rebuilt = AppError::from_problem(StatusCode::BAD_REQUEST, Some(ErrorResponse::new(&err)));
        assert_eq!(rebuilt, err);
    }

    #[test]
    fn test_from_problem_without_body() {
        assert!(matches!(
            AppError::from_problem(StatusCode::NOT_FOUND, None),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from_problem(StatusCode::SERVICE_UNAVAILABLE, None),
            AppError::Transport(_)
        ));
    }

    #[test]
    fn test_header_pair_lowercases_app_name() {
        let (name, value) = header_pair("employeeManagerGatewayApp", "alert", "x.created").unwrap();
        assert_eq!(name.as_str(), "x-employeemanagergatewayapp-alert");
        assert_eq!(value, "x.created");
    }
}
