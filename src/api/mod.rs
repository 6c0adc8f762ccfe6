//! REST API module.
//!
//! Contains the entity resources under `/api` and the admin pages.

mod departments;
mod employees;
mod pages;

pub use departments::*;
pub use employees::*;
pub use pages::*;

use axum::{
    extract::{FromRequest, Request},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{header_pair, AppError, AppErrorWithAlert};
use crate::models::Entity;
use crate::AppState;

pub const NDJSON: &str = "application/x-ndjson";

/// Response type that can be either success or error.
pub type ApiResult = Result<Response, AppErrorWithAlert>;

/// Create an error API response tagged with the application name.
pub fn error(err: AppError, state: &AppState) -> ApiResult {
    Err(AppErrorWithAlert {
        error: err,
        app_name: state.config.app_name.clone(),
    })
}

/// JSON request body whose rejection is reported as a problem body.
pub struct ApiJson<T>(pub T);

impl<T: DeserializeOwned + Send> FromRequest<AppState> for ApiJson<T> {
    type Rejection = AppErrorWithAlert;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                Err(AppErrorWithAlert {
                    error: AppError::BadRequest(rejection.body_text()),
                    app_name: state.config.app_name.clone(),
                })
            }
        }
    }
}

/// Lift a repository result into an [`ApiResult`].
pub fn check<T>(result: Result<T, AppError>, state: &AppState) -> Result<T, AppErrorWithAlert> {
    result.map_err(|error| AppErrorWithAlert {
        error,
        app_name: state.config.app_name.clone(),
    })
}

/// Headers announcing a successful write, e.g.
/// `X-<app>-alert: <app>.employee.created` and `X-<app>-params: 7`.
pub fn alert_headers<E: Entity>(state: &AppState, action: &str, id: i64) -> HeaderMap {
    let app_name = &state.config.app_name;
    let mut headers = HeaderMap::new();
    let alert = format!("{}.{}.{}", app_name, E::ENTITY_NAME, action);
    if let Some((name, value)) = header_pair(app_name, "alert", &alert) {
        headers.insert(name, value);
    }
    if let Some((name, value)) = header_pair(app_name, "params", &id.to_string()) {
        headers.insert(name, value);
    }
    headers
}

/// Whether the client asked for newline-delimited JSON.
pub fn wants_ndjson(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains(NDJSON))
}

/// Render a collection as a JSON array, or one object per line when the
/// client accepts NDJSON.
pub fn collection<T: Serialize>(items: Vec<T>, headers: &HeaderMap) -> Result<Response, AppError> {
    if !wants_ndjson(headers) {
        return Ok((StatusCode::OK, Json(items)).into_response());
    }

    let mut body = Vec::new();
    for item in &items {
        serde_json::to_writer(&mut body, item)?;
        body.push(b'\n');
    }
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(NDJSON))],
        body,
    )
        .into_response())
}

/// 201 with `Location` and alert headers.
pub fn created<E: Entity>(state: &AppState, entity: E) -> Response {
    let id = entity.id().unwrap_or_default();
    let mut headers = alert_headers::<E>(state, "created", id);
    let location = format!("/api/{}/{}", E::RESOURCE, id);
    if let Ok(value) = HeaderValue::from_str(&location) {
        headers.insert(header::LOCATION, value);
    }
    (StatusCode::CREATED, headers, Json(entity)).into_response()
}

pub fn updated<E: Entity>(state: &AppState, entity: E) -> Response {
    let headers = alert_headers::<E>(state, "updated", entity.id().unwrap_or_default());
    (StatusCode::OK, headers, Json(entity)).into_response()
}

pub fn deleted<E: Entity>(state: &AppState, id: i64) -> Response {
    let headers = alert_headers::<E>(state, "deleted", id);
    (StatusCode::NO_CONTENT, headers).into_response()
}
