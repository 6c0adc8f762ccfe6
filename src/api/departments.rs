//! Department API endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};

use super::{check, collection, created, deleted, error, updated, ApiJson, ApiResult};
use crate::client::parse_id;
use crate::errors::AppError;
use crate::models::Department;
use crate::AppState;

/// POST /api/departments - Create a new department.
pub async fn create_department(
    State(state): State<AppState>,
    ApiJson(department): ApiJson<Department>,
) -> ApiResult {
    tracing::debug!("REST request to save Department : {:?}", department);

    let saved = check(state.repo.create_department(&department).await, &state)?;
    Ok(created(&state, saved))
}

/// PUT /api/departments/:id - Replace a department.
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(department): ApiJson<Department>,
) -> ApiResult {
    tracing::debug!("REST request to update Department : {}, {:?}", id, department);

    let id = check(parse_id::<Department>(&id), &state)?;
    let saved = check(state.repo.update_department(id, &department).await, &state)?;
    Ok(updated(&state, saved))
}

/// PATCH /api/departments/:id - Update the provided fields of a department.
pub async fn patch_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<Department>,
) -> ApiResult {
    tracing::debug!("REST request to partial update Department partially : {}, {:?}", id, patch);

    let id = check(parse_id::<Department>(&id), &state)?;
    let saved = check(state.repo.patch_department(id, &patch).await, &state)?;
    Ok(updated(&state, saved))
}

/// GET /api/departments - List all departments.
pub async fn list_departments(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    tracing::debug!("REST request to get all Departments");

    let departments = check(state.repo.list_departments().await, &state)?;
    check(collection(departments, &headers), &state)
}

/// GET /api/departments/:id - Get a single department.
pub async fn get_department(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    tracing::debug!("REST request to get Department : {}", id);

    let id = check(parse_id::<Department>(&id), &state)?;
    match state.repo.get_department(id).await {
        Ok(Some(department)) => Ok(Json(department).into_response()),
        Ok(None) => error(
            AppError::NotFound(format!("Department {} not found", id)),
            &state,
        ),
        Err(e) => error(e, &state),
    }
}

/// DELETE /api/departments/:id - Delete a department.
pub async fn delete_department(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    tracing::debug!("REST request to delete Department : {}", id);

    let id = check(parse_id::<Department>(&id), &state)?;
    check(state.repo.delete_department(id).await, &state)?;
    Ok(deleted::<Department>(&state, id))
}
