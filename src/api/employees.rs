//! Employee API endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};

use super::{check, collection, created, deleted, error, updated, ApiJson, ApiResult};
use crate::client::parse_id;
use crate::errors::AppError;
use crate::models::Employee;
use crate::AppState;

/// POST /api/employees - Create a new employee.
pub async fn create_employee(
    State(state): State<AppState>,
    ApiJson(employee): ApiJson<Employee>,
) -> ApiResult {
    tracing::debug!("REST request to save Employee : {:?}", employee);

    let saved = check(state.repo.create_employee(&employee).await, &state)?;
    Ok(created(&state, saved))
}

/// PUT /api/employees/:id - Replace an employee.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(employee): ApiJson<Employee>,
) -> ApiResult {
    tracing::debug!("REST request to update Employee : {}, {:?}", id, employee);

    let id = check(parse_id::<Employee>(&id), &state)?;
    let saved = check(state.repo.update_employee(id, &employee).await, &state)?;
    Ok(updated(&state, saved))
}

/// PATCH /api/employees/:id - Update the provided fields of an employee.
pub async fn patch_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<Employee>,
) -> ApiResult {
    tracing::debug!("REST request to partial update Employee partially : {}, {:?}", id, patch);

    let id = check(parse_id::<Employee>(&id), &state)?;
    let saved = check(state.repo.patch_employee(id, &patch).await, &state)?;
    Ok(updated(&state, saved))
}

/// GET /api/employees - List all employees with their departments.
pub async fn list_employees(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    tracing::debug!("REST request to get all Employees");

    let employees = check(state.repo.list_employees().await, &state)?;
    check(collection(employees, &headers), &state)
}

/// GET /api/employees/:id - Get a single employee.
pub async fn get_employee(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    tracing::debug!("REST request to get Employee : {}", id);

    let id = check(parse_id::<Employee>(&id), &state)?;
    match state.repo.get_employee(id).await {
        Ok(Some(employee)) => Ok(Json(employee).into_response()),
        Ok(None) => error(
            AppError::NotFound(format!("Employee {} not found", id)),
            &state,
        ),
        Err(e) => error(e, &state),
    }
}

/// DELETE /api/employees/:id - Delete an employee.
pub async fn delete_employee(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    tracing::debug!("REST request to delete Employee : {}", id);

    let id = check(parse_id::<Employee>(&id), &state)?;
    check(state.repo.delete_employee(id).await, &state)?;
    Ok(deleted::<Employee>(&state, id))
}
