//! Access to backend records for the admin views.
//!
//! [`EntityApi`] is the seam the views and the store fetch through. The gateway
//! serves its pages from the in-process [`Repository`], or through
//! [`HttpEmployeeApi`] from a remote gateway when one is configured.

pub mod http;

pub use http::HttpEmployeeApi;

use async_trait::async_trait;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{Department, Employee, Entity};

/// Remote operations on one entity collection.
#[async_trait]
pub trait EntityApi<E: Entity>: Send + Sync {
    /// Fetch every record, in backend order.
    async fn fetch_collection(&self) -> Result<Vec<E>, AppError>;

    /// Fetch one record by the identifier taken from the route.
    async fn fetch_by_id(&self, id: &str) -> Result<E, AppError>;

    async fn create(&self, entity: &E) -> Result<E, AppError>;

    async fn update(&self, entity: &E) -> Result<E, AppError>;

    /// Send only the fields that are set; the backend keeps the rest.
    async fn partial_update(&self, entity: &E) -> Result<E, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

/// Parse a route identifier into a record id.
pub fn parse_id<E: Entity>(id: &str) -> Result<i64, AppError> {
    id.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} id {:?}", E::ENTITY_NAME, id)))
}

fn require_id<E: Entity>(entity: &E) -> Result<i64, AppError> {
    entity
        .id()
        .ok_or_else(|| AppError::alert("Invalid id", E::ENTITY_NAME, "idnull"))
}

fn not_found<E: Entity>(id: i64) -> AppError {
    AppError::NotFound(format!("{} {} not found", E::ENTITY_NAME, id))
}

#[async_trait]
impl EntityApi<Employee> for Repository {
    async fn fetch_collection(&self) -> Result<Vec<Employee>, AppError> {
        self.list_employees().await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Employee, AppError> {
        let id = parse_id::<Employee>(id)?;
        self.get_employee(id)
            .await?
            .ok_or_else(|| not_found::<Employee>(id))
    }

    async fn create(&self, employee: &Employee) -> Result<Employee, AppError> {
        self.create_employee(employee).await
    }

    async fn update(&self, employee: &Employee) -> Result<Employee, AppError> {
        self.update_employee(require_id(employee)?, employee).await
    }

    async fn partial_update(&self, employee: &Employee) -> Result<Employee, AppError> {
        self.patch_employee(require_id(employee)?, employee).await
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.delete_employee(id).await
    }
}

#[async_trait]
impl EntityApi<Department> for Repository {
    async fn fetch_collection(&self) -> Result<Vec<Department>, AppError> {
        self.list_departments().await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Department, AppError> {
        let id = parse_id::<Department>(id)?;
        self.get_department(id)
            .await?
            .ok_or_else(|| not_found::<Department>(id))
    }

    async fn create(&self, department: &Department) -> Result<Department, AppError> {
        self.create_department(department).await
    }

    async fn update(&self, department: &Department) -> Result<Department, AppError> {
        self.update_department(require_id(department)?, department)
            .await
    }

    async fn partial_update(&self, department: &Department) -> Result<Department, AppError> {
        self.patch_department(require_id(department)?, department)
            .await
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.delete_department(id).await
    }
}
