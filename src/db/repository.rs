//! Database repository for CRUD operations.
//!
//! Uses prepared statements; employee reads join the department table so the
//! embedded department is always the stored one.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Department, Employee, Entity};

const DEPARTMENT_SELECT: &str = "SELECT e.id AS e_id, e.name AS e_name, e.address AS e_address FROM department e";

const EMPLOYEE_SELECT: &str = r#"
    SELECT
        e.id AS e_id,
        e.first_name AS e_first_name,
        e.last_name AS e_last_name,
        e.date_of_hiring AS e_date_of_hiring,
        e.salary AS e_salary,
        e.department_id AS e_department_id,
        department.id AS department_id,
        department.name AS department_name,
        department.address AS department_address
    FROM employee e
    LEFT OUTER JOIN department department ON e.department_id = department.id
"#;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== DEPARTMENT OPERATIONS ====================

    /// List all departments ordered by id.
    pub async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let rows = sqlx::query(&format!("{} ORDER BY e.id", DEPARTMENT_SELECT))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| department_from_row(row, "e").map_err(AppError::from))
            .collect()
    }

    /// Get a department by ID.
    pub async fn get_department(&self, id: i64) -> Result<Option<Department>, AppError> {
        let row = sqlx::query(&format!("{} WHERE e.id = ?", DEPARTMENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(|r| department_from_row(r, "e")).transpose()?)
    }

    pub async fn department_exists(&self, id: i64) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM department WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>("n")? > 0)
    }

    /// Create a new department. The backend assigns the identifier.
    pub async fn create_department(&self, department: &Department) -> Result<Department, AppError> {
        if department.id.is_some() {
            return Err(AppError::alert(
                "A new department cannot already have an ID",
                Department::ENTITY_NAME,
                "idexists",
            ));
        }

        let result = sqlx::query("INSERT INTO department (name, address) VALUES (?, ?)")
            .bind(&department.name)
            .bind(&department.address)
            .execute(&self.pool)
            .await?;

        Ok(Department {
            id: Some(result.last_insert_rowid()),
            ..department.clone()
        })
    }

    /// Replace every field of an existing department.
    pub async fn update_department(
        &self,
        id: i64,
        department: &Department,
    ) -> Result<Department, AppError> {
        check_path_id::<Department>(id, department.id)?;
        if !self.department_exists(id).await? {
            return Err(entity_not_found::<Department>());
        }

        self.write_department(id, department).await
    }

    /// Overwrite only the fields the patch carries.
    pub async fn patch_department(
        &self,
        id: i64,
        patch: &Department,
    ) -> Result<Department, AppError> {
        check_path_id::<Department>(id, patch.id)?;
        let mut existing = self
            .get_department(id)
            .await?
            .ok_or_else(entity_not_found::<Department>)?;

        existing.merge(patch);
        self.write_department(id, &existing).await
    }

    async fn write_department(&self, id: i64, department: &Department) -> Result<Department, AppError> {
        let result = sqlx::query("UPDATE department SET name = ?, address = ? WHERE id = ?")
            .bind(&department.name)
            .bind(&department.address)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Department {} not found", id)));
        }

        Ok(Department {
            id: Some(id),
            ..department.clone()
        })
    }

    /// Delete a department. Employees referencing it lose the reference.
    /// Deleting an unknown id is not an error.
    pub async fn delete_department(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM department WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== EMPLOYEE OPERATIONS ====================

    /// List all employees ordered by id, each with its department embedded.
    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let rows = sqlx::query(&format!("{} ORDER BY e.id", EMPLOYEE_SELECT))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| employee_from_row(row).map_err(AppError::from))
            .collect()
    }

    /// Get an employee by ID.
    pub async fn get_employee(&self, id: i64) -> Result<Option<Employee>, AppError> {
        let row = sqlx::query(&format!("{} WHERE e.id = ?", EMPLOYEE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(employee_from_row).transpose()?)
    }

    pub async fn employee_exists(&self, id: i64) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM employee WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>("n")? > 0)
    }

    /// Create a new employee. The backend assigns the identifier.
    pub async fn create_employee(&self, employee: &Employee) -> Result<Employee, AppError> {
        if employee.id.is_some() {
            return Err(AppError::alert(
                "A new employee cannot already have an ID",
                Employee::ENTITY_NAME,
                "idexists",
            ));
        }
        self.ensure_department(employee).await?;

        let result = sqlx::query(
            "INSERT INTO employee (first_name, last_name, date_of_hiring, salary, department_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(employee.date_of_hiring)
        .bind(employee.salary)
        .bind(employee.department_id())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_employee(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Employee {} vanished after insert", id)))
    }

    /// Replace every field of an existing employee.
    pub async fn update_employee(&self, id: i64, employee: &Employee) -> Result<Employee, AppError> {
        check_path_id::<Employee>(id, employee.id)?;
        if !self.employee_exists(id).await? {
            return Err(entity_not_found::<Employee>());
        }

        self.write_employee(id, employee).await
    }

    /// Overwrite only the fields the patch carries.
    pub async fn patch_employee(&self, id: i64, patch: &Employee) -> Result<Employee, AppError> {
        check_path_id::<Employee>(id, patch.id)?;
        let mut existing = self
            .get_employee(id)
            .await?
            .ok_or_else(entity_not_found::<Employee>)?;

        existing.merge(patch);
        self.write_employee(id, &existing).await
    }

    async fn write_employee(&self, id: i64, employee: &Employee) -> Result<Employee, AppError> {
        self.ensure_department(employee).await?;

        let result = sqlx::query(
            "UPDATE employee SET first_name = ?, last_name = ?, date_of_hiring = ?, salary = ?, department_id = ? WHERE id = ?",
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(employee.date_of_hiring)
        .bind(employee.salary)
        .bind(employee.department_id())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Employee {} not found", id)));
        }

        self.get_employee(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))
    }

    /// Delete an employee. Deleting an unknown id is not an error.
    pub async fn delete_employee(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM employee WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ensure_department(&self, employee: &Employee) -> Result<(), AppError> {
        if let Some(department_id) = employee.department_id() {
            if !self.department_exists(department_id).await? {
                return Err(AppError::alert(
                    format!("Department {} does not exist", department_id),
                    Employee::ENTITY_NAME,
                    "departmentnotfound",
                ));
            }
        }
        Ok(())
    }
}

// ==================== ID CHECKS ====================

/// The body of an update must carry the same id as the path.
fn check_path_id<E: Entity>(path_id: i64, body_id: Option<i64>) -> Result<(), AppError> {
    match body_id {
        None => Err(AppError::alert("Invalid id", E::ENTITY_NAME, "idnull")),
        Some(body_id) if body_id != path_id => {
            Err(AppError::alert("Invalid ID", E::ENTITY_NAME, "idinvalid"))
        }
        Some(_) => Ok(()),
    }
}

fn entity_not_found<E: Entity>() -> AppError {
    AppError::alert("Entity not found", E::ENTITY_NAME, "idnotfound")
}

// ==================== ROW CONVERSION ====================

/// Read a department from columns named `<prefix>_id`, `<prefix>_name`,
/// `<prefix>_address`.
fn department_from_row(row: &SqliteRow, prefix: &str) -> Result<Department, sqlx::Error> {
    Ok(Department {
        id: row.try_get(format!("{}_id", prefix).as_str())?,
        name: row.try_get(format!("{}_name", prefix).as_str())?,
        address: row.try_get(format!("{}_address", prefix).as_str())?,
    })
}

fn employee_from_row(row: &SqliteRow) -> Result<Employee, sqlx::Error> {
    let department_id: Option<i64> = row.try_get("e_department_id")?;
    let department = match department_id {
        Some(id) => {
            let joined = department_from_row(row, "department")?;
            if joined.id.is_some() {
                Some(joined)
            } else {
                Some(Department::reference(id))
            }
        }
        None => None,
    };

    Ok(Employee {
        id: row.try_get("e_id")?,
        first_name: row.try_get("e_first_name")?,
        last_name: row.try_get("e_last_name")?,
        date_of_hiring: row.try_get("e_date_of_hiring")?,
        salary: row.try_get("e_salary")?,
        department,
    })
}
