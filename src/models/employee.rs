//! Employee model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Department, Entity};

/// An employee record. The identifier is assigned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// ISO-8601 instant, e.g. `2021-09-01T08:30:00Z`
    #[serde(default)]
    pub date_of_hiring: Option<DateTime<Utc>>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub department: Option<Department>,
}

impl Employee {
    /// Identifier of the referenced department, if any.
    pub fn department_id(&self) -> Option<i64> {
        self.department.as_ref().and_then(|d| d.id)
    }

    /// Overwrite every field the patch carries a value for.
    pub fn merge(&mut self, patch: &Employee) {
        if let Some(first_name) = &patch.first_name {
            self.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = Some(last_name.clone());
        }
        if let Some(date_of_hiring) = patch.date_of_hiring {
            self.date_of_hiring = Some(date_of_hiring);
        }
        if let Some(salary) = patch.salary {
            self.salary = Some(salary);
        }
        if let Some(department) = &patch.department {
            self.department = Some(department.clone());
        }
    }
}

impl Entity for Employee {
    const ENTITY_NAME: &'static str = "employee";
    const RESOURCE: &'static str = "employees";

    fn id(&self) -> Option<i64> {
        self.id
    }
}
