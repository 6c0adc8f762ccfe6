//! Department model.

use serde::{Deserialize, Serialize};

use super::Entity;

/// A department employees can be assigned to.
///
/// When embedded in an [`Employee`](super::Employee) the value may be partial,
/// carrying only the `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Department {
    /// A reference carrying only the identifier.
    pub fn reference(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Overwrite every field the patch carries a value for.
    pub fn merge(&mut self, patch: &Department) {
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        if let Some(address) = &patch.address {
            self.address = Some(address.clone());
        }
    }
}

impl Entity for Department {
    const ENTITY_NAME: &'static str = "department";
    const RESOURCE: &'static str = "departments";

    fn id(&self) -> Option<i64> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_missing_fields() {
        let mut stored = Department {
            id: Some(1),
            name: Some("Research".to_string()),
            address: Some("Main St 1".to_string()),
        };
        stored.merge(&Department {
            id: Some(1),
            name: None,
            address: Some("Harbour Rd 7".to_string()),
        });

        assert_eq!(stored.name.as_deref(), Some("Research"));
        assert_eq!(stored.address.as_deref(), Some("Harbour Rd 7"));
    }

    #[test]
    fn test_partial_reference_deserializes() {
        let department: Department = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(department, Department::reference(3));
    }
}
