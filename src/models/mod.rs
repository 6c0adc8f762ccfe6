//! Data models for the employee manager gateway.
//!
//! The JSON shape matches what the admin views and the REST clients exchange:
//! camelCase keys, absent optional values serialised as `null`.

use serde::de::DeserializeOwned;
use serde::Serialize;

mod department;
mod employee;

pub use department::*;
pub use employee::*;

/// A backend-owned record type exposed as a REST resource.
pub trait Entity:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// Name used in alert headers and error bodies, e.g. `employee`.
    const ENTITY_NAME: &'static str;
    /// Collection path segment under `/api`, e.g. `employees`.
    const RESOURCE: &'static str;

    fn id(&self) -> Option<i64>;
}
