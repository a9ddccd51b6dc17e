//! API request and response models.
//!
//! JSON bodies use camelCase field names; the same names key the messages of a
//! failed-validation response.

pub mod clearances;
pub mod healthcheck;
pub mod pagination;
pub mod positions;
pub mod resource_requests;
pub mod resources;
