//! Database record structures matching table schemas, plus the partial-update
//! types merged onto them before a full-replace update.

pub mod clearances;
pub mod field_update;
pub mod positions;
pub mod resource_requests;
pub mod resources;

pub use field_update::FieldUpdate;
