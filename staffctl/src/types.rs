//! Common type definitions.
//!
//! All entity IDs are server-generated `BIGSERIAL` keys wrapped in type aliases:
//!
//! - [`PositionId`]: Position (job title) identifier
//! - [`ClearanceId`]: Security clearance identifier
//! - [`ResourceId`]: Resource (person) identifier
//! - [`ResourceRequestId`]: Resource request (staffing demand) identifier
//!
//! The optimistic concurrency token carried by resource requests is a
//! [`Version`] counter.

// Type aliases for IDs
pub type PositionId = i64;
pub type ClearanceId = i64;
pub type ResourceId = i64;
pub type ResourceRequestId = i64;

/// Monotonically incrementing concurrency token
pub type Version = i32;
