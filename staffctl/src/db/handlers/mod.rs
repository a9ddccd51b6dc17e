//! Repository implementations for database access.
//!
//! This module provides a repository struct for each entity in the system.
//! Repositories follow a consistent pattern and implement the [`Repository`] trait.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction handed to it at construction
//! - Provides strongly-typed CRUD operations, each bounded by a deadline
//! - Handles query construction and parameter binding
//! - Resolves references by name (position title, clearance description) before writing
//! - Returns domain models from [`crate::db::models`]
//!
//! Field-level business rules live in [`crate::validation`] and are checked by callers
//! before a request reaches a repository.
//!
//! # Available Repositories
//!
//! - [`Positions`]: Position titles
//! - [`Clearances`]: Security clearance levels
//! - [`Resources`]: People available for staffing
//! - [`ResourceRequests`]: Staffing demands from customers, with versioned updates
//!
//! # Common Pattern
//!
//! ```ignore
//! use staffctl::db::handlers::{Repository, ResourceRequests};
//!
//! async fn close(pool: &sqlx::PgPool, id: i64) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = ResourceRequests::new(&mut conn);
//!
//!     let mut request = repo.get_by_id(id).await?;
//!     request.closed = true;
//!     // Fails with DbError::Conflict if someone else updated it in between
//!     repo.update(&request).await?;
//!     Ok(())
//! }
//! ```

pub mod clearances;
pub mod positions;
pub mod repository;
pub mod resource_requests;
pub mod resources;

pub use clearances::{ClearanceFilter, Clearances};
pub use positions::{PositionFilter, Positions};
pub use repository::Repository;
pub use resource_requests::{ResourceRequestFilter, ResourceRequests};
pub use resources::{ResourceFilter, Resources};
