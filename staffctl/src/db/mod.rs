//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - validation, reference lookups & queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Database record structures matching table schemas
//! - [`filters`]: Paging, sort safelists and result-set metadata
//! - [`errors`]: Database-specific error types
//! - [`pools`]: Connection pool construction from configuration
//!
//! # Deadlines
//!
//! Every repository operation runs under a deadline (see [`with_deadline`]). When it
//! elapses the in-flight future is dropped, which cancels the statement, and the
//! caller receives [`errors::DbError::Timeout`].
//!
//! ## Example Usage
//!
//! ```ignore
//! use staffctl::db::handlers::{Repository, Resources};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut resources = Resources::new(&mut conn);
//!
//!     let resource = resources.get_by_id(42).await?;
//!     println!("{} {}", resource.first_name, resource.last_name);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod filters;
pub mod handlers;
pub mod models;
pub mod pools;

use errors::{DbError, Result};
use std::future::Future;
use std::time::Duration;

/// Deadline applied to repository operations when none is configured.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Run `fut` to completion or fail with [`DbError::Timeout`] once `after` elapses.
pub async fn with_deadline<T, F>(after: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| DbError::Timeout { after })?
}
