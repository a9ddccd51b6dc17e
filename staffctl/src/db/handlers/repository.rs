//! Base repository trait for database operations.

/// Contains the Repository trait.
///
/// A repository is a data access layer for one postgres table. It provides methods for
/// creating, reading, updating and deleting entities, as well as listing them one page at
/// a time with simple filters.
use crate::db::errors::Result;
use crate::db::filters::Page;

/// Base repository trait providing common database operations
///
/// This trait has separate associated types for create requests, update requests, and responses.
/// Updates are full replacements: the update request carries the id of the row it replaces
/// (and, where the entity has one, the concurrency token it was read at).
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The request type for full-replace updates
    type UpdateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity, returning it with its server-assigned columns
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID. Missing rows are [`DbError::NotFound`](crate::db::errors::DbError::NotFound)
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Self::Response>;

    /// List one page of entities matching the filter
    async fn list(&mut self, filter: &Self::Filter) -> Result<Page<Self::Response>>;

    /// Replace a stored entity
    async fn update(&mut self, request: &Self::UpdateRequest) -> Result<Self::Response>;

    /// Delete an entity by ID. Deleting nothing is [`DbError::NotFound`](crate::db::errors::DbError::NotFound)
    async fn delete(&mut self, id: Self::Id) -> Result<()>;
}
