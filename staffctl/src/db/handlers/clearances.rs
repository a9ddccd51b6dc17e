//! Database repository for clearance levels.

use crate::db::{
    DEFAULT_QUERY_TIMEOUT,
    errors::{DbError, Result},
    filters::{Filters, Page, collect_page},
    handlers::repository::Repository,
    models::clearances::{ClearanceCreateDBRequest, ClearanceDBResponse},
    with_deadline,
};
use crate::types::ClearanceId;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use std::time::Duration;
use tracing::instrument;

/// Sort keys a clearance listing may request
pub const CLEARANCE_SORT_SAFELIST: &[&str] = &["id", "description", "-id", "-description"];

/// Filter for listing clearances
#[derive(Debug, Clone)]
pub struct ClearanceFilter {
    pub filters: Filters,
}

impl Default for ClearanceFilter {
    fn default() -> Self {
        Self {
            filters: Filters::new("description", CLEARANCE_SORT_SAFELIST),
        }
    }
}

pub struct Clearances<'c> {
    db: &'c mut PgConnection,
    timeout: Duration,
}

impl<'c> Clearances<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self {
            db,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve a description to its id, failing with [`DbError::Referential`] if no clearance has it.
    #[instrument(skip(self), err)]
    pub async fn id_for_description(&mut self, description: &str) -> Result<ClearanceId> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let id = sqlx::query_scalar::<_, ClearanceId>("SELECT id FROM clearances WHERE description = $1")
                .bind(description)
                .fetch_optional(&mut *self.db)
                .await?;

            id.ok_or_else(|| DbError::Referential {
                reference: "clearance",
                value: description.to_string(),
            })
        })
        .await
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Clearances<'c> {
    type CreateRequest = ClearanceCreateDBRequest;
    type UpdateRequest = ClearanceDBResponse;
    type Response = ClearanceDBResponse;
    type Id = ClearanceId;
    type Filter = ClearanceFilter;

    #[instrument(skip(self, request), fields(description = %request.description), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let clearance = sqlx::query_as::<_, ClearanceDBResponse>(
                "INSERT INTO clearances (description) VALUES ($1) RETURNING id, description",
            )
            .bind(&request.description)
            .fetch_one(&mut *self.db)
            .await?;

            Ok::<_, DbError>(clearance)
        })
        .await
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Self::Response> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let clearance = sqlx::query_as::<_, ClearanceDBResponse>("SELECT id, description FROM clearances WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;

            clearance.ok_or(DbError::NotFound)
        })
        .await
    }

    #[instrument(skip(self, filter), fields(page = filter.filters.page, sort = %filter.filters.sort), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Page<Self::Response>> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let mut query =
                QueryBuilder::<Postgres>::new("SELECT count(*) OVER() AS total_records, c.id, c.description FROM clearances c");
            filter.filters.push_order_by(&mut query, "c");

            let rows = query.build().fetch_all(&mut *self.db).await?;
            collect_page(rows, &filter.filters)
        })
        .await
    }

    #[instrument(skip(self, request), fields(clearance_id = request.id), err)]
    async fn update(&mut self, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let clearance = sqlx::query_as::<_, ClearanceDBResponse>(
                "UPDATE clearances SET description = $1 WHERE id = $2 RETURNING id, description",
            )
            .bind(&request.description)
            .bind(request.id)
            .fetch_optional(&mut *self.db)
            .await?;

            clearance.ok_or(DbError::NotFound)
        })
        .await
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<()> {
        if id < 1 {
            return Err(DbError::NotFound);
        }

        let timeout = self.timeout;
        with_deadline(timeout, async {
            let result = sqlx::query("DELETE FROM clearances WHERE id = $1")
                .bind(id)
                .execute(&mut *self.db)
                .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::NotFound);
            }
            Ok(())
        })
        .await
    }
}
