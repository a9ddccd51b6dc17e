//! Database repository for positions.

use crate::db::{
    DEFAULT_QUERY_TIMEOUT,
    errors::{DbError, Result},
    filters::{Filters, Page, collect_page},
    handlers::repository::Repository,
    models::positions::{PositionCreateDBRequest, PositionDBResponse},
    with_deadline,
};
use crate::types::PositionId;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use std::time::Duration;
use tracing::instrument;

/// Sort keys a position listing may request
pub const POSITION_SORT_SAFELIST: &[&str] = &["id", "title", "-id", "-title"];

/// Filter for listing positions
#[derive(Debug, Clone)]
pub struct PositionFilter {
    pub filters: Filters,
}

impl Default for PositionFilter {
    fn default() -> Self {
        Self {
            filters: Filters::new("title", POSITION_SORT_SAFELIST),
        }
    }
}

pub struct Positions<'c> {
    db: &'c mut PgConnection,
    timeout: Duration,
}

impl<'c> Positions<'c> {
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

    /// Resolve a title to its id, failing with [`DbError::Referential`] if no position has it.
    #[instrument(skip(self), err)]
    pub async fn id_for_title(&mut self, title: &str) -> Result<PositionId> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let id = sqlx::query_scalar::<_, PositionId>("SELECT id FROM positions WHERE title = $1")
                .bind(title)
                .fetch_optional(&mut *self.db)
                .await?;

            id.ok_or_else(|| DbError::Referential {
                reference: "position",
                value: title.to_string(),
            })
        })
        .await
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Positions<'c> {
    type CreateRequest = PositionCreateDBRequest;
    type UpdateRequest = PositionDBResponse;
    type Response = PositionDBResponse;
    type Id = PositionId;
    type Filter = PositionFilter;

    #[instrument(skip(self, request), fields(title = %request.title), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let position =
                sqlx::query_as::<_, PositionDBResponse>("INSERT INTO positions (title) VALUES ($1) RETURNING id, title")
                    .bind(&request.title)
                    .fetch_one(&mut *self.db)
                    .await?;

            Ok::<_, DbError>(position)
        })
        .await
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Self::Response> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let position = sqlx::query_as::<_, PositionDBResponse>("SELECT id, title FROM positions WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;

            position.ok_or(DbError::NotFound)
        })
        .await
    }

    #[instrument(skip(self, filter), fields(page = filter.filters.page, sort = %filter.filters.sort), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Page<Self::Response>> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let mut query = QueryBuilder::<Postgres>::new("SELECT count(*) OVER() AS total_records, p.id, p.title FROM positions p");
            filter.filters.push_order_by(&mut query, "p");

            let rows = query.build().fetch_all(&mut *self.db).await?;
            collect_page(rows, &filter.filters)
        })
        .await
    }

    #[instrument(skip(self, request), fields(position_id = request.id), err)]
    async fn update(&mut self, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let position =
                sqlx::query_as::<_, PositionDBResponse>("UPDATE positions SET title = $1 WHERE id = $2 RETURNING id, title")
                    .bind(&request.title)
                    .bind(request.id)
                    .fetch_optional(&mut *self.db)
                    .await?;

            position.ok_or(DbError::NotFound)
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
            let result = sqlx::query("DELETE FROM positions WHERE id = $1")
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
