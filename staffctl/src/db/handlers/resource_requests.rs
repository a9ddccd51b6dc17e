//! Database repository for resource requests.
//!
//! Updates are optimistic: the statement only matches the row if its `version` still
//! equals the version the caller read. A successful update bumps `version` and
//! `updated_at`; a stale caller gets [`DbError::Conflict`] and must re-fetch.

use crate::db::{
    DEFAULT_QUERY_TIMEOUT,
    errors::{DbError, Result},
    filters::{Filters, Page, collect_page},
    handlers::repository::Repository,
    models::resource_requests::{ResourceRequestCreateDBRequest, ResourceRequestDBResponse},
    with_deadline,
};
use crate::types::ResourceRequestId;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use std::time::Duration;
use tracing::instrument;

/// Sort keys a resource request listing may request
pub const RESOURCE_REQUEST_SORT_SAFELIST: &[&str] = &[
    "id",
    "customer",
    "start_date",
    "end_date",
    "hours_per_week",
    "created_at",
    "updated_at",
    "-id",
    "-customer",
    "-start_date",
    "-end_date",
    "-hours_per_week",
    "-created_at",
    "-updated_at",
];

const RESOURCE_REQUEST_COLUMNS: &str = "id, customer, start_date, end_date, hours_per_week, skills, opportunity_id, \
     engagement_id, created_at, updated_at, version, closed";

/// Filter for listing resource requests
///
/// `customer` is matched as a full-text query against the customer name, not as a
/// substring. A blank query matches everything.
#[derive(Debug, Clone)]
pub struct ResourceRequestFilter {
    pub customer: Option<String>,
    pub skills: Vec<String>,
    pub closed: Option<bool>,
    pub filters: Filters,
}

impl Default for ResourceRequestFilter {
    fn default() -> Self {
        Self {
            customer: None,
            skills: Vec::new(),
            closed: None,
            filters: Filters::new("id", RESOURCE_REQUEST_SORT_SAFELIST),
        }
    }
}

impl ResourceRequestFilter {
    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = Some(closed);
        self
    }
}

pub struct ResourceRequests<'c> {
    db: &'c mut PgConnection,
    timeout: Duration,
}

impl<'c> ResourceRequests<'c> {
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
}

#[async_trait::async_trait]
impl<'c> Repository for ResourceRequests<'c> {
    type CreateRequest = ResourceRequestCreateDBRequest;
    type UpdateRequest = ResourceRequestDBResponse;
    type Response = ResourceRequestDBResponse;
    type Id = ResourceRequestId;
    type Filter = ResourceRequestFilter;

    #[instrument(skip(self, request), fields(customer = %request.customer), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let created = sqlx::query_as::<_, ResourceRequestDBResponse>(&format!(
                r#"
                INSERT INTO resource_requests (customer, start_date, end_date, hours_per_week, skills, opportunity_id, engagement_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {RESOURCE_REQUEST_COLUMNS}
                "#
            ))
            .bind(&request.customer)
            .bind(request.start_date)
            .bind(request.end_date)
            .bind(request.hours_per_week)
            .bind(&request.skills)
            .bind(&request.opportunity_id)
            .bind(&request.engagement_id)
            .fetch_one(&mut *self.db)
            .await?;

            Ok::<_, DbError>(created)
        })
        .await
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Self::Response> {
        if id < 1 {
            return Err(DbError::NotFound);
        }

        let timeout = self.timeout;
        with_deadline(timeout, async {
            let request = sqlx::query_as::<_, ResourceRequestDBResponse>(&format!(
                "SELECT {RESOURCE_REQUEST_COLUMNS} FROM resource_requests WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

            request.ok_or(DbError::NotFound)
        })
        .await
    }

    #[instrument(
        skip(self, filter),
        fields(
            customer = ?filter.customer,
            skills = filter.skills.len(),
            closed = ?filter.closed,
            page = filter.filters.page,
            sort = %filter.filters.sort
        ),
        err
    )]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Page<Self::Response>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT count(*) OVER() AS total_records, {RESOURCE_REQUEST_COLUMNS} FROM resource_requests rr WHERE TRUE"
        ));

        if let Some(customer) = filter.customer.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            query.push(" AND to_tsvector('simple', rr.customer) @@ plainto_tsquery('simple', ");
            query.push_bind(customer.to_string());
            query.push(")");
        }
        if !filter.skills.is_empty() {
            query.push(" AND rr.skills @> ");
            query.push_bind(filter.skills.clone());
        }
        if let Some(closed) = filter.closed {
            query.push(" AND rr.closed = ");
            query.push_bind(closed);
        }
        filter.filters.push_order_by(&mut query, "rr");

        let timeout = self.timeout;
        with_deadline(timeout, async {
            let rows = query.build().fetch_all(&mut *self.db).await?;
            collect_page(rows, &filter.filters)
        })
        .await
    }

    /// Replace the request if its stored version still matches `request.version`.
    #[instrument(skip(self, request), fields(request_id = request.id, version = request.version), err)]
    async fn update(&mut self, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let timeout = self.timeout;
        with_deadline(timeout, async {
            let updated = sqlx::query_as::<_, ResourceRequestDBResponse>(&format!(
                r#"
                UPDATE resource_requests
                SET customer = $1, start_date = $2, end_date = $3, hours_per_week = $4, skills = $5,
                    opportunity_id = $6, engagement_id = $7, closed = $8,
                    updated_at = NOW(), version = version + 1
                WHERE id = $9 AND version = $10
                RETURNING {RESOURCE_REQUEST_COLUMNS}
                "#
            ))
            .bind(&request.customer)
            .bind(request.start_date)
            .bind(request.end_date)
            .bind(request.hours_per_week)
            .bind(&request.skills)
            .bind(&request.opportunity_id)
            .bind(&request.engagement_id)
            .bind(request.closed)
            .bind(request.id)
            .bind(request.version)
            .fetch_optional(&mut *self.db)
            .await?;

            updated.ok_or(DbError::Conflict)
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
            let result = sqlx::query("DELETE FROM resource_requests WHERE id = $1")
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
