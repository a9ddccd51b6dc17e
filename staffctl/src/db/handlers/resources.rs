//! Database repository for resources.
//!
//! Resources reference their position and clearance by title / description. Both are
//! resolved to ids by [`Positions::id_for_title`] and [`Clearances::id_for_description`]
//! before any write, so a dangling reference fails uniformly with
//! [`DbError::Referential`] rather than reaching the insert.

use crate::db::{
    DEFAULT_QUERY_TIMEOUT,
    errors::{DbError, Result},
    filters::{Filters, Page, collect_page},
    handlers::{Clearances, Positions, repository::Repository},
    models::resources::{ResourceCreateDBRequest, ResourceDBResponse},
    with_deadline,
};
use crate::types::{ClearanceId, PositionId, ResourceId};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use std::time::Duration;
use tracing::instrument;

/// Sort keys a resource listing may request
pub const RESOURCE_SORT_SAFELIST: &[&str] = &["id", "first_name", "last_name", "-id", "-first_name", "-last_name"];

const SELECT_RESOURCE_COLUMNS: &str = "r.id, r.first_name, r.last_name, p.title AS position, c.description AS clearance, \
     r.specialties, r.certifications, r.active, r.sex \
     FROM resources r \
     JOIN positions p ON p.id = r.position_id \
     JOIN clearances c ON c.id = r.clearance_id";

/// Filter for listing resources
///
/// Tag filters match resources holding every requested tag; an empty list matches all.
/// `active` matches exactly when present; `clearance` does too unless it is blank.
#[derive(Debug, Clone)]
pub struct ResourceFilter {
    pub specialties: Vec<String>,
    pub certifications: Vec<String>,
    pub active: Option<bool>,
    pub clearance: Option<String>,
    pub filters: Filters,
}

impl Default for ResourceFilter {
    fn default() -> Self {
        Self {
            specialties: Vec::new(),
            certifications: Vec::new(),
            active: None,
            clearance: None,
            filters: Filters::new("id", RESOURCE_SORT_SAFELIST),
        }
    }
}

impl ResourceFilter {
    pub fn with_specialties(mut self, specialties: Vec<String>) -> Self {
        self.specialties = specialties;
        self
    }

    pub fn with_certifications(mut self, certifications: Vec<String>) -> Self {
        self.certifications = certifications;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_clearance(mut self, clearance: impl Into<String>) -> Self {
        self.clearance = Some(clearance.into());
        self
    }
}

pub struct Resources<'c> {
    db: &'c mut PgConnection,
    timeout: Duration,
}

impl<'c> Resources<'c> {
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

    async fn resolve_references(&mut self, position: &str, clearance: &str) -> Result<(PositionId, ClearanceId)> {
        let position_id = Positions::new(&mut *self.db).with_timeout(self.timeout).id_for_title(position).await?;
        let clearance_id = Clearances::new(&mut *self.db)
            .with_timeout(self.timeout)
            .id_for_description(clearance)
            .await?;
        Ok((position_id, clearance_id))
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Resources<'c> {
    type CreateRequest = ResourceCreateDBRequest;
    type UpdateRequest = ResourceDBResponse;
    type Response = ResourceDBResponse;
    type Id = ResourceId;
    type Filter = ResourceFilter;

    #[instrument(skip(self, request), fields(position = %request.position, clearance = %request.clearance), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let (position_id, clearance_id) = self.resolve_references(&request.position, &request.clearance).await?;

        let timeout = self.timeout;
        let id = with_deadline(timeout, async {
            let id = sqlx::query_scalar::<_, ResourceId>(
                r#"
                INSERT INTO resources (first_name, last_name, position_id, clearance_id, specialties, certifications, active, sex)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id
                "#,
            )
            .bind(&request.first_name)
            .bind(&request.last_name)
            .bind(position_id)
            .bind(clearance_id)
            .bind(&request.specialties)
            .bind(&request.certifications)
            .bind(request.active)
            .bind(&request.sex)
            .fetch_one(&mut *self.db)
            .await?;

            Ok::<_, DbError>(id)
        })
        .await?;

        Ok(ResourceDBResponse {
            id,
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            position: request.position.clone(),
            clearance: request.clearance.clone(),
            specialties: request.specialties.clone(),
            certifications: request.certifications.clone(),
            active: request.active,
            sex: request.sex.clone(),
        })
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Self::Response> {
        if id < 1 {
            return Err(DbError::NotFound);
        }

        let timeout = self.timeout;
        with_deadline(timeout, async {
            let resource = sqlx::query_as::<_, ResourceDBResponse>(&format!("SELECT {SELECT_RESOURCE_COLUMNS} WHERE r.id = $1"))
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;

            resource.ok_or(DbError::NotFound)
        })
        .await
    }

    #[instrument(
        skip(self, filter),
        fields(
            specialties = filter.specialties.len(),
            certifications = filter.certifications.len(),
            active = ?filter.active,
            clearance = ?filter.clearance,
            page = filter.filters.page,
            sort = %filter.filters.sort
        ),
        err
    )]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Page<Self::Response>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT count(*) OVER() AS total_records, {SELECT_RESOURCE_COLUMNS} WHERE TRUE"
        ));

        if !filter.specialties.is_empty() {
            query.push(" AND r.specialties @> ");
            query.push_bind(filter.specialties.clone());
        }
        if !filter.certifications.is_empty() {
            query.push(" AND r.certifications @> ");
            query.push_bind(filter.certifications.clone());
        }
        if let Some(active) = filter.active {
            query.push(" AND r.active = ");
            query.push_bind(active);
        }
        if let Some(clearance) = filter.clearance.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            query.push(" AND c.description = ");
            query.push_bind(clearance.to_string());
        }
        filter.filters.push_order_by(&mut query, "r");

        let timeout = self.timeout;
        with_deadline(timeout, async {
            let rows = query.build().fetch_all(&mut *self.db).await?;
            collect_page(rows, &filter.filters)
        })
        .await
    }

    /// Replace every column of the resource. Zero rows matched means the resource was
    /// removed since the caller read it, reported as [`DbError::Conflict`].
    #[instrument(skip(self, request), fields(resource_id = request.id), err)]
    async fn update(&mut self, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let (position_id, clearance_id) = self.resolve_references(&request.position, &request.clearance).await?;

        let timeout = self.timeout;
        with_deadline(timeout, async {
            let result = sqlx::query(
                r#"
                UPDATE resources
                SET first_name = $1, last_name = $2, position_id = $3, clearance_id = $4,
                    specialties = $5, certifications = $6, active = $7, sex = $8
                WHERE id = $9
                "#,
            )
            .bind(&request.first_name)
            .bind(&request.last_name)
            .bind(position_id)
            .bind(clearance_id)
            .bind(&request.specialties)
            .bind(&request.certifications)
            .bind(request.active)
            .bind(&request.sex)
            .bind(request.id)
            .execute(&mut *self.db)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::Conflict);
            }
            Ok(request.clone())
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
            let result = sqlx::query("DELETE FROM resources WHERE id = $1")
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
