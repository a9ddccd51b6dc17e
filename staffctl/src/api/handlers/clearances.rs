use crate::AppState;
use crate::api::models::clearances::{ClearanceCreate, ClearanceResponse, ClearanceUpdate, ListClearancesQuery};
use crate::api::models::pagination::PaginatedResponse;
use crate::db::filters::validate_filters;
use crate::db::handlers::{ClearanceFilter, Clearances, Repository};
use crate::db::models::clearances::ClearanceCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::ClearanceId;
use crate::validation::{Validator, validate_description};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/clearances",
    tag = "clearances",
    summary = "List clearance levels",
    params(ListClearancesQuery),
    responses(
        (status = 200, description = "One page of clearance levels", body = PaginatedResponse<ClearanceResponse>),
        (status = 422, description = "Invalid paging or sort parameters"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_clearances(
    State(state): State<AppState>,
    Query(query): Query<ListClearancesQuery>,
) -> Result<Json<PaginatedResponse<ClearanceResponse>>> {
    let filter = ClearanceFilter {
        filters: query.page.apply(ClearanceFilter::default().filters),
    };

    let mut v = Validator::new();
    validate_filters(&mut v, &filter.filters);
    Error::ensure_valid(v)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let page = Clearances::new(&mut conn)
        .with_timeout(state.query_timeout())
        .list(&filter)
        .await?;

    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/clearances",
    tag = "clearances",
    summary = "Create clearance level",
    request_body = ClearanceCreate,
    responses(
        (status = 201, description = "Clearance level created", body = ClearanceResponse),
        (status = 409, description = "A clearance with this description already exists"),
        (status = 422, description = "Failed validation"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_clearance(
    State(state): State<AppState>,
    Json(create): Json<ClearanceCreate>,
) -> Result<(StatusCode, Json<ClearanceResponse>)> {
    let request = ClearanceCreateDBRequest::from(create);

    let mut v = Validator::new();
    validate_description(&mut v, &request.description);
    Error::ensure_valid(v)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let clearance = Clearances::new(&mut conn)
        .with_timeout(state.query_timeout())
        .create(&request)
        .await?;

    Ok((StatusCode::CREATED, Json(clearance.into())))
}

#[utoipa::path(
    get,
    path = "/clearances/{id}",
    tag = "clearances",
    summary = "Get clearance level",
    params(("id" = i64, Path, description = "Clearance ID")),
    responses(
        (status = 200, description = "Clearance level", body = ClearanceResponse),
        (status = 404, description = "Clearance not found"),
    )
)]
#[tracing::instrument(skip_all, fields(clearance_id = id))]
pub async fn get_clearance(State(state): State<AppState>, Path(id): Path<ClearanceId>) -> Result<Json<ClearanceResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let clearance = Clearances::new(&mut conn).with_timeout(state.query_timeout()).get_by_id(id).await?;
    Ok(Json(clearance.into()))
}

#[utoipa::path(
    patch,
    path = "/clearances/{id}",
    tag = "clearances",
    summary = "Update clearance level",
    params(("id" = i64, Path, description = "Clearance ID")),
    request_body = ClearanceUpdate,
    responses(
        (status = 200, description = "Updated clearance level", body = ClearanceResponse),
        (status = 404, description = "Clearance not found"),
        (status = 422, description = "Failed validation"),
    )
)]
#[tracing::instrument(skip_all, fields(clearance_id = id))]
pub async fn update_clearance(
    State(state): State<AppState>,
    Path(id): Path<ClearanceId>,
    Json(update): Json<ClearanceUpdate>,
) -> Result<Json<ClearanceResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Clearances::new(&mut conn).with_timeout(state.query_timeout());

    let mut clearance = repo.get_by_id(id).await?;
    update.apply(&mut clearance);

    let mut v = Validator::new();
    validate_description(&mut v, &clearance.description);
    Error::ensure_valid(v)?;

    let clearance = repo.update(&clearance).await?;
    Ok(Json(clearance.into()))
}

#[utoipa::path(
    delete,
    path = "/clearances/{id}",
    tag = "clearances",
    summary = "Delete clearance level",
    params(("id" = i64, Path, description = "Clearance ID")),
    responses(
        (status = 204, description = "Clearance level deleted"),
        (status = 400, description = "Clearance is still held by resources"),
        (status = 404, description = "Clearance not found"),
    )
)]
#[tracing::instrument(skip_all, fields(clearance_id = id))]
pub async fn delete_clearance(State(state): State<AppState>, Path(id): Path<ClearanceId>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    Clearances::new(&mut conn).with_timeout(state.query_timeout()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
