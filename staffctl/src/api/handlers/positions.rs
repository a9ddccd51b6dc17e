use crate::AppState;
use crate::api::models::pagination::PaginatedResponse;
use crate::api::models::positions::{ListPositionsQuery, PositionCreate, PositionResponse, PositionUpdate};
use crate::db::filters::validate_filters;
use crate::db::handlers::{PositionFilter, Positions, Repository};
use crate::db::models::positions::PositionCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::PositionId;
use crate::validation::{Validator, validate_title};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/positions",
    tag = "positions",
    summary = "List positions",
    params(ListPositionsQuery),
    responses(
        (status = 200, description = "One page of positions", body = PaginatedResponse<PositionResponse>),
        (status = 422, description = "Invalid paging or sort parameters"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_positions(
    State(state): State<AppState>,
    Query(query): Query<ListPositionsQuery>,
) -> Result<Json<PaginatedResponse<PositionResponse>>> {
    let filter = PositionFilter {
        filters: query.page.apply(PositionFilter::default().filters),
    };

    let mut v = Validator::new();
    validate_filters(&mut v, &filter.filters);
    Error::ensure_valid(v)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let page = Positions::new(&mut conn)
        .with_timeout(state.query_timeout())
        .list(&filter)
        .await?;

    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/positions",
    tag = "positions",
    summary = "Create position",
    request_body = PositionCreate,
    responses(
        (status = 201, description = "Position created", body = PositionResponse),
        (status = 409, description = "A position with this title already exists"),
        (status = 422, description = "Failed validation"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_position(
    State(state): State<AppState>,
    Json(create): Json<PositionCreate>,
) -> Result<(StatusCode, Json<PositionResponse>)> {
    let request = PositionCreateDBRequest::from(create);

    let mut v = Validator::new();
    validate_title(&mut v, &request.title);
    Error::ensure_valid(v)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let position = Positions::new(&mut conn)
        .with_timeout(state.query_timeout())
        .create(&request)
        .await?;

    Ok((StatusCode::CREATED, Json(position.into())))
}

#[utoipa::path(
    get,
    path = "/positions/{id}",
    tag = "positions",
    summary = "Get position",
    params(("id" = i64, Path, description = "Position ID")),
    responses(
        (status = 200, description = "Position", body = PositionResponse),
        (status = 404, description = "Position not found"),
    )
)]
#[tracing::instrument(skip_all, fields(position_id = id))]
pub async fn get_position(State(state): State<AppState>, Path(id): Path<PositionId>) -> Result<Json<PositionResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let position = Positions::new(&mut conn).with_timeout(state.query_timeout()).get_by_id(id).await?;
    Ok(Json(position.into()))
}

#[utoipa::path(
    patch,
    path = "/positions/{id}",
    tag = "positions",
    summary = "Update position",
    params(("id" = i64, Path, description = "Position ID")),
    request_body = PositionUpdate,
    responses(
        (status = 200, description = "Updated position", body = PositionResponse),
        (status = 404, description = "Position not found"),
        (status = 422, description = "Failed validation"),
    )
)]
#[tracing::instrument(skip_all, fields(position_id = id))]
pub async fn update_position(
    State(state): State<AppState>,
    Path(id): Path<PositionId>,
    Json(update): Json<PositionUpdate>,
) -> Result<Json<PositionResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Positions::new(&mut conn).with_timeout(state.query_timeout());

    let mut position = repo.get_by_id(id).await?;
    update.apply(&mut position);

    let mut v = Validator::new();
    validate_title(&mut v, &position.title);
    Error::ensure_valid(v)?;

    let position = repo.update(&position).await?;
    Ok(Json(position.into()))
}

#[utoipa::path(
    delete,
    path = "/positions/{id}",
    tag = "positions",
    summary = "Delete position",
    params(("id" = i64, Path, description = "Position ID")),
    responses(
        (status = 204, description = "Position deleted"),
        (status = 400, description = "Position is still held by resources"),
        (status = 404, description = "Position not found"),
    )
)]
#[tracing::instrument(skip_all, fields(position_id = id))]
pub async fn delete_position(State(state): State<AppState>, Path(id): Path<PositionId>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    Positions::new(&mut conn).with_timeout(state.query_timeout()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
