use crate::AppState;
use crate::api::models::pagination::PaginatedResponse;
use crate::api::models::resource_requests::{
    ListResourceRequestsQuery, ResourceRequestCreate, ResourceRequestResponse, ResourceRequestUpdate,
};
use crate::db::errors::DbError;
use crate::db::filters::validate_filters;
use crate::db::handlers::{Repository, ResourceRequests};
use crate::db::models::resource_requests::ResourceRequestCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::ResourceRequestId;
use crate::validation::{Validator, validate_resource_request};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/resource-requests",
    tag = "resource-requests",
    summary = "List resource requests",
    description = "`customer` is a full-text match on the customer name. `skills` matches requests requiring every listed skill.",
    params(ListResourceRequestsQuery),
    responses(
        (status = 200, description = "One page of resource requests", body = PaginatedResponse<ResourceRequestResponse>),
        (status = 422, description = "Invalid paging or sort parameters"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_resource_requests(
    State(state): State<AppState>,
    Query(query): Query<ListResourceRequestsQuery>,
) -> Result<Json<PaginatedResponse<ResourceRequestResponse>>> {
    let filter = query.to_filter();

    let mut v = Validator::new();
    validate_filters(&mut v, &filter.filters);
    Error::ensure_valid(v)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let page = ResourceRequests::new(&mut conn)
        .with_timeout(state.query_timeout())
        .list(&filter)
        .await?;

    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/resource-requests",
    tag = "resource-requests",
    summary = "Create resource request",
    request_body = ResourceRequestCreate,
    responses(
        (status = 201, description = "Resource request created", body = ResourceRequestResponse),
        (status = 422, description = "Failed validation"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_resource_request(
    State(state): State<AppState>,
    Json(create): Json<ResourceRequestCreate>,
) -> Result<(StatusCode, Json<ResourceRequestResponse>)> {
    let request = ResourceRequestCreateDBRequest::from(create);

    let mut v = Validator::new();
    validate_resource_request(&mut v, &request);
    Error::ensure_valid(v)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let created = ResourceRequests::new(&mut conn)
        .with_timeout(state.query_timeout())
        .create(&request)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/resource-requests/{id}",
    tag = "resource-requests",
    summary = "Get resource request",
    params(("id" = i64, Path, description = "Resource request ID")),
    responses(
        (status = 200, description = "Resource request", body = ResourceRequestResponse),
        (status = 404, description = "Resource request not found"),
    )
)]
#[tracing::instrument(skip_all, fields(resource_request_id = id))]
pub async fn get_resource_request(
    State(state): State<AppState>,
    Path(id): Path<ResourceRequestId>,
) -> Result<Json<ResourceRequestResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let request = ResourceRequests::new(&mut conn)
        .with_timeout(state.query_timeout())
        .get_by_id(id)
        .await?;
    Ok(Json(request.into()))
}

#[utoipa::path(
    patch,
    path = "/resource-requests/{id}",
    tag = "resource-requests",
    summary = "Update resource request",
    description = "Omitted fields keep their stored values. Send the `version` last read to guard against lost updates.",
    params(("id" = i64, Path, description = "Resource request ID")),
    request_body = ResourceRequestUpdate,
    responses(
        (status = 200, description = "Updated resource request", body = ResourceRequestResponse),
        (status = 404, description = "Resource request not found"),
        (status = 409, description = "The resource request was modified since it was read"),
        (status = 422, description = "Failed validation"),
    )
)]
#[tracing::instrument(skip_all, fields(resource_request_id = id))]
pub async fn update_resource_request(
    State(state): State<AppState>,
    Path(id): Path<ResourceRequestId>,
    Json(update): Json<ResourceRequestUpdate>,
) -> Result<Json<ResourceRequestResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = ResourceRequests::new(&mut conn).with_timeout(state.query_timeout());

    let mut request = repo.get_by_id(id).await?;
    let (expected_version, patch) = update.into_parts();
    if expected_version.is_some_and(|version| version != request.version) {
        return Err(Error::Database(DbError::Conflict));
    }
    patch.apply(&mut request);

    let mut v = Validator::new();
    validate_resource_request(&mut v, &request);
    Error::ensure_valid(v)?;

    let request = repo.update(&request).await?;
    Ok(Json(request.into()))
}

#[utoipa::path(
    delete,
    path = "/resource-requests/{id}",
    tag = "resource-requests",
    summary = "Delete resource request",
    params(("id" = i64, Path, description = "Resource request ID")),
    responses(
        (status = 204, description = "Resource request deleted"),
        (status = 404, description = "Resource request not found"),
    )
)]
#[tracing::instrument(skip_all, fields(resource_request_id = id))]
pub async fn delete_resource_request(
    State(state): State<AppState>,
    Path(id): Path<ResourceRequestId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    ResourceRequests::new(&mut conn)
        .with_timeout(state.query_timeout())
        .delete(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::models::pagination::PaginatedResponse;
    use crate::api::models::resource_requests::ResourceRequestResponse;
    use crate::test_utils::create_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use sqlx::PgPool;

    async fn create_request(server: &TestServer, customer: &str, skills: &[&str]) -> ResourceRequestResponse {
        let response = server
            .post("/v1/resource-requests")
            .json(&json!({
                "customer": customer,
                "startDate": "2024-07-01",
                "endDate": "2024-12-20",
                "hoursPerWeek": 40,
                "skills": skills,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_sets_server_fields(pool: PgPool) {
        let server = create_test_app(pool).await;

        let created = create_request(&server, "Acme Health", &["vsphere", "nsx"]).await;
        assert_eq!(created.version, 0);
        assert!(!created.closed);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.opportunity_id, None);

        let fetched: ResourceRequestResponse = server
            .get(&format!("/v1/resource-requests/{}", created.id))
            .await
            .json();
        assert_eq!(fetched, created);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_validation(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server
            .post("/v1/resource-requests")
            .json(&json!({
                "customer": "",
                "startDate": "2024-07-01",
                "endDate": "2024-06-01",
                "hoursPerWeek": 200,
                "skills": [],
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(body["errors"]["customer"], "must be provided");
        assert_eq!(body["errors"]["endDate"], "must not be before startDate");
        assert_eq!(body["errors"]["hoursPerWeek"], "must not be more than 168");
        assert_eq!(body["errors"]["skills"], "at least one must be provided");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_advances_version(pool: PgPool) {
        let server = create_test_app(pool).await;
        let created = create_request(&server, "Acme Health", &["nsx"]).await;
        let path = format!("/v1/resource-requests/{}", created.id);

        let response = server
            .patch(&path)
            .json(&json!({"closed": true, "engagementId": "ENG-7", "version": 0}))
            .await;
        response.assert_status_ok();
        let updated: ResourceRequestResponse = response.json();
        assert_eq!(updated.version, 1);
        assert!(updated.closed);
        assert_eq!(updated.engagement_id.as_deref(), Some("ENG-7"));
        assert_eq!(updated.customer, "Acme Health");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);

        // Explicit null clears an optional identifier
        let updated: ResourceRequestResponse = server
            .patch(&path)
            .json(&json!({"engagementId": null}))
            .await
            .json();
        assert_eq!(updated.engagement_id, None);
        assert_eq!(updated.version, 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_stale_version_conflicts(pool: PgPool) {
        let server = create_test_app(pool).await;
        let created = create_request(&server, "Acme Health", &["nsx"]).await;
        let path = format!("/v1/resource-requests/{}", created.id);

        server
            .patch(&path)
            .json(&json!({"hoursPerWeek": 20, "version": 0}))
            .await
            .assert_status_ok();

        let response = server
            .patch(&path)
            .json(&json!({"hoursPerWeek": 30, "version": 0}))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(
            response.json::<Value>()["message"],
            "Unable to update the record due to an edit conflict, please try again"
        );

        let stored: ResourceRequestResponse = server.get(&path).await.json();
        assert_eq!(stored.hours_per_week, 20);
        assert_eq!(stored.version, 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_validates_merged_request(pool: PgPool) {
        let server = create_test_app(pool).await;
        let created = create_request(&server, "Acme Health", &["nsx"]).await;
        let path = format!("/v1/resource-requests/{}", created.id);

        // Moving only the end date before the stored start date fails
        let response = server.patch(&path).json(&json!({"endDate": "2024-01-01"})).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["errors"]["endDate"], "must not be before startDate");

        let stored: ResourceRequestResponse = server.get(&path).await.json();
        assert_eq!(stored.version, 0);

        server
            .patch("/v1/resource-requests/424242")
            .json(&json!({"closed": true}))
            .await
            .assert_status_not_found();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_resource_requests(pool: PgPool) {
        let server = create_test_app(pool).await;
        let acme = create_request(&server, "Acme Health", &["nsx", "vsan"]).await;
        let globex = create_request(&server, "Globex Health Services", &["nsx"]).await;
        let initech = create_request(&server, "Initech", &["vsan"]).await;
        server
            .patch(&format!("/v1/resource-requests/{}", initech.id))
            .json(&json!({"closed": true}))
            .await
            .assert_status_ok();

        let ids = |page: PaginatedResponse<ResourceRequestResponse>| {
            page.data.into_iter().map(|r| r.id).collect::<Vec<_>>()
        };

        let page = server.get("/v1/resource-requests").add_query_param("customer", "health").await.json();
        assert_eq!(ids(page), vec![acme.id, globex.id]);

        let page = server.get("/v1/resource-requests").add_query_param("skills", "nsx,vsan").await.json();
        assert_eq!(ids(page), vec![acme.id]);

        let page = server.get("/v1/resource-requests").add_query_param("closed", "true").await.json();
        assert_eq!(ids(page), vec![initech.id]);

        let page = server
            .get("/v1/resource-requests")
            .add_query_param("customer", "")
            .add_query_param("page_size", 2)
            .await
            .json::<PaginatedResponse<ResourceRequestResponse>>();
        assert_eq!(page.metadata.total_records, 3);
        assert_eq!(page.metadata.last_page, 2);
        assert_eq!(ids(page), vec![acme.id, globex.id]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_resource_request(pool: PgPool) {
        let server = create_test_app(pool).await;
        let created = create_request(&server, "Acme Health", &["nsx"]).await;
        let path = format!("/v1/resource-requests/{}", created.id);

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        server.delete(&path).await.assert_status_not_found();
        server.get(&path).await.assert_status_not_found();
    }
}
