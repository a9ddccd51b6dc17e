use crate::AppState;
use crate::api::models::pagination::PaginatedResponse;
use crate::api::models::resources::{ListResourcesQuery, ResourceCreate, ResourceResponse, ResourceUpdate};
use crate::db::filters::validate_filters;
use crate::db::handlers::{Repository, Resources};
use crate::db::models::resources::{ResourceCreateDBRequest, ResourcePatchDBRequest};
use crate::errors::{Error, Result};
use crate::types::ResourceId;
use crate::validation::{Validator, validate_resource};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/resources",
    tag = "resources",
    summary = "List resources",
    description = "Tag filters match resources holding every listed tag. Omitted filters match everything.",
    params(ListResourcesQuery),
    responses(
        (status = 200, description = "One page of resources", body = PaginatedResponse<ResourceResponse>),
        (status = 422, description = "Invalid paging or sort parameters"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ListResourcesQuery>,
) -> Result<Json<PaginatedResponse<ResourceResponse>>> {
    let filter = query.to_filter();

    let mut v = Validator::new();
    validate_filters(&mut v, &filter.filters);
    Error::ensure_valid(v)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let page = Resources::new(&mut conn)
        .with_timeout(state.query_timeout())
        .list(&filter)
        .await?;

    Ok(Json(PaginatedResponse::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/resources",
    tag = "resources",
    summary = "Create resource",
    request_body = ResourceCreate,
    responses(
        (status = 201, description = "Resource created", body = ResourceResponse),
        (status = 422, description = "Failed validation, or the position or clearance does not exist"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_resource(
    State(state): State<AppState>,
    Json(create): Json<ResourceCreate>,
) -> Result<(StatusCode, Json<ResourceResponse>)> {
    let request = ResourceCreateDBRequest::from(create);

    let mut v = Validator::new();
    validate_resource(&mut v, &request);
    Error::ensure_valid(v)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let resource = Resources::new(&mut conn)
        .with_timeout(state.query_timeout())
        .create(&request)
        .await?;

    Ok((StatusCode::CREATED, Json(resource.into())))
}

#[utoipa::path(
    get,
    path = "/resources/{id}",
    tag = "resources",
    summary = "Get resource",
    params(("id" = i64, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Resource", body = ResourceResponse),
        (status = 404, description = "Resource not found"),
    )
)]
#[tracing::instrument(skip_all, fields(resource_id = id))]
pub async fn get_resource(State(state): State<AppState>, Path(id): Path<ResourceId>) -> Result<Json<ResourceResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let resource = Resources::new(&mut conn).with_timeout(state.query_timeout()).get_by_id(id).await?;
    Ok(Json(resource.into()))
}

#[utoipa::path(
    patch,
    path = "/resources/{id}",
    tag = "resources",
    summary = "Update resource",
    description = "Omitted fields keep their stored values. A provided tag list replaces the stored list.",
    params(("id" = i64, Path, description = "Resource ID")),
    request_body = ResourceUpdate,
    responses(
        (status = 200, description = "Updated resource", body = ResourceResponse),
        (status = 404, description = "Resource not found"),
        (status = 409, description = "The resource was changed or removed concurrently"),
        (status = 422, description = "Failed validation"),
    )
)]
#[tracing::instrument(skip_all, fields(resource_id = id))]
pub async fn update_resource(
    State(state): State<AppState>,
    Path(id): Path<ResourceId>,
    Json(update): Json<ResourceUpdate>,
) -> Result<Json<ResourceResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Resources::new(&mut conn).with_timeout(state.query_timeout());

    let mut resource = repo.get_by_id(id).await?;
    ResourcePatchDBRequest::from(update).apply(&mut resource);

    let mut v = Validator::new();
    validate_resource(&mut v, &resource);
    Error::ensure_valid(v)?;

    let resource = repo.update(&resource).await?;
    Ok(Json(resource.into()))
}

#[utoipa::path(
    delete,
    path = "/resources/{id}",
    tag = "resources",
    summary = "Delete resource",
    params(("id" = i64, Path, description = "Resource ID")),
    responses(
        (status = 204, description = "Resource deleted"),
        (status = 404, description = "Resource not found"),
    )
)]
#[tracing::instrument(skip_all, fields(resource_id = id))]
pub async fn delete_resource(State(state): State<AppState>, Path(id): Path<ResourceId>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    Resources::new(&mut conn).with_timeout(state.query_timeout()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::models::pagination::PaginatedResponse;
    use crate::api::models::positions::PositionResponse;
    use crate::api::models::resources::ResourceResponse;
    use crate::test_utils::create_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use sqlx::PgPool;

    async fn create_resource(server: &TestServer, first_name: &str, specialties: &[&str], clearance: &str) -> ResourceResponse {
        let response = server
            .post("/v1/resources")
            .json(&json!({
                "firstName": first_name,
                "lastName": "Tester",
                "position": "Consultant",
                "clearance": clearance,
                "specialties": specialties,
                "certifications": ["VCP"],
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_get_resource(pool: PgPool) {
        let server = create_test_app(pool).await;

        let created = create_resource(&server, "Ada", &["linux", "vmware"], "NV1").await;
        assert!(created.id > 0);
        assert!(created.active);
        assert_eq!(created.sex, "Unknown");

        let response = server.get(&format!("/v1/resources/{}", created.id)).await;
        response.assert_status_ok();
        assert_eq!(response.json::<ResourceResponse>(), created);

        server.get("/v1/resources/999999").await.assert_status_not_found();
        server.get("/v1/resources/0").await.assert_status_not_found();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_reports_every_failed_field(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server
            .post("/v1/resources")
            .json(&json!({
                "firstName": "",
                "lastName": "Tester",
                "position": "Principal Wizard",
                "clearance": "Top Secret",
                "specialties": ["linux", "linux"],
                "sex": "Other",
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(body["errors"]["firstName"], "must be provided");
        assert_eq!(body["errors"]["position"], "does not exist");
        assert_eq!(
            body["errors"]["clearance"],
            "must be one of ('None', 'Baseline', 'NV1', 'NV2', 'TSPV')"
        );
        assert_eq!(body["errors"]["specialties"], "must not contain duplicate values");
        assert_eq!(
            body["errors"]["sex"],
            "must be one of ('Unknown', 'Male', 'Female', 'Not Specified')"
        );
        assert!(body["errors"].get("lastName").is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_missing_reference_row_is_a_field_error(pool: PgPool) {
        let server = create_test_app(pool).await;

        let positions: PaginatedResponse<PositionResponse> =
            server.get("/v1/positions").add_query_param("page_size", 100).await.json();
        let architect = positions
            .data
            .iter()
            .find(|p| p.title == "Staff Consulting Architect")
            .expect("seeded position");
        server
            .delete(&format!("/v1/positions/{}", architect.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let response = server
            .post("/v1/resources")
            .json(&json!({
                "firstName": "Grace",
                "lastName": "Hopper",
                "position": "Staff Consulting Architect",
                "clearance": "None",
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(
            body["errors"]["position"],
            "position 'Staff Consulting Architect' does not exist"
        );
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_partial_update_keeps_other_fields(pool: PgPool) {
        let server = create_test_app(pool).await;
        let created = create_resource(&server, "Ada", &["linux", "vmware"], "NV1").await;

        let response = server
            .patch(&format!("/v1/resources/{}", created.id))
            .json(&json!({"active": false, "clearance": "NV2"}))
            .await;
        response.assert_status_ok();
        let updated: ResourceResponse = response.json();
        assert!(!updated.active);
        assert_eq!(updated.clearance, "NV2");
        assert_eq!(updated.first_name, "Ada");
        assert_eq!(updated.specialties, vec!["linux", "vmware"]);

        // Tag lists are replaced wholesale
        let updated: ResourceResponse = server
            .patch(&format!("/v1/resources/{}", created.id))
            .json(&json!({"specialties": ["nsx"]}))
            .await
            .json();
        assert_eq!(updated.specialties, vec!["nsx"]);

        // The merged entity is validated, and nothing is written when it fails
        let response = server
            .patch(&format!("/v1/resources/{}", created.id))
            .json(&json!({"lastName": "", "certifications": ["VCP", "VCP"]}))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["errors"]["lastName"], "must be provided");
        assert_eq!(body["errors"]["certifications"], "must not contain duplicate values");

        let stored: ResourceResponse = server.get(&format!("/v1/resources/{}", created.id)).await.json();
        assert_eq!(stored.last_name, "Tester");

        server
            .patch("/v1/resources/999999")
            .json(&json!({"active": true}))
            .await
            .assert_status_not_found();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_resources_with_filters(pool: PgPool) {
        let server = create_test_app(pool).await;
        let ada = create_resource(&server, "Ada", &["linux", "vmware"], "NV1").await;
        let bob = create_resource(&server, "Bob", &["linux"], "Baseline").await;
        let cy = create_resource(&server, "Cy", &["vmware", "nsx"], "NV1").await;
        server
            .patch(&format!("/v1/resources/{}", cy.id))
            .json(&json!({"active": false}))
            .await
            .assert_status_ok();

        let ids = |page: PaginatedResponse<ResourceResponse>| page.data.into_iter().map(|r| r.id).collect::<Vec<_>>();

        let all: PaginatedResponse<ResourceResponse> = server.get("/v1/resources").await.json();
        assert_eq!(all.metadata.total_records, 3);
        assert_eq!(ids(all), vec![ada.id, bob.id, cy.id]);

        let page = server.get("/v1/resources").add_query_param("specialties", "linux,vmware").await.json();
        assert_eq!(ids(page), vec![ada.id]);

        let page = server.get("/v1/resources").add_query_param("specialties", "vmware").await.json();
        assert_eq!(ids(page), vec![ada.id, cy.id]);

        let page = server.get("/v1/resources").add_query_param("active", "false").await.json();
        assert_eq!(ids(page), vec![cy.id]);

        let page = server.get("/v1/resources").add_query_param("clearance", "NV1").await.json();
        assert_eq!(ids(page), vec![ada.id, cy.id]);

        let page = server.get("/v1/resources").add_query_param("sort", "-first_name").await.json();
        assert_eq!(ids(page), vec![cy.id, bob.id, ada.id]);

        let empty: PaginatedResponse<ResourceResponse> =
            server.get("/v1/resources").add_query_param("specialties", "cobol").await.json();
        assert!(empty.data.is_empty());
        assert_eq!(empty.metadata.total_records, 0);
        assert_eq!(empty.metadata.last_page, 0);

        let response = server.get("/v1/resources").add_query_param("sort", "password").await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["errors"]["sort"], "invalid sort value");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_resource(pool: PgPool) {
        let server = create_test_app(pool).await;
        let created = create_resource(&server, "Ada", &[], "None").await;

        server
            .delete(&format!("/v1/resources/{}", created.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete(&format!("/v1/resources/{}", created.id))
            .await
            .assert_status_not_found();
        server
            .get(&format!("/v1/resources/{}", created.id))
            .await
            .assert_status_not_found();
    }
}
