//! OpenAPI documentation for the `/v1/*` management API, served at `/v1/docs`.

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::healthcheck::healthcheck,
        api::handlers::positions::list_positions,
        api::handlers::positions::create_position,
        api::handlers::positions::get_position,
        api::handlers::positions::update_position,
        api::handlers::positions::delete_position,
        api::handlers::clearances::list_clearances,
        api::handlers::clearances::create_clearance,
        api::handlers::clearances::get_clearance,
        api::handlers::clearances::update_clearance,
        api::handlers::clearances::delete_clearance,
        api::handlers::resources::list_resources,
        api::handlers::resources::create_resource,
        api::handlers::resources::get_resource,
        api::handlers::resources::update_resource,
        api::handlers::resources::delete_resource,
        api::handlers::resource_requests::list_resource_requests,
        api::handlers::resource_requests::create_resource_request,
        api::handlers::resource_requests::get_resource_request,
        api::handlers::resource_requests::update_resource_request,
        api::handlers::resource_requests::delete_resource_request,
    ),
    components(
        schemas(
            api::models::healthcheck::HealthcheckResponse,
            api::models::pagination::PageMetadata,
            api::models::positions::PositionCreate,
            api::models::positions::PositionUpdate,
            api::models::positions::PositionResponse,
            api::models::clearances::ClearanceCreate,
            api::models::clearances::ClearanceUpdate,
            api::models::clearances::ClearanceResponse,
            api::models::resources::ResourceCreate,
            api::models::resources::ResourceUpdate,
            api::models::resources::ResourceResponse,
            api::models::resource_requests::ResourceRequestCreate,
            api::models::resource_requests::ResourceRequestUpdate,
            api::models::resource_requests::ResourceRequestResponse,
        )
    ),
    tags(
        (name = "healthcheck", description = "Service liveness and build information."),
        (name = "positions", description = "Job titles a resource can hold."),
        (name = "clearances", description = "Security clearance levels a resource can hold."),
        (name = "resources", description = "People available for staffing, with their specialties and certifications."),
        (name = "resource-requests", description = "Customer demand for staff over a date window.

Updates are guarded by a `version` counter. Send the version you last read with a PATCH; if the record has moved on the update fails with 409 Conflict and you should re-read and retry."),
    ),
    info(
        title = "Staffing Control API",
        version = "1.0.0",
        description = "Record keeping for consulting resources and the customer requests they are staffed against.

## Errors

Failed field checks return 422 with one message per field:

```json
{
  \"errors\": {
    \"firstName\": \"must be provided\"
  }
}
```

Every other error returns a `message`.

## Paging

List endpoints take `page`, `page_size` (at most 100) and `sort`. Prefix a sort key with `-` to sort descending.",
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/positions",
            "/positions/{id}",
            "/clearances",
            "/clearances/{id}",
            "/resources",
            "/resources/{id}",
            "/resource-requests",
            "/resource-requests/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing from OpenAPI doc");
        }
    }
}
