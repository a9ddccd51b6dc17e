use crate::AppState;
use crate::api::models::healthcheck::HealthcheckResponse;
use axum::{Json, extract::State};

#[utoipa::path(
    get,
    path = "/healthcheck",
    tag = "healthcheck",
    summary = "Service health",
    responses(
        (status = 200, description = "Service is available", body = HealthcheckResponse),
    )
)]
pub async fn healthcheck(State(state): State<AppState>) -> Json<HealthcheckResponse> {
    Json(HealthcheckResponse {
        status: "available".to_string(),
        environment: state.config.environment.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
