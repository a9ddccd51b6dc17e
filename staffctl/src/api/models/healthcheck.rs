//! API response model for the healthcheck.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthcheckResponse {
    /// Always `available` when the service answers
    #[schema(example = "available")]
    pub status: String,
    /// Deployment environment from configuration
    #[schema(example = "production")]
    pub environment: String,
    /// Service version
    #[schema(example = "0.3.0")]
    pub version: String,
}
