//! API request/response models for positions.

use super::pagination::PageParams;
use crate::db::models::FieldUpdate;
use crate::db::models::positions::{PositionCreateDBRequest, PositionDBResponse};
use crate::types::PositionId;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for listing positions
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListPositionsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub page: PageParams,
}

/// Request body for creating a position.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PositionCreate {
    #[schema(example = "Principal Consultant")]
    pub title: String,
}

impl From<PositionCreate> for PositionCreateDBRequest {
    fn from(create: PositionCreate) -> Self {
        Self { title: create.title }
    }
}

/// Request body for updating a position. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PositionUpdate {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: FieldUpdate<String>,
}

impl PositionUpdate {
    pub fn apply(self, position: &mut PositionDBResponse) {
        self.title.apply_to(&mut position.title);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PositionResponse {
    pub id: PositionId,
    pub title: String,
}

impl From<PositionDBResponse> for PositionResponse {
    fn from(db: PositionDBResponse) -> Self {
        Self { id: db.id, title: db.title }
    }
}
