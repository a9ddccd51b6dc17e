//! API request/response models for clearance levels.

use super::pagination::PageParams;
use crate::db::models::FieldUpdate;
use crate::db::models::clearances::{ClearanceCreateDBRequest, ClearanceDBResponse};
use crate::types::ClearanceId;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for listing clearances
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListClearancesQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub page: PageParams,
}

/// Request body for creating a clearance level.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClearanceCreate {
    #[schema(example = "PV")]
    pub description: String,
}

impl From<ClearanceCreate> for ClearanceCreateDBRequest {
    fn from(create: ClearanceCreate) -> Self {
        Self {
            description: create.description,
        }
    }
}

/// Request body for updating a clearance level. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ClearanceUpdate {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: FieldUpdate<String>,
}

impl ClearanceUpdate {
    pub fn apply(self, clearance: &mut ClearanceDBResponse) {
        self.description.apply_to(&mut clearance.description);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClearanceResponse {
    pub id: ClearanceId,
    pub description: String,
}

impl From<ClearanceDBResponse> for ClearanceResponse {
    fn from(db: ClearanceDBResponse) -> Self {
        Self {
            id: db.id,
            description: db.description,
        }
    }
}
