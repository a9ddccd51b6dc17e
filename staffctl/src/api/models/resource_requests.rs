//! API request/response models for resource requests.

use super::pagination::{PageParams, split_tags};
use crate::db::handlers::ResourceRequestFilter;
use crate::db::models::FieldUpdate;
use crate::db::models::resource_requests::{
    ResourceRequestCreateDBRequest, ResourceRequestDBResponse, ResourceRequestPatchDBRequest,
};
use crate::types::{ResourceRequestId, Version};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for listing resource requests
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListResourceRequestsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub page: PageParams,

    /// Full-text search over the customer name
    #[param(example = "health")]
    pub customer: Option<String>,

    /// Comma-separated skills; matches requests requiring all of them
    pub skills: Option<String>,

    /// Only closed (true) or open (false) requests
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub closed: Option<bool>,
}

impl ListResourceRequestsQuery {
    pub fn to_filter(&self) -> ResourceRequestFilter {
        let defaults = ResourceRequestFilter::default();
        ResourceRequestFilter {
            customer: self.customer.clone(),
            skills: split_tags(self.skills.as_deref()),
            closed: self.closed,
            filters: self.page.apply(defaults.filters),
        }
    }
}

/// Request body for creating a resource request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequestCreate {
    #[schema(example = "Acme Health")]
    pub customer: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[schema(example = 40)]
    pub hours_per_week: i32,
    #[schema(example = json!(["vsphere", "nsx"]))]
    pub skills: Vec<String>,
    pub opportunity_id: Option<String>,
    pub engagement_id: Option<String>,
}

impl From<ResourceRequestCreate> for ResourceRequestCreateDBRequest {
    fn from(create: ResourceRequestCreate) -> Self {
        Self {
            customer: create.customer,
            start_date: create.start_date,
            end_date: create.end_date,
            hours_per_week: create.hours_per_week,
            skills: create.skills,
            opportunity_id: create.opportunity_id,
            engagement_id: create.engagement_id,
        }
    }
}

/// Request body for updating a resource request. Omitted fields are left unchanged.
///
/// If `version` is given it must match the stored version, otherwise the update is
/// rejected with 409 Conflict.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequestUpdate {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub customer: FieldUpdate<String>,
    #[serde(default)]
    #[schema(value_type = Option<NaiveDate>)]
    pub start_date: FieldUpdate<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<NaiveDate>)]
    pub end_date: FieldUpdate<NaiveDate>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub hours_per_week: FieldUpdate<i32>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<String>>)]
    pub skills: FieldUpdate<Vec<String>>,
    /// `null` clears the identifier
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub opportunity_id: FieldUpdate<Option<String>>,
    /// `null` clears the identifier
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub engagement_id: FieldUpdate<Option<String>>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub closed: FieldUpdate<bool>,
    /// Version the client last read
    pub version: Option<Version>,
}

impl ResourceRequestUpdate {
    /// Split into the version the client holds (if any) and the field patch.
    pub fn into_parts(self) -> (Option<Version>, ResourceRequestPatchDBRequest) {
        let patch = ResourceRequestPatchDBRequest {
            customer: self.customer,
            start_date: self.start_date,
            end_date: self.end_date,
            hours_per_week: self.hours_per_week,
            skills: self.skills,
            opportunity_id: self.opportunity_id,
            engagement_id: self.engagement_id,
            closed: self.closed,
        };
        (self.version, patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequestResponse {
    pub id: ResourceRequestId,
    pub customer: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours_per_week: i32,
    pub skills: Vec<String>,
    pub opportunity_id: Option<String>,
    pub engagement_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: Version,
    pub closed: bool,
}

impl From<ResourceRequestDBResponse> for ResourceRequestResponse {
    fn from(db: ResourceRequestDBResponse) -> Self {
        Self {
            id: db.id,
            customer: db.customer,
            start_date: db.start_date,
            end_date: db.end_date,
            hours_per_week: db.hours_per_week,
            skills: db.skills,
            opportunity_id: db.opportunity_id,
            engagement_id: db.engagement_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
            version: db.version,
            closed: db.closed,
        }
    }
}
