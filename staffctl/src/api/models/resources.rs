//! API request/response models for resources.

use super::pagination::{PageParams, split_tags};
use crate::db::handlers::ResourceFilter;
use crate::db::models::FieldUpdate;
use crate::db::models::resources::{ResourceCreateDBRequest, ResourceDBResponse, ResourcePatchDBRequest};
use crate::types::ResourceId;
use crate::validation::resources::SEXES;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for listing resources
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListResourcesQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub page: PageParams,

    /// Comma-separated specialties; matches resources holding all of them
    #[param(example = "linux,vmware")]
    pub specialties: Option<String>,

    /// Comma-separated certifications; matches resources holding all of them
    pub certifications: Option<String>,

    /// Only active (true) or inactive (false) resources
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub active: Option<bool>,

    /// Exact clearance level
    #[param(example = "NV1")]
    pub clearance: Option<String>,
}

impl ListResourcesQuery {
    pub fn to_filter(&self) -> ResourceFilter {
        let defaults = ResourceFilter::default();
        ResourceFilter {
            specialties: split_tags(self.specialties.as_deref()),
            certifications: split_tags(self.certifications.as_deref()),
            active: self.active,
            clearance: self.clearance.clone(),
            filters: self.page.apply(defaults.filters),
        }
    }
}

fn default_active() -> bool {
    true
}

fn default_sex() -> String {
    SEXES[0].to_string()
}

/// Request body for creating a resource.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCreate {
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Position title
    #[schema(example = "Senior Consultant")]
    pub position: String,
    /// Clearance level
    #[schema(example = "NV1")]
    pub clearance: String,
    #[serde(default)]
    #[schema(example = json!(["linux", "vmware"]))]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    /// Defaults to true
    #[serde(default = "default_active")]
    pub active: bool,
    /// One of `Unknown` (default), `Male`, `Female`, `Not Specified`
    #[serde(default = "default_sex")]
    pub sex: String,
}

impl From<ResourceCreate> for ResourceCreateDBRequest {
    fn from(create: ResourceCreate) -> Self {
        Self {
            first_name: create.first_name,
            last_name: create.last_name,
            position: create.position,
            clearance: create.clearance,
            specialties: create.specialties,
            certifications: create.certifications,
            active: create.active,
            sex: create.sex,
        }
    }
}

/// Request body for updating a resource. Omitted fields are left unchanged; a provided
/// tag list replaces the stored one entirely.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUpdate {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub first_name: FieldUpdate<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub last_name: FieldUpdate<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub position: FieldUpdate<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub clearance: FieldUpdate<String>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<String>>)]
    pub specialties: FieldUpdate<Vec<String>>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<String>>)]
    pub certifications: FieldUpdate<Vec<String>>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub active: FieldUpdate<bool>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub sex: FieldUpdate<String>,
}

impl From<ResourceUpdate> for ResourcePatchDBRequest {
    fn from(update: ResourceUpdate) -> Self {
        Self {
            first_name: update.first_name,
            last_name: update.last_name,
            position: update.position,
            clearance: update.clearance,
            specialties: update.specialties,
            certifications: update.certifications,
            active: update.active,
            sex: update.sex,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: ResourceId,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub clearance: String,
    pub specialties: Vec<String>,
    pub certifications: Vec<String>,
    pub active: bool,
    pub sex: String,
}

impl From<ResourceDBResponse> for ResourceResponse {
    fn from(db: ResourceDBResponse) -> Self {
        Self {
            id: db.id,
            first_name: db.first_name,
            last_name: db.last_name,
            position: db.position,
            clearance: db.clearance,
            specialties: db.specialties,
            certifications: db.certifications,
            active: db.active,
            sex: db.sex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let create: ResourceCreate = serde_json::from_str(
            r#"{"firstName": "Ada", "lastName": "Lovelace", "position": "Consultant", "clearance": "None"}"#,
        )
        .unwrap();
        assert!(create.active);
        assert_eq!(create.sex, "Unknown");
        assert!(create.specialties.is_empty());
    }

    #[test]
    fn test_update_tracks_provided_fields() {
        let update: ResourceUpdate = serde_json::from_str(r#"{"active": false, "specialties": []}"#).unwrap();
        assert_eq!(update.active, FieldUpdate::Set(false));
        assert_eq!(update.specialties, FieldUpdate::Set(vec![]));
        assert!(update.first_name.is_unset());
        assert!(update.certifications.is_unset());
    }

    #[test]
    fn test_list_query_to_filter() {
        let query: ListResourcesQuery =
            serde_urlencoded::from_str("specialties=linux,vmware&active=false&clearance=NV1&page=2&sort=-last_name").unwrap();
        let filter = query.to_filter();

        assert_eq!(filter.specialties, vec!["linux", "vmware"]);
        assert!(filter.certifications.is_empty());
        assert_eq!(filter.active, Some(false));
        assert_eq!(filter.clearance.as_deref(), Some("NV1"));
        assert_eq!(filter.filters.page, 2);
        assert_eq!(filter.filters.page_size, 20);
        assert_eq!(filter.filters.sort, "-last_name");

        let filter = ListResourcesQuery::default().to_filter();
        assert_eq!(filter.active, None);
        assert_eq!(filter.filters.sort, "id");
    }
}
