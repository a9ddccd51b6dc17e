//! Database models for resource requests (staffing demands).

use super::field_update::FieldUpdate;
use crate::types::{ResourceRequestId, Version};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database request for creating a new resource request. Id, timestamps, version
/// and the closed flag are assigned by the database.
#[derive(Debug, Clone)]
pub struct ResourceRequestCreateDBRequest {
    pub customer: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours_per_week: i32,
    pub skills: Vec<String>,
    pub opportunity_id: Option<String>,
    pub engagement_id: Option<String>,
}

/// Database response for a resource request.
///
/// Passed back to the full-replace update carrying the `version` it was read at.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ResourceRequestDBResponse {
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

/// Partial update for a resource request. Unset fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct ResourceRequestPatchDBRequest {
    pub customer: FieldUpdate<String>,
    pub start_date: FieldUpdate<NaiveDate>,
    pub end_date: FieldUpdate<NaiveDate>,
    pub hours_per_week: FieldUpdate<i32>,
    pub skills: FieldUpdate<Vec<String>>,
    pub opportunity_id: FieldUpdate<Option<String>>,
    pub engagement_id: FieldUpdate<Option<String>>,
    pub closed: FieldUpdate<bool>,
}

impl ResourceRequestPatchDBRequest {
    /// Merge the set fields onto a fetched snapshot. The snapshot's `version` is left
    /// untouched so the following update is conditioned on what was read.
    pub fn apply(self, request: &mut ResourceRequestDBResponse) {
        self.customer.apply_to(&mut request.customer);
        self.start_date.apply_to(&mut request.start_date);
        self.end_date.apply_to(&mut request.end_date);
        self.hours_per_week.apply_to(&mut request.hours_per_week);
        self.skills.apply_to(&mut request.skills);
        self.opportunity_id.apply_to(&mut request.opportunity_id);
        self.engagement_id.apply_to(&mut request.engagement_id);
        self.closed.apply_to(&mut request.closed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> ResourceRequestDBResponse {
        let now = Utc::now();
        ResourceRequestDBResponse {
            id: 3,
            customer: "Acme Health".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            hours_per_week: 20,
            skills: vec!["vsan".to_string()],
            opportunity_id: Some("OPP-9".to_string()),
            engagement_id: None,
            created_at: now,
            updated_at: now,
            version: 4,
            closed: false,
        }
    }

    #[test]
    fn test_patch_merges_set_fields_only() {
        let original = stored();
        let mut request = original.clone();

        ResourceRequestPatchDBRequest {
            closed: FieldUpdate::Set(true),
            opportunity_id: FieldUpdate::Set(None),
            skills: FieldUpdate::Set(vec!["nsx".to_string(), "vcf".to_string()]),
            ..Default::default()
        }
        .apply(&mut request);

        assert!(request.closed);
        assert_eq!(request.opportunity_id, None);
        assert_eq!(request.skills, vec!["nsx", "vcf"]);
        assert_eq!(request.customer, original.customer);
        assert_eq!(request.hours_per_week, original.hours_per_week);
        assert_eq!(request.version, original.version);
        assert_eq!(request.updated_at, original.updated_at);
    }
}
