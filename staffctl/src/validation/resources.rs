//! Business rules for resources.

use super::{MAX_TEXT_BYTES, Validator, permitted_value, unique};
use crate::db::models::resources::{ResourceCreateDBRequest, ResourceDBResponse};
use crate::types::ResourceId;

/// Position titles a resource may hold.
pub const POSITIONS: &[&str] = &[
    "Associate Consultant I",
    "Associate Consultant II",
    "Consultant",
    "Senior Consultant",
    "Staff Consultant",
    "Consulting Architect",
    "Staff Consulting Architect",
];

/// Clearance levels a resource may hold.
pub const CLEARANCES: &[&str] = &["None", "Baseline", "NV1", "NV2", "TSPV"];

/// Recorded sex values. The first is the default for new resources.
pub const SEXES: &[&str] = &["Unknown", "Male", "Female", "Not Specified"];

/// Borrowed view over the fields of a resource, whether it is about to be created
/// (no id yet) or is a merged snapshot about to replace a stored row.
#[derive(Debug, Clone, Copy)]
pub struct ResourceCandidate<'a> {
    pub id: Option<ResourceId>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub position: &'a str,
    pub clearance: &'a str,
    pub specialties: &'a [String],
    pub certifications: &'a [String],
    pub sex: &'a str,
}

impl<'a> From<&'a ResourceCreateDBRequest> for ResourceCandidate<'a> {
    fn from(r: &'a ResourceCreateDBRequest) -> Self {
        Self {
            id: None,
            first_name: &r.first_name,
            last_name: &r.last_name,
            position: &r.position,
            clearance: &r.clearance,
            specialties: &r.specialties,
            certifications: &r.certifications,
            sex: &r.sex,
        }
    }
}

impl<'a> From<&'a ResourceDBResponse> for ResourceCandidate<'a> {
    fn from(r: &'a ResourceDBResponse) -> Self {
        Self {
            id: Some(r.id),
            first_name: &r.first_name,
            last_name: &r.last_name,
            position: &r.position,
            clearance: &r.clearance,
            specialties: &r.specialties,
            certifications: &r.certifications,
            sex: &r.sex,
        }
    }
}

pub fn validate_id(v: &mut Validator, id: ResourceId) {
    v.check(id != 0, "id", "must be provided");
    v.check(id > 0, "id", "cannot be a negative number");
}

pub fn validate_first_name(v: &mut Validator, first_name: &str) {
    v.check(!first_name.is_empty(), "firstName", "must be provided");
    v.check(first_name.len() <= MAX_TEXT_BYTES, "firstName", "must not be more than 256 bytes");
}

pub fn validate_last_name(v: &mut Validator, last_name: &str) {
    v.check(!last_name.is_empty(), "lastName", "must be provided");
    v.check(last_name.len() <= MAX_TEXT_BYTES, "lastName", "must not be more than 256 bytes");
}

pub fn validate_position(v: &mut Validator, position: &str) {
    v.check(permitted_value(position, POSITIONS), "position", "does not exist");
}

pub fn validate_clearance(v: &mut Validator, clearance: &str) {
    v.check(
        permitted_value(clearance, CLEARANCES),
        "clearance",
        "must be one of ('None', 'Baseline', 'NV1', 'NV2', 'TSPV')",
    );
}

pub fn validate_sex(v: &mut Validator, sex: &str) {
    v.check(
        permitted_value(sex, SEXES),
        "sex",
        "must be one of ('Unknown', 'Male', 'Female', 'Not Specified')",
    );
}

/// Run every resource rule in a fixed order.
pub fn validate_resource<'a>(v: &mut Validator, resource: impl Into<ResourceCandidate<'a>>) {
    let r = resource.into();

    if let Some(id) = r.id {
        validate_id(v, id);
    }
    validate_first_name(v, r.first_name);
    validate_last_name(v, r.last_name);
    validate_position(v, r.position);
    validate_clearance(v, r.clearance);
    validate_sex(v, r.sex);
    v.check(unique(r.specialties), "specialties", "must not contain duplicate values");
    v.check(unique(r.certifications), "certifications", "must not contain duplicate values");
}
