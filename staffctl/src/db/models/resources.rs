//! Database models for resources (people).

use super::field_update::FieldUpdate;
use crate::types::ResourceId;
use sqlx::FromRow;

/// Database request for creating a new resource.
///
/// `position` and `clearance` are referenced by title / description and resolved to
/// ids at write time.
#[derive(Debug, Clone)]
pub struct ResourceCreateDBRequest {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub clearance: String,
    pub specialties: Vec<String>,
    pub certifications: Vec<String>,
    pub active: bool,
    pub sex: String,
}

/// Database response for a resource, with position and clearance materialized as their
/// human-readable strings. Also the full-replace update payload.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ResourceDBResponse {
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

/// Partial update for a resource. Unset fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct ResourcePatchDBRequest {
    pub first_name: FieldUpdate<String>,
    pub last_name: FieldUpdate<String>,
    pub position: FieldUpdate<String>,
    pub clearance: FieldUpdate<String>,
    pub specialties: FieldUpdate<Vec<String>>,
    pub certifications: FieldUpdate<Vec<String>>,
    pub active: FieldUpdate<bool>,
    pub sex: FieldUpdate<String>,
}

impl ResourcePatchDBRequest {
    /// Merge the set fields onto a fetched snapshot.
    pub fn apply(self, resource: &mut ResourceDBResponse) {
        self.first_name.apply_to(&mut resource.first_name);
        self.last_name.apply_to(&mut resource.last_name);
        self.position.apply_to(&mut resource.position);
        self.clearance.apply_to(&mut resource.clearance);
        self.specialties.apply_to(&mut resource.specialties);
        self.certifications.apply_to(&mut resource.certifications);
        self.active.apply_to(&mut resource.active);
        self.sex.apply_to(&mut resource.sex);
    }
}
