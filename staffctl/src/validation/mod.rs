//! Field-level validation.
//!
//! A [`Validator`] accumulates at most one human-readable message per field. Entity
//! validators in the submodules run one check per business rule against a candidate
//! and leave the verdict in the validator:
//!
//! ```
//! use staffctl::validation::Validator;
//!
//! let mut v = Validator::new();
//! v.check(!"".is_empty(), "customer", "must be provided");
//! v.check(false, "customer", "must not be more than 256 bytes");
//!
//! assert!(!v.valid());
//! assert_eq!(v.errors()["customer"], "must be provided");
//! ```
//!
//! Field names (`firstName`, `customer`, ...) are the keys clients see in a
//! failed-validation response, so they follow the JSON field names of the API models.

pub mod references;
pub mod resource_requests;
pub mod resources;

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

pub use references::{validate_description, validate_title};
pub use resource_requests::{ResourceRequestCandidate, validate_resource_request};
pub use resources::{ResourceCandidate, validate_resource};

/// Maximum length in bytes of free-text name fields.
pub const MAX_TEXT_BYTES: usize = 256;

/// Error accumulator keyed by field name.
///
/// The first failure recorded for a field wins; later checks against the same field
/// are no-ops once a message exists.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Validator {
    errors: BTreeMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff no field has a message.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` under `field` unless the field already has one.
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Record `message` under `field` iff `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn into_errors(self) -> BTreeMap<String, String> {
        self.errors
    }
}

/// Membership test against a fixed set of permitted values.
pub fn permitted_value<T: PartialEq + ?Sized>(value: &T, permitted: &[&T]) -> bool {
    permitted.iter().any(|p| *p == value)
}

/// True if no element occurs more than once, regardless of position.
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|v| seen.insert(v))
}
