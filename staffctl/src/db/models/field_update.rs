//! Tagged per-field updates for partial (PATCH) requests.
//!
//! Each patchable field is either [`FieldUpdate::Unset`] (keep the stored value) or
//! [`FieldUpdate::Set`] (overwrite it). Patches are merged onto a freshly fetched
//! snapshot, and the merged entity is validated as a whole before the full-replace
//! update is issued. Collection-valued fields are replaced wholesale, never merged
//! element-wise.
//!
//! When deserialized, a field absent from the payload is `Unset` (requires
//! `#[serde(default)]` on the containing field) and a present value is `Set`. An
//! explicit `null` is only accepted when `T` itself admits it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Unset,
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldUpdate::Unset)
    }

    /// Overwrite `target` if this update is `Set`.
    pub fn apply_to(self, target: &mut T) {
        if let FieldUpdate::Set(value) = self {
            *target = value;
        }
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            FieldUpdate::Set(value) => Some(value),
            FieldUpdate::Unset => None,
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldUpdate::Unset, FieldUpdate::Set)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(FieldUpdate::Set)
    }
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldUpdate::Set(value) => value.serialize(serializer),
            FieldUpdate::Unset => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default)]
        name: FieldUpdate<String>,
        #[serde(default)]
        tags: FieldUpdate<Vec<String>>,
        #[serde(default)]
        note: FieldUpdate<Option<String>>,
    }

    #[test]
    fn test_absent_fields_are_unset() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert!(patch.name.is_unset());
        assert!(patch.tags.is_unset());
        assert!(patch.note.is_unset());
    }

    #[test]
    fn test_present_fields_are_set() {
        let patch: Patch = serde_json::from_str(r#"{"name": "x", "tags": [], "note": null}"#).unwrap();
        assert_eq!(patch.name, FieldUpdate::Set("x".to_string()));
        assert_eq!(patch.tags, FieldUpdate::Set(vec![]));
        assert_eq!(patch.note, FieldUpdate::Set(None));
    }

    #[test]
    fn test_null_rejected_for_non_nullable_field() {
        assert!(serde_json::from_str::<Patch>(r#"{"name": null}"#).is_err());
    }

    #[test]
    fn test_apply_to() {
        let mut tags = vec!["linux".to_string(), "vmware".to_string()];

        FieldUpdate::Unset.apply_to(&mut tags);
        assert_eq!(tags, vec!["linux", "vmware"]);

        FieldUpdate::Set(vec!["nsx".to_string()]).apply_to(&mut tags);
        assert_eq!(tags, vec!["nsx"]);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(FieldUpdate::from(Some(3)), FieldUpdate::Set(3));
        assert_eq!(FieldUpdate::<i32>::from(None), FieldUpdate::Unset);
    }
}
