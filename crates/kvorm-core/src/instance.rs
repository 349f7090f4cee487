use crate::{
    key::Key,
    model::{field::FieldKind, meta::ModelMeta},
    value::{FieldMap, Value},
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use thiserror::Error as ThisError;

// Per-process ephemeral identity for not-yet-persisted instances.
static NONCE: AtomicU64 = AtomicU64::new(1);

///
/// FieldValueError
///
/// Validation or uniqueness failure on one specific field. Always names
/// the offending field.
///

#[derive(Debug, ThisError)]
pub enum FieldValueError {
    #[error("unknown field '{field}' on model '{model}'")]
    UnknownField { model: String, field: String },

    #[error("field '{field}' expects {expected}, found {found}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        found: &'static str,
    },

    #[error("required field '{field}' is missing")]
    MissingRequired { field: String },

    #[error("unique constraint violated on field '{field}'")]
    UniqueViolation { field: String },
}

impl FieldValueError {
    /// Name of the field the failure refers to.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownField { field, .. }
            | Self::KindMismatch { field, .. }
            | Self::MissingRequired { field }
            | Self::UniqueViolation { field } => field,
        }
    }
}

///
/// Lifecycle
///
/// Explicit per-instance persistence state. Identity-dependent operations
/// check this state instead of relying on key presence.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Lifecycle {
    New,
    Persisted,
    Deleted,
}

impl Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::New => "new",
            Self::Persisted => "persisted",
            Self::Deleted => "deleted",
        })
    }
}

///
/// Instance
///
/// One application record bound to its model metadata: current field
/// values, the last-known-persisted snapshot, and lifecycle state.
///
/// Instances are exclusively owned by one logical caller at a time; they
/// carry no internal synchronization.
///

#[derive(Clone, Debug)]
pub struct Instance {
    meta: Arc<ModelMeta>,
    values: FieldMap,
    clean: FieldMap,
    state: Lifecycle,
    key: Option<Key>,
    nonce: u64,
}

impl Instance {
    /// Construct an unsaved instance with declared defaults applied.
    #[must_use]
    pub fn new(meta: &Arc<ModelMeta>) -> Self {
        let mut values = FieldMap::new();
        for field in meta.fields() {
            if let Some(default) = field.default() {
                values.insert(field.name().to_string(), default.clone());
            }
        }

        Self {
            meta: Arc::clone(meta),
            values,
            clean: FieldMap::new(),
            state: Lifecycle::New,
            key: None,
            nonce: NONCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Rehydrate a persisted instance from stored field values.
    ///
    /// The clean snapshot starts equal to the stored values: a freshly
    /// loaded instance has no dirty fields.
    #[must_use]
    pub fn from_stored(meta: &Arc<ModelMeta>, key: Key, values: FieldMap) -> Self {
        Self {
            meta: Arc::clone(meta),
            clean: values.clone(),
            values,
            state: Lifecycle::Persisted,
            key: Some(key),
            nonce: NONCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    #[must_use]
    pub const fn meta(&self) -> &Arc<ModelMeta> {
        &self.meta
    }

    #[must_use]
    pub const fn state(&self) -> Lifecycle {
        self.state
    }

    /// Primary key; populated only on the New → Persisted transition.
    #[must_use]
    pub const fn key(&self) -> Option<Key> {
        self.key
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    #[must_use]
    pub const fn values(&self) -> &FieldMap {
        &self.values
    }

    /// Set one field, validating existence and kind admission.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), FieldValueError> {
        let value = value.into();
        let Some(decl) = self.meta.field(field) else {
            return Err(FieldValueError::UnknownField {
                model: self.meta.name().to_string(),
                field: field.to_string(),
            });
        };

        if !decl.kind().admits(&value) {
            return Err(FieldValueError::KindMismatch {
                field: field.to_string(),
                expected: decl.kind().clone(),
                found: value.kind_label(),
            });
        }

        self.values.insert(field.to_string(), value);
        Ok(())
    }

    /// Diff against the clean snapshot: the full field set for a New
    /// instance, changed fields otherwise.
    #[must_use]
    pub fn dirty_fields(&self) -> FieldMap {
        match self.state {
            Lifecycle::New => self.values.clone(),
            _ => self.values.diff(&self.clean),
        }
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty_fields().is_empty()
    }

    /// Commit-side transition: assign the key and reset the clean snapshot.
    pub(crate) fn mark_persisted(&mut self, key: Key) {
        self.key = Some(key);
        self.clean = self.values.clone();
        self.state = Lifecycle::Persisted;
    }

    /// Terminal transition after a successful backend remove.
    pub(crate) fn mark_deleted(&mut self) {
        self.state = Lifecycle::Deleted;
    }
}

// Equality contract:
// - both Persisted: same model hash and same primary key
// - both New: same object (ephemeral nonce); each unsaved instance stands
//   for a distinct not-yet-real record
// - anything involving Deleted, or mixed states: never equal
impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        match (self.state, other.state) {
            (Lifecycle::Persisted, Lifecycle::Persisted) => {
                self.meta.hash() == other.meta.hash() && self.key == other.key
            }
            (Lifecycle::New, Lifecycle::New) => self.nonce == other.nonce,
            _ => false,
        }
    }
}

// Persisted instances hash (model hash, key): stable for the instance's
// lifetime and distinct from the pre-save nonce-based hash.
impl Hash for Instance {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        match self.state {
            Lifecycle::Persisted => {
                self.meta.hash().hash(hasher);
                self.key.hash(hasher);
            }
            Lifecycle::New | Lifecycle::Deleted => self.nonce.hash(hasher),
        }
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            Some(key) => write!(f, "{}({key})", self.meta.name()),
            None => write!(f, "{}(unsaved)", self.meta.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{instrument, persisted_instrument};
    use std::{
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher},
    };

    fn hash_of(instance: &Instance) -> u64 {
        let mut hasher = DefaultHasher::new();
        instance.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn new_instance_applies_defaults_and_has_no_key() {
        let meta = instrument();
        let instance = Instance::new(&meta);

        assert_eq!(instance.state(), Lifecycle::New);
        assert_eq!(instance.key(), None);
        assert_eq!(
            instance.get("type"),
            Some(&Value::Text("future".to_string())),
            "declared default must be applied at construction"
        );
    }

    #[test]
    fn set_rejects_unknown_field_and_kind_mismatch() {
        let meta = instrument();
        let mut instance = Instance::new(&meta);

        let err = instance.set("missing", "x").expect_err("unknown field");
        assert_eq!(err.field(), "missing");

        let err = instance.set("name", 5i64).expect_err("kind mismatch");
        assert!(matches!(err, FieldValueError::KindMismatch { .. }));
    }

    #[test]
    fn dirty_fields_is_full_set_for_new_and_delta_for_persisted() {
        let meta = instrument();
        let mut instance = Instance::new(&meta);
        instance.set("name", "erz12").expect("set");

        assert_eq!(
            instance.dirty_fields().len(),
            instance.values().len(),
            "new instance diff must cover every populated field"
        );

        let mut stored = persisted_instrument(&meta, 1, "erz12", "EUR");
        assert!(!stored.is_dirty(), "freshly loaded instance must be clean");

        stored.set("name", "edz14").expect("set");
        let dirty = stored.dirty_fields();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty.value_or_null("name"), Value::Text("edz14".into()));
    }

    #[test]
    fn equality_requires_persistence_and_matching_key() {
        let meta = instrument();
        let a = persisted_instrument(&meta, 1, "erz12", "EUR");
        let b = persisted_instrument(&meta, 1, "erz12", "EUR");
        let c = persisted_instrument(&meta, 2, "edz14", "USD");

        assert_eq!(a, b, "same model + key must compare equal");
        assert_ne!(a, c, "different keys must not compare equal");

        let unsaved = Instance::new(&meta);
        assert_ne!(unsaved, a, "unsaved never equals persisted");
        assert_eq!(unsaved, unsaved.clone(), "clone keeps the ephemeral token");
        assert_ne!(
            Instance::new(&meta),
            Instance::new(&meta),
            "distinct unsaved instances are distinct records"
        );
    }

    #[test]
    fn hash_changes_across_the_save_transition() {
        let meta = instrument();
        let mut instance = Instance::new(&meta);
        instance.set("name", "erz12").expect("set");

        let before = hash_of(&instance);
        instance.mark_persisted(Key::new(7));
        let after = hash_of(&instance);

        assert_ne!(before, after, "persisted hash keys off (model, key)");
        assert_eq!(
            after,
            hash_of(&persisted_instrument(&meta, 7, "erz12", "EUR")),
            "persisted hash must be stable across objects with the same identity"
        );
    }
}
