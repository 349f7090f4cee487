//! Snapshot-based instance serialization.
//!
//! A snapshot carries only durable state: model hash, key, lifecycle, and
//! field values. Per-process scratch (the clean diff baseline, ephemeral
//! identity) never crosses the boundary; a revived persisted instance
//! starts clean. Reviving requires the model to already be registered in
//! the receiving process's registry; no metadata travels with the bytes.

use crate::{
    error::Error,
    instance::{Instance, Lifecycle},
    key::Key,
    model::{hash::ModelHash, registry::ModelRegistry},
    serialize::{self, SerializeError},
    value::FieldMap,
};
use serde::{Deserialize, Serialize};

///
/// InstanceSnapshot
///
/// Wire shape of one serialized instance.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct InstanceSnapshot {
    pub model: ModelHash,
    pub key: Option<Key>,
    pub state: Lifecycle,
    pub values: FieldMap,
}

impl InstanceSnapshot {
    #[must_use]
    pub fn of(instance: &Instance) -> Self {
        Self {
            model: instance.meta().hash(),
            key: instance.key(),
            state: instance.state(),
            values: instance.values().clone(),
        }
    }
}

/// Serialize an instance's durable state.
pub fn snapshot(instance: &Instance) -> Result<Vec<u8>, SerializeError> {
    serialize::serialize(&InstanceSnapshot::of(instance))
}

/// Rebuild an instance from snapshot bytes, resolving metadata through
/// `registry`. Fails with an unknown-model error when the hash is not
/// registered in this process.
pub fn revive(bytes: &[u8], registry: &ModelRegistry) -> Result<Instance, Error> {
    let snap: InstanceSnapshot = serialize::deserialize(bytes)?;
    let meta = registry.try_lookup(snap.model)?;

    let instance = match snap.state {
        Lifecycle::Persisted => {
            let key = snap.key.ok_or_else(|| {
                SerializeError::Deserialize("persisted snapshot is missing its key".to_string())
            })?;
            Instance::from_stored(&meta, key, snap.values)
        }
        Lifecycle::New => {
            let mut instance = Instance::new(&meta);
            for (field, value) in snap.values.iter() {
                instance.set(field, value.clone())?;
            }
            instance
        }
        Lifecycle::Deleted => {
            let mut instance = match snap.key {
                Some(key) => Instance::from_stored(&meta, key, snap.values),
                None => Instance::new(&meta),
            };
            instance.mark_deleted();
            instance
        }
    };

    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{instrument, persisted_instrument};
    use crate::value::Value;

    fn registry_with_instrument() -> ModelRegistry {
        let registry = ModelRegistry::new();
        registry.register(instrument()).expect("register");
        registry
    }

    #[test]
    fn persisted_round_trip_preserves_identity_and_fields() {
        let meta = instrument();
        let registry = registry_with_instrument();
        let original = persisted_instrument(&meta, 5, "erz12", "EUR");

        let bytes = snapshot(&original).expect("snapshot");
        let revived = revive(&bytes, &registry).expect("revive");

        assert_eq!(revived, original, "equality is model hash + key");
        assert_eq!(revived.get("name"), original.get("name"));
        assert_eq!(revived.get("ccy"), original.get("ccy"));
        assert_eq!(
            revived.identity().expect("identity").to_string(),
            original.identity().expect("identity").to_string(),
        );
    }

    #[test]
    fn unknown_model_hash_fails_revive() {
        let meta = instrument();
        let original = persisted_instrument(&meta, 5, "erz12", "EUR");
        let bytes = snapshot(&original).expect("snapshot");

        let empty = ModelRegistry::new();
        let err = revive(&bytes, &empty).expect_err("unregistered model must fail");
        assert!(matches!(
            err,
            Error::Registry(crate::model::registry::RegistryError::UnknownModel { .. })
        ));
    }

    #[test]
    fn dirty_state_does_not_survive_the_round_trip() {
        let meta = instrument();
        let registry = registry_with_instrument();

        let mut original = persisted_instrument(&meta, 5, "erz12", "EUR");
        original.set("name", "edz14").expect("set");
        assert!(original.is_dirty());

        let bytes = snapshot(&original).expect("snapshot");
        let revived = revive(&bytes, &registry).expect("revive");

        assert!(
            !revived.is_dirty(),
            "revived instances carry no diff baseline scratch"
        );
        assert_eq!(
            revived.get("name"),
            Some(&Value::Text("edz14".to_string())),
            "snapshot captures current field values"
        );
    }

    #[test]
    fn unsaved_instance_round_trips_as_unsaved() {
        let meta = instrument();
        let registry = registry_with_instrument();

        let mut original = Instance::new(&meta);
        original.set("name", "erz12").expect("set");

        let bytes = snapshot(&original).expect("snapshot");
        let revived = revive(&bytes, &registry).expect("revive");

        assert_eq!(revived.state(), Lifecycle::New);
        assert_eq!(revived.key(), None);
        assert!(revived.identity().is_err(), "unsaved records stay unaddressable");
    }
}
