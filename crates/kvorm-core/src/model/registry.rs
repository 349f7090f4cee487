use crate::model::{hash::ModelHash, meta::ModelMeta, source::ModelSource};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, RwLock},
};
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("model hash {hash} is already bound to a different declaration")]
    DuplicateModel { hash: ModelHash },

    #[error("model hash {hash} is not registered")]
    UnknownModel { hash: ModelHash },
}

///
/// ModelRegistry
///
/// Mapping from structural hash to finalized model metadata.
///
/// The registry is additive: entries are inserted at model-definition time
/// and never removed. Reads after registration are lock-light and safe
/// from any thread. `global()` is the process-wide instance; standalone
/// registries exist for tests and embedding.
///

#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: RwLock<HashMap<ModelHash, Arc<ModelMeta>>>,
}

static GLOBAL: LazyLock<ModelRegistry> = LazyLock::new(ModelRegistry::new);

impl ModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, alive for the process lifetime.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Register one finalized model.
    ///
    /// Re-registering a structurally identical declaration is a no-op, so
    /// re-importing the same definitions never errors. A hash already bound
    /// to a *different* structure is rejected, never silently overwritten.
    pub fn register(&self, meta: Arc<ModelMeta>) -> Result<(), RegistryError> {
        let hash = meta.hash();
        let mut models = self.models.write().expect("model registry lock poisoned");

        if let Some(existing) = models.get(&hash) {
            if existing.same_structure(&meta) {
                return Ok(());
            }
            return Err(RegistryError::DuplicateModel { hash });
        }

        models.insert(hash, meta);
        Ok(())
    }

    /// Register every model produced by a discovery source, fail-fast.
    pub fn register_all<S: ModelSource>(&self, source: &S) -> Result<usize, RegistryError> {
        let mut count = 0;
        for meta in source.models() {
            self.register(meta)?;
            count += 1;
        }
        Ok(count)
    }

    /// Pure read: metadata bound to `hash`, if any.
    #[must_use]
    pub fn lookup(&self, hash: ModelHash) -> Option<Arc<ModelMeta>> {
        self.models
            .read()
            .expect("model registry lock poisoned")
            .get(&hash)
            .cloned()
    }

    /// Lookup that treats an unknown hash as an error.
    pub fn try_lookup(&self, hash: ModelHash) -> Result<Arc<ModelMeta>, RegistryError> {
        self.lookup(hash)
            .ok_or(RegistryError::UnknownModel { hash })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models
            .read()
            .expect("model registry lock poisoned")
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
