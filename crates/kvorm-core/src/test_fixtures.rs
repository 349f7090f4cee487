//! Shared fixtures for the finance-flavored test models and a counting
//! backend wrapper used to observe I/O behavior.

use crate::{
    backend::{Backend, BackendError, MemoryBackend, RawRecord},
    instance::Instance,
    key::Key,
    model::{
        field::{FieldKind, FieldModel},
        meta::{ModelDecl, ModelMeta},
    },
    query::spec::QuerySpec,
    session::Session,
    value::FieldMap,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Instrument model: name/type/ccy, with a declared default for `type`.
pub(crate) fn instrument() -> Arc<ModelMeta> {
    ModelDecl::new("Instrument")
        .field(FieldModel::new("name", FieldKind::Text).required())
        .field(FieldModel::new("type", FieldKind::Text).default_value("future".into()))
        .field(FieldModel::new("ccy", FieldKind::Text))
        .field(FieldModel::new(
            "issuer",
            FieldKind::Ref {
                model: "Fund".to_string(),
            },
        ))
        .finalize()
        .expect("instrument fixture should finalize")
}

/// Fund model with a unique name.
pub(crate) fn fund() -> Arc<ModelMeta> {
    ModelDecl::new("Fund")
        .field(FieldModel::new("name", FieldKind::Text).unique().required())
        .field(FieldModel::new("ccy", FieldKind::Text))
        .finalize()
        .expect("fund fixture should finalize")
}

/// A persisted instrument rehydrated as if loaded from the backend.
pub(crate) fn persisted_instrument(
    meta: &Arc<ModelMeta>,
    key: u64,
    name: &str,
    ccy: &str,
) -> Instance {
    let values: FieldMap = [
        ("name".to_string(), name.into()),
        ("type".to_string(), "future".into()),
        ("ccy".to_string(), ccy.into()),
    ]
    .into_iter()
    .collect();

    Instance::from_stored(meta, Key::new(key), values)
}

/// Session over a counting backend seeded with three instruments.
pub(crate) fn seeded_session(meta: &Arc<ModelMeta>) -> (Session<CountingBackend>, Vec<Key>) {
    let session = Session::new(CountingBackend::new());
    let mut keys = Vec::new();

    for (name, ccy) in [("erz12", "EUR"), ("edz14", "EUR"), ("sp500", "USD")] {
        let mut inst = Instance::new(meta);
        inst.set("name", name).expect("fixture set");
        inst.set("ccy", ccy).expect("fixture set");
        session.save(&mut inst).expect("fixture save");
        keys.push(inst.key().expect("fixture key"));
    }

    session.backend().reset_counts();
    (session, keys)
}

///
/// CountingBackend
///
/// Memory backend that counts driver calls, so tests can assert on
/// laziness and commit behavior.
///

#[derive(Debug, Default)]
pub(crate) struct CountingBackend {
    inner: MemoryBackend,
    fetches: AtomicUsize,
    commits: AtomicUsize,
    removes: AtomicUsize,
}

impl CountingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub(crate) fn commits(&self) -> usize {
        self.commits.load(Ordering::Relaxed)
    }

    pub(crate) fn removes(&self) -> usize {
        self.removes.load(Ordering::Relaxed)
    }

    pub(crate) fn reset_counts(&self) {
        self.fetches.store(0, Ordering::Relaxed);
        self.commits.store(0, Ordering::Relaxed);
        self.removes.store(0, Ordering::Relaxed);
    }
}

impl Backend for CountingBackend {
    fn fetch(&self, namespace: &str, spec: &QuerySpec) -> Result<Vec<RawRecord>, BackendError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.inner.fetch(namespace, spec)
    }

    fn commit(
        &self,
        namespace: &str,
        key: Option<Key>,
        diff: &FieldMap,
    ) -> Result<Key, BackendError> {
        self.commits.fetch_add(1, Ordering::Relaxed);
        self.inner.commit(namespace, key, diff)
    }

    fn remove(&self, namespace: &str, key: Key) -> Result<(), BackendError> {
        self.removes.fetch_add(1, Ordering::Relaxed);
        self.inner.remove(namespace, key)
    }
}
