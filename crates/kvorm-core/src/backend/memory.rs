use crate::{
    backend::{Backend, BackendError, RawRecord},
    key::Key,
    query::{eval, spec::QuerySpec},
    serialize,
    value::FieldMap,
};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

///
/// MemoryBackend
///
/// Process-local reference driver: namespace → key → field map, with
/// monotonic key assignment. Commits merge the field diff into the stored
/// row under one lock, which is the driver-side atomicity this layer
/// relies on.
///

#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    namespaces: HashMap<String, BTreeMap<Key, FieldMap>>,
    next_key: u64,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored under one namespace.
    #[must_use]
    pub fn len(&self, namespace: &str) -> usize {
        self.state
            .lock()
            .expect("memory backend lock poisoned")
            .namespaces
            .get(namespace)
            .map_or(0, BTreeMap::len)
    }

    #[must_use]
    pub fn is_empty(&self, namespace: &str) -> bool {
        self.len(namespace) == 0
    }
}

impl Backend for MemoryBackend {
    fn fetch(&self, namespace: &str, spec: &QuerySpec) -> Result<Vec<RawRecord>, BackendError> {
        let state = self.state.lock().expect("memory backend lock poisoned");
        let Some(rows) = state.namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        // Point lookups short-circuit the scan.
        let mut selected: Vec<(Key, FieldMap)> = match spec.key_bound() {
            Some(key) => rows
                .get(&key)
                .filter(|values| eval::matches_all(spec.filters(), values))
                .map(|values| (key, values.clone()))
                .into_iter()
                .collect(),
            None => rows
                .iter()
                .filter(|(_, values)| eval::matches_all(spec.filters(), values))
                .map(|(key, values)| (*key, values.clone()))
                .collect(),
        };

        if let Some(order) = spec.order() {
            eval::apply_order(&mut selected, order);
        }
        if let Some(page) = spec.page() {
            selected = eval::apply_page(selected, page);
        }

        selected
            .into_iter()
            .map(|(key, values)| {
                serialize::serialize(&values)
                    .map(|bytes| RawRecord { key, bytes })
                    .map_err(|err| BackendError::Internal(err.to_string()))
            })
            .collect()
    }

    fn commit(
        &self,
        namespace: &str,
        key: Option<Key>,
        diff: &FieldMap,
    ) -> Result<Key, BackendError> {
        let mut state = self.state.lock().expect("memory backend lock poisoned");

        let key = match key {
            Some(key) => key,
            None => {
                state.next_key += 1;
                Key::new(state.next_key)
            }
        };

        let rows = state.namespaces.entry(namespace.to_string()).or_default();
        rows.entry(key).or_default().apply(diff);

        Ok(key)
    }

    fn remove(&self, namespace: &str, key: Key) -> Result<(), BackendError> {
        let mut state = self.state.lock().expect("memory backend lock poisoned");
        let removed = state
            .namespaces
            .get_mut(namespace)
            .and_then(|rows| rows.remove(&key));

        if removed.is_none() {
            return Err(BackendError::MissingRecord {
                namespace: namespace.to_string(),
                key,
            });
        }

        Ok(())
    }
}
