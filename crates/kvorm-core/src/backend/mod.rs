//! Backend driver boundary.
//!
//! The engine never speaks a wire protocol itself; it hands namespaces,
//! query specifications, and field diffs to a driver and trusts the
//! driver's atomicity guarantees for a single commit. Calls are blocking:
//! they return a result or fail, with timeout/cancellation owned by the
//! driver.

pub mod memory;

pub use memory::MemoryBackend;

use crate::{key::Key, query::spec::QuerySpec, value::FieldMap};
use thiserror::Error as ThisError;

///
/// BackendError
///

#[derive(Debug, ThisError)]
pub enum BackendError {
    /// Backend unreachable. Always retryable; never leaves engine state
    /// corrupted.
    #[error("backend connection failed: {0}")]
    Connection(String),

    /// Driver-side constraint rejection, attributed to one field.
    #[error("backend constraint violated on field '{field}'")]
    Constraint { field: String },

    #[error("record {key} not found in namespace '{namespace}'")]
    MissingRecord { namespace: String, key: Key },

    #[error("backend failure: {0}")]
    Internal(String),
}

///
/// RawRecord
///
/// One stored record as the driver returns it: assigned key plus the
/// encoded field map.
///

#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    pub key: Key,
    pub bytes: Vec<u8>,
}

///
/// Backend
///
/// Storage driver contract. `fetch` applies the full query specification
/// (filters, order, pagination, key bound) driver-side; `commit` applies
/// one field diff atomically and returns the record's key, assigning a
/// fresh one when `key` is absent.
///

pub trait Backend {
    fn fetch(&self, namespace: &str, spec: &QuerySpec) -> Result<Vec<RawRecord>, BackendError>;

    fn commit(
        &self,
        namespace: &str,
        key: Option<Key>,
        diff: &FieldMap,
    ) -> Result<Key, BackendError>;

    fn remove(&self, namespace: &str, key: Key) -> Result<(), BackendError>;
}
