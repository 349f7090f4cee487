use crate::{
    backend::BackendError, identity::IdentityError, instance::FieldValueError,
    model::meta::ModelError, model::registry::RegistryError, query::QueryError,
    serialize::SerializeError, session::SessionError,
};
use thiserror::Error as ThisError;

///
/// Error
///
/// Top-level error surface for the engine. Each subsystem keeps its own
/// taxonomy; this enum is the transparent union callers match on.
///
/// Propagation policy: validation failures surface before any backend
/// call; backend-reported failures are translated into this taxonomy and
/// never swallowed or downgraded to default values.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    FieldValue(#[from] FieldValueError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl Error {
    /// Whether retrying the failed call is reasonable.
    ///
    /// Connectivity failures never corrupt instance or registry state, so
    /// they are always retryable at the caller's discretion.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(BackendError::Connection(_)))
    }
}
