//! kvorm: a model registry, identity system, and lazy query engine over
//! key-value backends.
//!
//! ## Crate layout
//! - `core`: model metadata, registry, instances, queries, sessions, and
//!   observability.
//!
//! The `prelude` module mirrors the surface used by application code;
//! driver authors reach into `core::backend` directly.

pub use kvorm_core as core;

pub use kvorm_core::Error;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        backend::{Backend as _, MemoryBackend},
        identity::IdentityToken,
        instance::{Instance, Lifecycle},
        key::Key,
        model::{
            field::{FieldKind, FieldModel},
            hash::ModelHash,
            meta::{ModelDecl, ModelMeta},
            registry::ModelRegistry,
            source::ModelSource,
        },
        query::{CompareOp, LoadExecutor, OrderDirection, QuerySpec},
        serialize::{revive, snapshot},
        session::Session,
        value::Value,
    };
    pub use serde::{Deserialize, Serialize};
}
