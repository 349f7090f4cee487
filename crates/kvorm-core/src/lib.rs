//! Core runtime for kvorm: model metadata, the structural-hash registry,
//! instance lifecycle and identity, lazy query specifications, and the
//! save pipeline that commits field diffs through a backend driver.

// public exports are one module level down
pub mod backend;
pub mod error;
pub mod identity;
pub mod instance;
pub mod key;
pub mod model;
pub mod obs;
pub mod query;
pub mod serialize;
pub mod session;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, executors, backends, or serializers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        instance::{Instance, Lifecycle},
        key::Key,
        model::{
            field::{FieldKind, FieldModel},
            hash::ModelHash,
            meta::{ModelDecl, ModelMeta},
        },
        query::spec::{CompareOp, OrderDirection, QuerySpec},
        value::Value,
    };
}
