//! Lazy query layer.
//!
//! `spec` holds the immutable query specification and its validation,
//! `eval` the pure predicate/order/page semantics, and `load` the
//! consumption surface that actually touches the backend.

pub mod eval;
pub mod load;
pub mod spec;

pub use load::LoadExecutor;
pub use spec::{CompareOp, Filter, OrderDirection, OrderSpec, PageSpec, QueryError, QuerySpec};
