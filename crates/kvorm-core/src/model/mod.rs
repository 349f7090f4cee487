//! Runtime data model definitions.
//!
//! Types in `model` are the finalized, immutable descriptions of what the
//! application declared: fields, constraints, structural hashes, and the
//! process-wide registry that maps hashes back to metadata.
//!
//! In general:
//! - Application code declares *what exists* (`ModelDecl`)
//! - `model` holds *what runs* (`ModelMeta`, `ModelRegistry`)

pub mod field;
pub mod hash;
pub mod meta;
pub mod registry;
pub mod source;
