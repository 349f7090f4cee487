use crate::model::{field::FieldModel, hash::ModelHash};
use std::{
    collections::HashSet,
    fmt::{self, Display},
    sync::Arc,
};
use thiserror::Error as ThisError;

/// Field name reserved for the backend-assigned primary key.
pub const PRIMARY_KEY_NAME: &str = "id";

///
/// ModelError
///
/// Declaration-time failures raised by `ModelDecl::finalize`.
///

#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("model name is empty")]
    EmptyName,

    #[error("model '{model}' declares field '{field}' more than once")]
    DuplicateField { model: String, field: String },

    #[error("model '{model}' declares reserved field '{field}'")]
    ReservedField { model: String, field: String },

    #[error("model '{model}' declares no fields")]
    NoFields { model: String },
}

///
/// ModelDecl
///
/// Ordered field declarations for one model, prior to finalization.
/// Declaration order is significant: it feeds the structural hash and
/// default display ordering.
///

#[derive(Clone, Debug, Default)]
pub struct ModelDecl {
    name: String,
    fields: Vec<FieldModel>,
}

impl ModelDecl {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append one field declaration.
    #[must_use]
    pub fn field(mut self, field: FieldModel) -> Self {
        self.fields.push(field);
        self
    }

    /// Validate the declaration and compute its permanent structural hash.
    pub fn finalize(self) -> Result<Arc<ModelMeta>, ModelError> {
        if self.name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        if self.fields.is_empty() {
            return Err(ModelError::NoFields { model: self.name });
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name() == PRIMARY_KEY_NAME {
                return Err(ModelError::ReservedField {
                    model: self.name,
                    field: field.name().to_string(),
                });
            }
            if !seen.insert(field.name().to_string()) {
                return Err(ModelError::DuplicateField {
                    model: self.name,
                    field: field.name().to_string(),
                });
            }
        }

        let hash = ModelHash::compute(&self.name, &self.fields);
        let namespace = canonical_namespace(&self.name);

        Ok(Arc::new(ModelMeta {
            name: self.name,
            namespace,
            fields: self.fields,
            hash,
        }))
    }
}

///
/// ModelMeta
///
/// Finalized per-model metadata: field list, structural hash, and storage
/// namespace. Immutable and shared; read-only after finalization, so
/// concurrent readers need no synchronization.
///

#[derive(Debug, PartialEq)]
pub struct ModelMeta {
    name: String,
    namespace: String,
    fields: Vec<FieldModel>,
    hash: ModelHash,
}

impl ModelMeta {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage namespace used on the backend wire.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldModel] {
        &self.fields
    }

    #[must_use]
    pub const fn hash(&self) -> ModelHash {
        self.hash
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Forge metadata with an explicit hash, to simulate hash collisions.
    #[cfg(test)]
    pub(crate) fn forge(name: &str, fields: Vec<FieldModel>, hash: ModelHash) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            namespace: canonical_namespace(name),
            fields,
            hash,
        })
    }

    /// Structural identity: same name and field signature.
    ///
    /// This is the check the registry uses to distinguish idempotent
    /// re-registration from a hash bound to a different declaration.
    #[must_use]
    pub fn same_structure(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl Display for ModelMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.hash)
    }
}

/// Canonical storage namespace: lowercased model name, with anything
/// outside `[a-z0-9]` folded to `_`.
fn canonical_namespace(name: &str) -> String {
    name.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() { c } else { '_' }
        })
        .collect()
}
