use crate::value::Value;
use std::fmt::{self, Display};

///
/// FieldKind
///
/// Semantic scalar kind of one declared field. The kind drives value
/// admission on writes and operator validation in query predicates.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Int,
    Float,
    Text,
    Date,
    /// Reference to another model, by declared model name.
    Ref { model: String },
}

impl FieldKind {
    /// Stable token fed into the structural hash.
    #[must_use]
    pub fn type_token(&self) -> String {
        match self {
            Self::Int => "int".to_string(),
            Self::Float => "float".to_string(),
            Self::Text => "text".to_string(),
            Self::Date => "date".to_string(),
            Self::Ref { model } => format!("ref:{model}"),
        }
    }

    /// Whether a value may be stored in a field of this kind.
    ///
    /// `Null` is always admitted at write time; required-field enforcement
    /// happens in the save pipeline, not here.
    #[must_use]
    pub const fn admits(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (Self::Int, Value::Int(_))
                | (Self::Float, Value::Float(_))
                | (Self::Text, Value::Text(_))
                | (Self::Date, Value::Date(_))
                | (Self::Ref { .. }, Value::Ref { .. })
        )
    }

    /// Whether this kind has a defined ordering for range predicates.
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        !matches!(self, Self::Ref { .. })
    }

    /// Whether text operators (contains / prefix) apply.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Text => f.write_str("text"),
            Self::Date => f.write_str("date"),
            Self::Ref { model } => write!(f, "ref:{model}"),
        }
    }
}

///
/// FieldModel
///
/// Declared, typed attribute of one model. Immutable once the model is
/// finalized; the builder methods below are declaration-time only.
///

#[derive(Clone, Debug, PartialEq)]
pub struct FieldModel {
    name: String,
    kind: FieldKind,
    unique: bool,
    required: bool,
    default: Option<Value>,
}

impl FieldModel {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            unique: false,
            required: false,
            default: None,
        }
    }

    /// Declare a per-field uniqueness constraint.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Require a non-null value at save time.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Default value applied when an instance is constructed.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

impl Display for FieldModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.kind)?;
        if self.unique {
            write!(f, " UNIQUE")?;
        }
        if self.required {
            write!(f, " REQUIRED")?;
        }
        Ok(())
    }
}
