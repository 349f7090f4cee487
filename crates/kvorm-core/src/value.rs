use crate::{key::Key, model::hash::ModelHash};
use chrono::NaiveDate;
use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap, fmt};

///
/// Value
///
/// Store-native scalar carried by instance fields, query predicates,
/// and the backend wire encoding.
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Ref { model: ModelHash, key: Key },
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Stable label used in diagnostics and error messages.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::Ref { .. } => "ref",
        }
    }

    /// Same-kind ordering used by range predicates and result ordering.
    ///
    /// Cross-kind comparisons and `Ref` ranges have no defined order and
    /// return `None`; equality still works through `PartialEq`.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => Some(a.total_cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Substring containment; defined for text values only.
    #[must_use]
    pub fn text_contains(&self, needle: &Self) -> bool {
        match (self, needle) {
            (Self::Text(haystack), Self::Text(needle)) => haystack.contains(needle.as_str()),
            _ => false,
        }
    }

    /// Prefix match; defined for text values only.
    #[must_use]
    pub fn text_starts_with(&self, prefix: &Self) -> bool {
        match (self, prefix) {
            (Self::Text(haystack), Self::Text(prefix)) => haystack.starts_with(prefix.as_str()),
            _ => false,
        }
    }
}

// Floats compare by total order so equality stays reflexive for stored rows.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b) == Ordering::Equal,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (
                Self::Ref { model: am, key: ak },
                Self::Ref {
                    model: bm,
                    key: bk,
                },
            ) => am == bm && ak == bk,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::Ref { model, key } => write!(f, "{model}.{key}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

///
/// FieldMap
///
/// Ordered field-name → value mapping. This is both the in-memory shape of
/// an instance's fields and the unit encoded onto the backend wire.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, PartialEq, Serialize, Deserialize)]
pub struct FieldMap(BTreeMap<String, Value>);

impl FieldMap {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Value for `field`, with absent fields read as `Null`.
    #[must_use]
    pub fn value_or_null(&self, field: &str) -> Value {
        self.0.get(field).cloned().unwrap_or(Value::Null)
    }

    /// Fields whose values differ from `baseline`, including fields present
    /// on only one side.
    #[must_use]
    pub fn diff(&self, baseline: &Self) -> Self {
        let mut out = Self::new();

        for (name, value) in &self.0 {
            if baseline.0.get(name) != Some(value) {
                out.insert(name.clone(), value.clone());
            }
        }
        for name in baseline.0.keys() {
            if !self.0.contains_key(name) {
                out.insert(name.clone(), Value::Null);
            }
        }

        out
    }

    /// Overlay `diff` onto this map, as a backend applies a commit.
    pub fn apply(&mut self, diff: &Self) {
        for (name, value) in &diff.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }
}

impl FromIterator<(String, Value)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_equality_is_total() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.5), Value::Float(0.25));
    }

    #[test]
    fn cross_kind_values_never_compare() {
        assert_eq!(Value::Int(1).compare(&Value::Text("1".into())), None);
        assert_ne!(Value::Int(1), Value::Text("1".into()));
    }

    #[test]
    fn diff_reports_changed_and_removed_fields() {
        let clean: FieldMap = [
            ("a".to_string(), Value::Int(1)),
            ("b".to_string(), Value::Int(2)),
        ]
        .into_iter()
        .collect();

        let mut current = clean.clone();
        current.insert("a".to_string(), Value::Int(9));
        current.remove("b");

        let diff = current.diff(&clean);
        assert_eq!(diff.value_or_null("a"), Value::Int(9));
        assert_eq!(
            diff.value_or_null("b"),
            Value::Null,
            "removed fields must diff to null"
        );
    }

    #[test]
    fn empty_diff_for_identical_maps() {
        let map: FieldMap = [("a".to_string(), Value::Int(1))].into_iter().collect();
        let same = map.clone();
        assert!(map.diff(&same).is_empty());
    }
}
