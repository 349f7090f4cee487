use crate::{
    key::Key,
    model::{field::FieldKind, meta::ModelMeta},
    value::Value,
};
use std::{
    fmt::{self, Display},
    sync::Arc,
};
use thiserror::Error as ThisError;

///
/// QueryError
///

#[derive(Debug, ThisError)]
pub enum QueryError {
    #[error("unknown field '{field}' on model '{model}'")]
    UnknownField { model: String, field: String },

    #[error("operator {op} is not supported for field '{field}' of kind {kind}")]
    UnsupportedOperator {
        field: String,
        op: CompareOp,
        kind: FieldKind,
    },

    #[error("predicate value for field '{field}' does not match kind {kind}")]
    ValueKindMismatch { field: String, kind: FieldKind },

    #[error("no record matches the query")]
    DoesNotExist,

    #[error("{count} records match a single-result query")]
    MultipleInstancesFound { count: usize },
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    StartsWith,
}

impl CompareOp {
    /// Whether this operator requires an ordered field kind.
    #[must_use]
    pub const fn is_range(self) -> bool {
        matches!(self, Self::Lt | Self::Lte | Self::Gt | Self::Gte)
    }

    /// Whether this operator applies to text fields only.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Contains | Self::StartsWith)
    }
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
        })
    }
}

///
/// Filter
///
/// One validated predicate: field, operator, comparison value.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

///
/// OrderSpec
///

#[derive(Clone, Debug, PartialEq)]
pub struct OrderSpec {
    pub field: String,
    pub direction: OrderDirection,
}

///
/// PageSpec
///

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageSpec {
    pub limit: Option<u32>,
    pub offset: u32,
}

///
/// QuerySpec
///
/// Immutable filter/order/pagination specification bound to one model.
///
/// Every chaining operation validates eagerly against the bound metadata
/// and returns a *new* specification; an existing spec is never mutated.
/// Specs are therefore safe to hold and reuse as templates. Construction
/// and chaining perform no backend I/O.
///

#[derive(Clone, Debug)]
pub struct QuerySpec {
    meta: Arc<ModelMeta>,
    key_bound: Option<Key>,
    filters: Vec<Filter>,
    order: Option<OrderSpec>,
    page: Option<PageSpec>,
}

impl QuerySpec {
    /// Empty specification over one model: matches every record.
    #[must_use]
    pub fn new(meta: &Arc<ModelMeta>) -> Self {
        Self {
            meta: Arc::clone(meta),
            key_bound: None,
            filters: Vec::new(),
            order: None,
            page: None,
        }
    }

    #[must_use]
    pub const fn meta(&self) -> &Arc<ModelMeta> {
        &self.meta
    }

    /// Primary-key point bound, if one was set.
    #[must_use]
    pub const fn key_bound(&self) -> Option<Key> {
        self.key_bound
    }

    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    #[must_use]
    pub const fn order(&self) -> Option<&OrderSpec> {
        self.order.as_ref()
    }

    #[must_use]
    pub const fn page(&self) -> Option<&PageSpec> {
        self.page.as_ref()
    }

    /// Restrict the spec to one primary key (point lookup).
    #[must_use]
    pub fn by_key(&self, key: Key) -> Self {
        let mut next = self.clone();
        next.key_bound = Some(key);
        next
    }

    /// Append one predicate, validating field and operator support.
    pub fn filter(
        &self,
        field: &str,
        op: CompareOp,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        let value = value.into();
        let kind = self.field_kind(field)?;

        if (op.is_range() && !kind.is_ordered()) || (op.is_text() && !kind.is_text()) {
            return Err(QueryError::UnsupportedOperator {
                field: field.to_string(),
                op,
                kind: kind.clone(),
            });
        }

        // Null comparisons are meaningful for eq/ne only.
        let null_ok = matches!(op, CompareOp::Eq | CompareOp::Ne);
        if !kind.admits(&value) || (value.is_null() && !null_ok) {
            return Err(QueryError::ValueKindMismatch {
                field: field.to_string(),
                kind: kind.clone(),
            });
        }

        let mut next = self.clone();
        next.filters.push(Filter {
            field: field.to_string(),
            op,
            value,
        });
        Ok(next)
    }

    /// Set an ascending sort key.
    pub fn order_by(&self, field: &str) -> Result<Self, QueryError> {
        self.order_with(field, OrderDirection::Asc)
    }

    /// Set a descending sort key.
    pub fn order_by_desc(&self, field: &str) -> Result<Self, QueryError> {
        self.order_with(field, OrderDirection::Desc)
    }

    fn order_with(&self, field: &str, direction: OrderDirection) -> Result<Self, QueryError> {
        let kind = self.field_kind(field)?;
        if !kind.is_ordered() {
            return Err(QueryError::UnsupportedOperator {
                field: field.to_string(),
                op: CompareOp::Lt,
                kind: kind.clone(),
            });
        }

        let mut next = self.clone();
        next.order = Some(OrderSpec {
            field: field.to_string(),
            direction,
        });
        Ok(next)
    }

    /// Set or replace the result limit.
    #[must_use]
    pub fn limit(&self, n: u32) -> Self {
        let mut next = self.clone();
        let mut page = next.page.unwrap_or_default();
        page.limit = Some(n);
        next.page = Some(page);
        next
    }

    /// Set or replace the result offset.
    #[must_use]
    pub fn offset(&self, n: u32) -> Self {
        let mut next = self.clone();
        let mut page = next.page.unwrap_or_default();
        page.offset = n;
        next.page = Some(page);
        next
    }

    fn field_kind(&self, field: &str) -> Result<&FieldKind, QueryError> {
        self.meta
            .field(field)
            .map(crate::model::field::FieldModel::kind)
            .ok_or_else(|| QueryError::UnknownField {
                model: self.meta.name().to_string(),
                field: field.to_string(),
            })
    }
}
