//! Pure predicate, ordering, and pagination semantics.
//!
//! These functions interpret a validated `QuerySpec` against decoded field
//! maps. The in-memory backend uses them directly; remote drivers are
//! expected to implement equivalent semantics server-side.

use crate::{
    key::Key,
    query::spec::{CompareOp, Filter, OrderDirection, OrderSpec, PageSpec},
    value::FieldMap,
};
use std::cmp::Ordering;

/// Whether one record satisfies a single predicate.
///
/// Absent fields read as `Null`. Cross-kind or unordered comparisons fail
/// the predicate rather than erroring: validation already restricted specs
/// to well-formed field/operator/value combinations.
#[must_use]
pub fn matches(filter: &Filter, values: &FieldMap) -> bool {
    let actual = values.value_or_null(&filter.field);

    match filter.op {
        CompareOp::Eq => actual == filter.value,
        CompareOp::Ne => actual != filter.value,
        CompareOp::Lt => actual.compare(&filter.value) == Some(Ordering::Less),
        CompareOp::Lte => matches!(
            actual.compare(&filter.value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Gt => actual.compare(&filter.value) == Some(Ordering::Greater),
        CompareOp::Gte => matches!(
            actual.compare(&filter.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::Contains => actual.text_contains(&filter.value),
        CompareOp::StartsWith => actual.text_starts_with(&filter.value),
    }
}

/// Conjunction over every filter in a spec.
#[must_use]
pub fn matches_all(filters: &[Filter], values: &FieldMap) -> bool {
    filters.iter().all(|filter| matches(filter, values))
}

/// Sort rows by the order spec, with the primary key as tiebreaker so
/// materialization order is deterministic.
pub fn apply_order(rows: &mut [(Key, FieldMap)], order: &OrderSpec) {
    rows.sort_by(|(a_key, a), (b_key, b)| {
        let a_value = a.value_or_null(&order.field);
        let b_value = b.value_or_null(&order.field);

        let by_field = a_value.compare(&b_value).unwrap_or(Ordering::Equal);
        let by_field = match order.direction {
            OrderDirection::Asc => by_field,
            OrderDirection::Desc => by_field.reverse(),
        };

        by_field.then_with(|| a_key.cmp(b_key))
    });
}

/// Apply offset/limit bounds to an ordered row set.
#[must_use]
pub fn apply_page(rows: Vec<(Key, FieldMap)>, page: &PageSpec) -> Vec<(Key, FieldMap)> {
    let offset = page.offset as usize;
    let iter = rows.into_iter().skip(offset);

    match page.limit {
        Some(limit) => iter.take(limit as usize).collect(),
        None => iter.collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn row(name: &str, strike: i64) -> FieldMap {
        [
            ("name".to_string(), Value::Text(name.to_string())),
            ("strike".to_string(), Value::Int(strike)),
        ]
        .into_iter()
        .collect()
    }

    fn filter(field: &str, op: CompareOp, value: Value) -> Filter {
        Filter {
            field: field.to_string(),
            op,
            value,
        }
    }

    #[test]
    fn equality_and_range_predicates() {
        let values = row("erz12", 100);

        assert!(matches(
            &filter("name", CompareOp::Eq, Value::Text("erz12".into())),
            &values
        ));
        assert!(matches(
            &filter("strike", CompareOp::Gte, Value::Int(100)),
            &values
        ));
        assert!(!matches(
            &filter("strike", CompareOp::Lt, Value::Int(100)),
            &values
        ));
    }

    #[test]
    fn absent_fields_read_as_null() {
        let values = row("erz12", 100);

        assert!(matches(
            &filter("ccy", CompareOp::Eq, Value::Null),
            &values
        ));
        assert!(!matches(
            &filter("ccy", CompareOp::Eq, Value::Text("EUR".into())),
            &values
        ));
    }

    #[test]
    fn text_predicates_apply_to_text_only() {
        let values = row("erz12", 100);

        assert!(matches(
            &filter("name", CompareOp::StartsWith, Value::Text("erz".into())),
            &values
        ));
        assert!(!matches(
            &filter("strike", CompareOp::Contains, Value::Text("1".into())),
            &values
        ));
    }

    #[test]
    fn ordering_is_deterministic_with_key_tiebreak() {
        let mut rows = vec![
            (Key::new(2), row("b", 1)),
            (Key::new(1), row("b", 1)),
            (Key::new(3), row("a", 2)),
        ];

        apply_order(
            &mut rows,
            &OrderSpec {
                field: "name".to_string(),
                direction: OrderDirection::Asc,
            },
        );

        let keys: Vec<u64> = rows.iter().map(|(k, _)| k.get()).collect();
        assert_eq!(keys, vec![3, 1, 2], "equal sort keys fall back to pk order");
    }

    #[test]
    fn paging_applies_offset_then_limit() {
        let rows = vec![
            (Key::new(1), row("a", 1)),
            (Key::new(2), row("b", 2)),
            (Key::new(3), row("c", 3)),
        ];

        let page = apply_page(
            rows,
            &PageSpec {
                limit: Some(1),
                offset: 1,
            },
        );

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].0, Key::new(2));
    }
}
