//! Predicate evaluation against an attribute map.
//!
//! Lets callers (and the test suite) check a record against a condition
//! tree or a flattened subquery without involving the storage backend.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::condition::{AttrKey, Condition, Relation, RelationOp};
use crate::value::PropValue;

/// Attribute values of one record, keyed the same way relations are.
pub type PropMap = HashMap<AttrKey, PropValue>;

/// Recursively evaluate a condition tree against record attributes.
pub fn condition_evaluate(condition: &Condition, record: &PropMap) -> bool {
    match condition {
        Condition::Relation(relation) => relation_evaluate(relation, record),
        Condition::And(left, right) => {
            condition_evaluate(left, record) && condition_evaluate(right, record)
        }
        Condition::Or(left, right) => {
            condition_evaluate(left, record) || condition_evaluate(right, record)
        }
    }
}

/// Evaluate one relation against record attributes. A record missing the
/// relation's key never matches.
pub fn relation_evaluate(relation: &Relation, record: &PropMap) -> bool {
    let Some(actual) = record.get(&relation.key) else {
        return false;
    };
    match relation.op {
        RelationOp::Eq => actual == &relation.value,
        RelationOp::Neq => actual != &relation.value,
        RelationOp::Gt => number_test(actual, &relation.value, Ordering::is_gt),
        RelationOp::Gte => number_test(actual, &relation.value, Ordering::is_ge),
        RelationOp::Lt => number_test(actual, &relation.value, Ordering::is_lt),
        RelationOp::Lte => number_test(actual, &relation.value, Ordering::is_le),
        RelationOp::In => list_contains(&relation.value, actual),
        RelationOp::NotIn => !list_contains(&relation.value, actual),
        RelationOp::Contains => list_contains(actual, &relation.value),
        // Backend-interpreted operators, not evaluatable here.
        RelationOp::ContainsKey | RelationOp::Scan => false,
    }
}

fn number_test(actual: &PropValue, expected: &PropValue, test: fn(Ordering) -> bool) -> bool {
    match (actual.as_number(), expected.as_number()) {
        (Some(actual), Some(expected)) => test(actual.total_cmp(&expected)),
        _ => false,
    }
}

fn list_contains(list: &PropValue, value: &PropValue) -> bool {
    match list {
        PropValue::List(values) => values.contains(value),
        _ => false,
    }
}
