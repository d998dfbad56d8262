//! condition evaluator
//!
//! evaluates parsed conditions against values extracted from a record

use std::cmp::Ordering;

use serde_json::Value as JsonValue;

use super::coerce;
use super::parser::{parse_criteria, ParseError};
use super::resolve::{resolve, Resolved};
use super::types::{CompareOp, Condition, Criteria};

/// check a record against a criteria set
///
/// every (path, condition) entry must match; an empty criteria set matches
/// every record.
pub fn is_eligible(record: &JsonValue, criteria: &Criteria) -> bool {
    criteria
        .iter()
        .all(|(path, condition)| matches(&resolve(record, path), condition))
}

/// evaluate a condition against a resolved value
///
/// sequences match when at least one element matches.
pub fn matches(value: &Resolved<'_>, condition: &Condition) -> bool {
    match value {
        Resolved::Missing => matches_value(None, condition),
        Resolved::Found(JsonValue::Array(items)) => items
            .iter()
            .any(|item| matches_value(Some(item), condition)),
        Resolved::Found(v) => matches_value(Some(*v), condition),
        Resolved::Projected(items) => items.iter().any(|item| matches_value(*item, condition)),
    }
}

/// evaluate a condition against a single value (`None` = absent)
pub fn matches_value(value: Option<&JsonValue>, condition: &Condition) -> bool {
    match condition {
        Condition::Literal(expected) | Condition::Opaque(expected) => {
            coerce::loose_eq(value, Some(expected))
        }
        Condition::Compare { op, bound } => compare(*op, value, bound),
        Condition::In(candidates) => {
            let actual = coerce::to_string(value);
            candidates
                .iter()
                .any(|candidate| coerce::to_string(Some(candidate)) == actual)
        }
        // empty And = true (vacuous truth)
        Condition::And(conditions) => conditions.iter().all(|c| matches_value(value, c)),
        // empty Or = false
        Condition::Or(conditions) => conditions.iter().any(|c| matches_value(value, c)),
        Condition::Invalid(_) => false,
    }
}

fn compare(op: CompareOp, actual: Option<&JsonValue>, bound: &JsonValue) -> bool {
    let ordering = coerce::compare(actual, Some(bound));

    match op {
        CompareOp::Gt => ordering == Some(Ordering::Greater),
        CompareOp::Lt => ordering == Some(Ordering::Less),
        CompareOp::Gte => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        CompareOp::Lte => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
    }
}

/// stateless entry point for callers that prefer an object to free functions
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityService;

impl EligibilityService {
    pub fn new() -> Self {
        Self
    }

    /// check a cart against parsed criteria
    pub fn is_eligible(&self, cart: &JsonValue, criteria: &Criteria) -> bool {
        is_eligible(cart, criteria)
    }

    /// parse raw criteria JSON and check a cart against it
    pub fn check(&self, cart: &JsonValue, criteria: &JsonValue) -> Result<bool, ParseError> {
        let criteria = parse_criteria(criteria)?;
        Ok(is_eligible(cart, &criteria))
    }

    /// value at a dotted path of the cart
    pub fn cart_value<'a>(&self, cart: &'a JsonValue, key: &str) -> Resolved<'a> {
        resolve(cart, key)
    }

    /// check an already extracted value against a condition
    pub fn matches_condition(&self, value: &Resolved<'_>, condition: &Condition) -> bool {
        matches(value, condition)
    }
}
