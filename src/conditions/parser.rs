//! condition parser - converts JSON to condition AST
//!
//! supports:
//! - plain values: equality by string form
//! - comparison operators: gt, lt, gte, lte
//! - set operator: in
//! - logical operators: and, or (a mapping of operator -> operand; sequences
//!   and strings expand by index, anything else never matches)
//!
//! every JSON value parses to some condition. only the criteria root can be
//! rejected, when it is not a mapping.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as JsonValue};

use super::types::{CompareOp, Condition, Criteria};

/// operator keys in the order they are looked up in an operator object
pub const OPERATOR_PRIORITY: [&str; 7] = ["gt", "lt", "gte", "lte", "in", "and", "or"];

/// error type for parsing criteria
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", describe(.path, .message))]
pub struct ParseError {
    pub message: String,
    pub path: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: path.into(),
        }
    }
}

fn describe(path: &str, message: &str) -> String {
    if path.is_empty() {
        message.to_string()
    } else {
        format!("{}: {}", path, message)
    }
}

/// parse a criteria set (a mapping of dotted path -> condition)
///
/// # Returns
/// * `Ok(Criteria)` - one entry per key of the mapping
/// * `Err(ParseError)` - if the JSON is not a mapping
pub fn parse_criteria(json: &JsonValue) -> Result<Criteria, ParseError> {
    parse_criteria_at(json, "")
}

/// parse a criteria set found at `path` inside a larger document
pub fn parse_criteria_at(json: &JsonValue, path: &str) -> Result<Criteria, ParseError> {
    let obj = json.as_object().ok_or_else(|| {
        tracing::debug!(path, kind = kind_of(json), "criteria root is not a mapping");
        ParseError::new(
            format!("criteria must be an object, got {}", kind_of(json)),
            path,
        )
    })?;

    Ok(obj
        .iter()
        .map(|(field, condition)| (field.clone(), parse_condition(condition)))
        .collect())
}

/// parse a JSON value into a condition AST
pub fn parse_condition(json: &JsonValue) -> Condition {
    match json {
        JsonValue::Object(obj) => parse_object(obj),
        other => Condition::Literal(other.clone()),
    }
}

fn parse_object(obj: &Map<String, JsonValue>) -> Condition {
    let found = OPERATOR_PRIORITY
        .iter()
        .find_map(|key| obj.get(*key).and_then(|value| parse_operator(key, value)));

    found.unwrap_or_else(|| {
        tracing::debug!(
            keys = ?obj.keys().collect::<Vec<_>>(),
            "no recognized operator, comparing by string form"
        );
        Condition::Opaque(JsonValue::Object(obj.clone()))
    })
}

/// parse a single `operator: operand` pair, `None` for unknown operators
fn parse_operator(key: &str, value: &JsonValue) -> Option<Condition> {
    if let Some(op) = CompareOp::parse(key) {
        return Some(Condition::Compare {
            op,
            bound: value.clone(),
        });
    }

    match key {
        "in" => Some(parse_in(value)),
        "and" => Some(parse_logical(key, value, Condition::And)),
        "or" => Some(parse_logical(key, value, Condition::Or)),
        _ => None,
    }
}

fn parse_in(value: &JsonValue) -> Condition {
    match value {
        JsonValue::Array(candidates) => Condition::In(candidates.clone()),
        other => {
            tracing::debug!(kind = kind_of(other), "'in' expects an array, nothing can match");
            Condition::In(vec![])
        }
    }
}

/// each entry of an and/or payload becomes its own single-key condition
///
/// sequences and strings expand by index (`{"0": ...}`), which lands on the
/// opaque fallback. a payload with no entries to expand never matches, so a
/// malformed `and` cannot pass vacuously. only an empty mapping does.
fn parse_logical(
    op: &str,
    value: &JsonValue,
    build: fn(Vec<Condition>) -> Condition,
) -> Condition {
    let operands: Vec<Condition> = match value {
        JsonValue::Object(obj) => {
            return build(
                obj.iter()
                    .map(|(key, operand)| {
                        parse_operator(key, operand).unwrap_or_else(|| single_key(key, operand))
                    })
                    .collect(),
            )
        }
        JsonValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, operand)| single_key(&i.to_string(), operand))
            .collect(),
        JsonValue::String(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| single_key(&i.to_string(), &JsonValue::String(c.to_string())))
            .collect(),
        _ => Vec::new(),
    };

    if operands.is_empty() {
        tracing::debug!(op, kind = kind_of(value), "operands have no entries, never matches");
        let mut payload = Map::new();
        payload.insert(op.to_string(), value.clone());
        return Condition::Invalid(JsonValue::Object(payload));
    }

    tracing::debug!(op, kind = kind_of(value), "operands expanded by index");
    build(operands)
}

fn single_key(key: &str, operand: &JsonValue) -> Condition {
    let mut single = Map::new();
    single.insert(key.to_string(), operand.clone());
    parse_object(&single)
}

fn kind_of(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

impl From<&JsonValue> for Condition {
    fn from(json: &JsonValue) -> Self {
        parse_condition(json)
    }
}

impl TryFrom<&JsonValue> for Criteria {
    type Error = ParseError;

    fn try_from(json: &JsonValue) -> Result<Self, Self::Error> {
        parse_criteria(json)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Ok(parse_condition(&json))
    }
}

impl<'de> Deserialize<'de> for Criteria {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        parse_criteria(&json).map_err(serde::de::Error::custom)
    }
}
