//! dotted-path resolution against a record
//!
//! a path is walked one segment at a time from the record root. the first time
//! the walk lands on a sequence it stops descending: the next segment is read
//! from every element and the walk ends there, so `items.cat.code` on an
//! `items` array yields each element's `cat` and never looks at `code`.

use serde_json::Value as JsonValue;

/// result of resolving a path
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// the path does not exist in the record
    Missing,
    /// the value found at the end of the path
    Found(&'a JsonValue),
    /// one entry per element of the first sequence met on the way
    Projected(Vec<Option<&'a JsonValue>>),
}

impl<'a> Resolved<'a> {
    /// the resolved value when it is a single value
    pub fn value(&self) -> Option<&'a JsonValue> {
        match self {
            Resolved::Found(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Resolved::Missing)
    }

    /// owned JSON form, with absent projection entries as null
    pub fn to_json(&self) -> JsonValue {
        match self {
            Resolved::Missing => JsonValue::Null,
            Resolved::Found(v) => (*v).clone(),
            Resolved::Projected(items) => JsonValue::Array(
                items
                    .iter()
                    .map(|item| item.cloned().unwrap_or(JsonValue::Null))
                    .collect(),
            ),
        }
    }
}

/// resolve a dotted path against a record
pub fn resolve<'a>(record: &'a JsonValue, path: &str) -> Resolved<'a> {
    let mut current = record;

    for part in path.split('.') {
        if let JsonValue::Array(items) = current {
            tracing::trace!(
                path,
                segment = part,
                len = items.len(),
                "projecting over sequence"
            );
            return Resolved::Projected(items.iter().map(|item| project(item, part)).collect());
        }

        if is_falsy(current) {
            tracing::trace!(path, segment = part, "path stops at an empty value");
            return Resolved::Missing;
        }

        match current {
            JsonValue::Object(map) => match map.get(part) {
                Some(next) => current = next,
                None => {
                    tracing::trace!(path, segment = part, "segment not found");
                    return Resolved::Missing;
                }
            },
            _ => {
                tracing::trace!(path, segment = part, "segment applied to a scalar");
                return Resolved::Missing;
            }
        }
    }

    Resolved::Found(current)
}

/// read a single field from a sequence element
fn project<'a>(item: &'a JsonValue, part: &str) -> Option<&'a JsonValue> {
    match item {
        JsonValue::Object(map) => map.get(part),
        JsonValue::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn is_falsy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64().map(|f| f == 0.0 || f.is_nan()).unwrap_or(false),
        JsonValue::String(s) => s.is_empty(),
        _ => false,
    }
}
