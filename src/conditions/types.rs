//! core types for the condition system

use std::fmt;

use serde_json::Value as JsonValue;

/// ordinal comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// greater than: gt
    Gt,
    /// less than: lt
    Lt,
    /// greater than or equal: gte
    Gte,
    /// less than or equal: lte
    Lte,
}

impl CompareOp {
    /// parse operator from its object key
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gt" => Some(CompareOp::Gt),
            "lt" => Some(CompareOp::Lt),
            "gte" => Some(CompareOp::Gte),
            "lte" => Some(CompareOp::Lte),
            _ => None,
        }
    }

    /// the object key this operator is written as
    pub fn key(&self) -> &'static str {
        match self {
            CompareOp::Gt => "gt",
            CompareOp::Lt => "lt",
            CompareOp::Gte => "gte",
            CompareOp::Lte => "lte",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

/// the condition AST - one node of a criteria tree
///
/// the variant is decided once, when the JSON is parsed. an object carrying
/// several recognized keys becomes the variant of the first key in the order
/// `gt, lt, gte, lte, in, and, or`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// equality against the string form of a plain value
    Literal(JsonValue),
    /// ordinal comparison against a bound
    Compare { op: CompareOp, bound: JsonValue },
    /// set membership by string form
    In(Vec<JsonValue>),
    /// every sub-condition must hold for the same value
    And(Vec<Condition>),
    /// at least one sub-condition must hold for the same value
    Or(Vec<Condition>),
    /// an object without any recognized operator key
    Opaque(JsonValue),
    /// an `and`/`or` whose payload has no entries to expand; never matches
    Invalid(JsonValue),
}

impl Condition {
    /// create an equality condition
    pub fn literal(value: impl Into<JsonValue>) -> Self {
        Condition::Literal(value.into())
    }

    /// create a comparison condition
    pub fn compare(op: CompareOp, bound: impl Into<JsonValue>) -> Self {
        Condition::Compare {
            op,
            bound: bound.into(),
        }
    }

    /// create an 'in' condition
    pub fn is_in(candidates: Vec<JsonValue>) -> Self {
        Condition::In(candidates)
    }

    /// create an AND condition
    pub fn all(conditions: Vec<Condition>) -> Self {
        Condition::And(conditions)
    }

    /// create an OR condition
    pub fn any(conditions: Vec<Condition>) -> Self {
        Condition::Or(conditions)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, conditions: &[Condition]) -> fmt::Result {
    for (i, c) in conditions.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Literal(value) => write!(f, "== {}", value),
            Condition::Compare { op, bound } => write!(f, "{} {}", op, bound),
            Condition::In(candidates) => {
                write!(f, "in [")?;
                for (i, v) in candidates.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Condition::And(conditions) => {
                write!(f, "and(")?;
                write_list(f, conditions)?;
                write!(f, ")")
            }
            Condition::Or(conditions) => {
                write!(f, "or(")?;
                write_list(f, conditions)?;
                write!(f, ")")
            }
            Condition::Opaque(value) => write!(f, "== {}", value),
            Condition::Invalid(value) => write!(f, "invalid {}", value),
        }
    }
}

/// a full criteria set: dotted path -> condition, all of which must hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    entries: Vec<(String, Condition)>,
}

impl Criteria {
    /// create an empty criteria set (matches every record)
    pub fn new() -> Self {
        Self::default()
    }

    /// add a path/condition pair
    pub fn with(mut self, path: impl Into<String>, condition: Condition) -> Self {
        self.entries.push((path.into(), condition));
        self
    }

    /// iterate over (path, condition) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.entries.iter().map(|(p, c)| (p.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Condition)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (String, Condition)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all(")?;
        for (i, (path, condition)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", path, condition)?;
        }
        write!(f, ")")
    }
}
