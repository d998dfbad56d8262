//! condition evaluation system for eligibility criteria
//!
//! provides:
//! - dotted path resolution through nested mappings, projecting one level
//!   over the first sequence met on the way
//! - literal equality by string form
//! - comparison operators: gt, lt, gte, lte
//! - set operator: in
//! - logical operators: and, or
//! - implicit AND across the entries of a criteria set
//!
//! evaluation never fails: missing paths and odd values just don't match.

mod coerce;
mod eval;
mod parser;
mod resolve;
mod types;

pub use coerce::{loose_eq, to_number, to_string as string_form};
pub use eval::{is_eligible, matches, matches_value, EligibilityService};
pub use parser::{
    parse_condition, parse_criteria, parse_criteria_at, ParseError, OPERATOR_PRIORITY,
};
pub use resolve::{resolve, Resolved};
pub use types::{CompareOp, Condition, Criteria};
