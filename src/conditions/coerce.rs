//! loose-typing helpers used by the matcher
//!
//! record data is compared the way a dynamically typed host would compare it:
//! equality goes through the string form of both sides, ordering goes through
//! strings when both sides are strings and through numbers otherwise.
//!
//! `None` stands for an absent value (a path that did not resolve).

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::{Number, Value as JsonValue};

/// string form of any mapping
pub const OBJECT_STRING: &str = "[object Object]";

/// string form of an absent value
pub const UNDEFINED_STRING: &str = "undefined";

/// a value reduced to a primitive
#[derive(Debug, Clone, PartialEq)]
enum Primitive<'a> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Cow<'a, str>),
}

fn to_primitive(value: Option<&JsonValue>) -> Primitive<'_> {
    match value {
        None => Primitive::Undefined,
        Some(JsonValue::Null) => Primitive::Null,
        Some(JsonValue::Bool(b)) => Primitive::Bool(*b),
        Some(JsonValue::Number(n)) => Primitive::Number(n.as_f64().unwrap_or(f64::NAN)),
        Some(JsonValue::String(s)) => Primitive::Str(Cow::Borrowed(s)),
        Some(JsonValue::Array(items)) => Primitive::Str(Cow::Owned(join(items))),
        Some(JsonValue::Object(_)) => Primitive::Str(Cow::Borrowed(OBJECT_STRING)),
    }
}

/// sequence elements joined with commas, null elements rendered empty
fn join(items: &[JsonValue]) -> String {
    items
        .iter()
        .map(|item| match item {
            JsonValue::Null => String::new(),
            other => to_string(Some(other)),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// string form of a value
pub fn to_string(value: Option<&JsonValue>) -> String {
    match value {
        Some(JsonValue::Number(n)) => number_to_string(n),
        _ => match to_primitive(value) {
            Primitive::Undefined => UNDEFINED_STRING.to_string(),
            Primitive::Null => "null".to_string(),
            Primitive::Bool(b) => b.to_string(),
            Primitive::Number(n) => format_f64(n),
            Primitive::Str(s) => s.into_owned(),
        },
    }
}

fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        format_f64(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// shortest round-trip form of a float, integers without a fraction,
/// exponent notation outside [1e-6, 1e21)
pub fn format_f64(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{}", n);
    }

    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => formatted,
    }
}

/// numeric form of a value; NaN when it has none
pub fn to_number(value: Option<&JsonValue>) -> f64 {
    primitive_to_number(&to_primitive(value))
}

fn primitive_to_number(p: &Primitive<'_>) -> f64 {
    match p {
        Primitive::Undefined => f64::NAN,
        Primitive::Null => 0.0,
        Primitive::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Primitive::Number(n) => *n,
        Primitive::Str(s) => string_to_number(s),
    }
}

fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// parse a numeric string literal (decimal, 0x/0o/0b integers, Infinity)
pub fn string_to_number(s: &str) -> f64 {
    let s = s.trim_matches(is_trimmable);
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix_prefixed = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)];
    for (prefix, radix) in radix_prefixed {
        if let Some(digits) = s.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }

    if is_decimal_literal(s) {
        s.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

/// `[+-] digits [. digits] [(e|E) [+-] digits]` with at least one mantissa digit
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }

    if mantissa_digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// equality through the string form of both sides
pub fn loose_eq(lhs: Option<&JsonValue>, rhs: Option<&JsonValue>) -> bool {
    to_string(lhs) == to_string(rhs)
}

/// ordering between two values
///
/// two strings compare by UTF-16 code units, anything else compares
/// numerically. `None` when either side has no numeric form.
pub fn compare(lhs: Option<&JsonValue>, rhs: Option<&JsonValue>) -> Option<Ordering> {
    let lhs = to_primitive(lhs);
    let rhs = to_primitive(rhs);

    if let (Primitive::Str(a), Primitive::Str(b)) = (&lhs, &rhs) {
        return Some(a.encode_utf16().cmp(b.encode_utf16()));
    }

    primitive_to_number(&lhs).partial_cmp(&primitive_to_number(&rhs))
}
