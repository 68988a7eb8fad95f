// src/expect.rs - Reusable response assertions

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt::Debug;

use crate::error::{Result, SuiteError};

/// Whether letter case takes part in ordering after all else is equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    /// Case differences break ties, lowercase first.
    Tertiary,
    /// Case differences are ignored.
    Base,
}

pub fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(SuiteError::Expectation(message.into()))
    }
}

pub fn ensure_eq<T>(actual: T, expected: T, what: &str) -> Result<()>
where
    T: PartialEq + Debug,
{
    ensure(
        actual == expected,
        format!("{}: expected {:?}, got {:?}", what, expected, actual),
    )
}

fn object<'a>(value: &'a Value, what: &str) -> Result<&'a serde_json::Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| SuiteError::Expectation(format!("{} is not a JSON object: {}", what, value)))
}

/// The object's keys, sorted, equal `expected` sorted.
pub fn expect_keys_exactly(value: &Value, expected: &[&str]) -> Result<()> {
    let mut actual: Vec<&str> = object(value, "value")?.keys().map(String::as_str).collect();
    actual.sort_unstable();
    let mut expected = expected.to_vec();
    expected.sort_unstable();
    ensure(
        actual == expected,
        format!("keys: expected {:?}, got {:?}", expected, actual),
    )
}

/// The object has at least the keys in `expected`.
pub fn expect_keys_contain(value: &Value, expected: &[&str]) -> Result<()> {
    let map = object(value, "value")?;
    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|key| !map.contains_key(*key))
        .collect();
    ensure(
        missing.is_empty(),
        format!("missing keys {:?} in {:?}", missing, map.keys().collect::<Vec<_>>()),
    )
}

pub fn expect_number(value: &Value, field: &str) -> Result<f64> {
    value
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| SuiteError::Expectation(format!("'{}' is not a number", field)))
}

pub fn expect_string<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| SuiteError::Expectation(format!("'{}' is not a string", field)))
}

pub fn expect_object_field<'a>(
    value: &'a Value,
    field: &str,
) -> Result<&'a serde_json::Map<String, Value>> {
    let inner = value
        .get(field)
        .ok_or_else(|| SuiteError::Expectation(format!("'{}' is missing", field)))?;
    object(inner, field)
}

pub fn expect_array_field<'a>(value: &'a Value, field: &str) -> Result<&'a Vec<Value>> {
    value
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| SuiteError::Expectation(format!("'{}' is not an array", field)))
}

/// JavaScript-style truthiness of a field: present, not null, false, 0 or "".
pub fn expect_truthy(value: &Value, field: &str) -> Result<()> {
    let truthy = match value.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    };
    ensure(truthy, format!("'{}' is not truthy", field))
}

/// The field holds an RFC 3339 timestamp.
pub fn expect_rfc3339(value: &Value, field: &str) -> Result<DateTime<FixedOffset>> {
    let raw = expect_string(value, field)?;
    DateTime::parse_from_rfc3339(raw).map_err(|e| {
        SuiteError::Expectation(format!(
            "'{}' is not an RFC 3339 timestamp ({}): {}",
            field, raw, e
        ))
    })
}

/// Values are already in [`natural_cmp`] order.
pub fn expect_sorted_natural<S: AsRef<str>>(values: &[S], case: CaseSensitivity) -> Result<()> {
    let actual: Vec<&str> = values.iter().map(|s| s.as_ref()).collect();
    let mut sorted = actual.clone();
    sorted.sort_by(|a, b| natural_cmp(a, b, case));
    ensure(
        actual == sorted,
        format!("not in natural order: {:?}, expected {:?}", actual, sorted),
    )
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    Symbol(char),
    Number(u128, usize),
    Letter(String),
}

fn chunks(s: &str) -> Vec<(Chunk, String)> {
    let mut out = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            let mut digits = String::from(c);
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                digits.push(d);
                chars.next();
            }
            let trimmed = digits.trim_start_matches('0');
            let overflow = if trimmed.is_empty() { 0 } else { u128::MAX };
            let value = trimmed.parse::<u128>().unwrap_or(overflow);
            out.push((Chunk::Number(value, digits.len()), digits));
        } else if c.is_alphabetic() {
            out.push((Chunk::Letter(c.to_lowercase().collect()), c.to_string()));
        } else {
            out.push((Chunk::Symbol(c), c.to_string()));
        }
    }
    out
}

/// Locale-like comparison: digit runs compare by value, letters compare
/// case-insensitively first, symbols sort before digits and digits before
/// letters.
pub fn natural_cmp(a: &str, b: &str, case: CaseSensitivity) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);

    let primary = left
        .iter()
        .map(|(key, _)| key)
        .cmp(right.iter().map(|(key, _)| key));
    if primary != Ordering::Equal || case == CaseSensitivity::Base {
        return primary;
    }

    for ((_, l), (_, r)) in left.iter().zip(right.iter()) {
        if l != r {
            // lowercase sorts before uppercase
            let l_upper = l.chars().any(char::is_uppercase);
            let r_upper = r.chars().any(char::is_uppercase);
            return l_upper.cmp(&r_upper).then_with(|| l.cmp(r));
        }
    }
    Ordering::Equal
}
