//! Per-kind comparison of a record value against a query literal
//!
//! A comparison against a missing field, a `null`, or a value of the wrong
//! JSON type is false for every operator, `!=` included.

use crate::query::parser::ast::{Comparison, FieldValue, Operator};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::net::IpAddr;

/// Evaluate one comparison leaf against a JSON record
pub fn comparison_matches(comparison: &Comparison, record: &Value, now: DateTime<Utc>) -> bool {
    let actual = match record.get(comparison.field.name) {
        Some(Value::Null) | None => return false,
        Some(actual) => actual,
    };

    match (comparison.operator, &comparison.value) {
        (Operator::In, FieldValue::List(items)) => items
            .iter()
            .any(|item| compare(Operator::Equal, item, actual, now) == Some(true)),
        (operator, expected) => compare(operator, expected, actual, now).unwrap_or(false),
    }
}

/// `None` when the record value cannot be compared with the literal
fn compare(
    operator: Operator,
    expected: &FieldValue,
    actual: &Value,
    now: DateTime<Utc>,
) -> Option<bool> {
    match expected {
        FieldValue::Text(text) => compare_text(operator, text, actual.as_str()?),
        FieldValue::Number(number) => {
            let ordering = number_of(actual)?.partial_cmp(number)?;
            ordered(operator, ordering)
        }
        FieldValue::Enum(value) => equality(operator, actual.as_str()?.eq_ignore_ascii_case(value)),
        FieldValue::Ip(matcher) => {
            let addr: IpAddr = actual.as_str()?.trim().parse().ok()?;
            equality(operator, matcher.contains(addr))
        }
        FieldValue::Duration(duration) => {
            let seen = DateTime::parse_from_rfc3339(actual.as_str()?).ok()?;
            let age = now.signed_duration_since(seen.with_timezone(&Utc));
            ordered(operator, age.cmp(&duration.as_chrono()?))
        }
        FieldValue::List(_) => None,
    }
}

fn compare_text(operator: Operator, expected: &str, actual: &str) -> Option<bool> {
    let expected = expected.to_lowercase();
    let actual = actual.to_lowercase();

    match operator {
        Operator::Equal => Some(actual == expected),
        Operator::NotEqual => Some(actual != expected),
        Operator::Contains => Some(actual.contains(&expected)),
        Operator::StartsWith => Some(actual.starts_with(&expected)),
        _ => None,
    }
}

/// JSON numbers, or strings holding a numeral
fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn ordered(operator: Operator, ordering: Ordering) -> Option<bool> {
    match operator {
        Operator::Equal => Some(ordering == Ordering::Equal),
        Operator::NotEqual => Some(ordering != Ordering::Equal),
        Operator::GreaterThan => Some(ordering == Ordering::Greater),
        Operator::LessThan => Some(ordering == Ordering::Less),
        Operator::GreaterThanOrEqual => Some(ordering != Ordering::Less),
        Operator::LessThanOrEqual => Some(ordering != Ordering::Greater),
        _ => None,
    }
}

fn equality(operator: Operator, equal: bool) -> Option<bool> {
    match operator {
        Operator::Equal => Some(equal),
        Operator::NotEqual => Some(!equal),
        _ => None,
    }
}
