//! Literal decoding and coercion of value tokens to a field's kind

use super::ast::{DurationValue, FieldValue, IpMatcher, Operator};
use super::errors::SyntaxError;
use super::lexer::Token;
use crate::query::schema::{FieldSpec, ValueKind};
use once_cell::sync::Lazy;
use regex::Regex;

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s*([smhdw])$").expect("duration pattern is valid")
});

/// A value token with quoting and list syntax removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Scalar(String),
    List(Vec<String>),
}

/// Decode a value token's text
pub fn read_value(token: &Token) -> Result<RawValue, SyntaxError> {
    let text = token.text.as_str();
    let position = token.start;

    match text.chars().next() {
        Some(quote @ ('"' | '\'')) => unquote(text, quote, position).map(RawValue::Scalar),
        Some('[') => read_list(text, position).map(RawValue::List),
        _ => Ok(RawValue::Scalar(text.to_string())),
    }
}

/// Strip the surrounding quotes and resolve backslash escapes
fn unquote(text: &str, quote: char, position: usize) -> Result<String, SyntaxError> {
    let mut value = String::new();
    let mut chars = text.chars().skip(1);

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(escaped) => value.push(escaped),
                None => break,
            },
            ch if ch == quote => {
                if chars.next().is_some() {
                    // the lexer ends a string at its closing quote
                    break;
                }
                return Ok(value);
            }
            ch => value.push(ch),
        }
    }

    Err(SyntaxError::UnterminatedString { position })
}

fn read_list(text: &str, position: usize) -> Result<Vec<String>, SyntaxError> {
    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(SyntaxError::UnterminatedList { position })?;

    if inner.trim().is_empty() {
        return Err(SyntaxError::EmptyList { position });
    }

    let malformed = |reason: &str| SyntaxError::MalformedList {
        reason: reason.to_string(),
        position,
    };

    let mut items = Vec::new();
    let mut chars = inner.char_indices().peekable();
    loop {
        while chars.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}

        let item = match chars.peek().copied() {
            None => return Err(malformed("trailing comma")),
            Some((start, quote @ ('"' | '\''))) => {
                chars.next();
                let mut escaped = false;
                let mut end = None;
                for (index, ch) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if ch == quote {
                        end = Some(index + ch.len_utf8());
                        break;
                    }
                }
                let end = end.ok_or(SyntaxError::UnterminatedString {
                    position: position + 1 + start,
                })?;
                unquote(&inner[start..end], quote, position + 1 + start)?
            }
            Some((start, _)) => {
                let mut end = inner.len();
                while let Some((index, ch)) = chars.peek().copied() {
                    if ch == ',' || ch.is_whitespace() {
                        end = index;
                        break;
                    }
                    chars.next();
                }
                let bare = &inner[start..end];
                if bare.is_empty() {
                    return Err(malformed("empty element"));
                }
                bare.to_string()
            }
        };
        items.push(item);

        while chars.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}
        match chars.next() {
            None => return Ok(items),
            Some((_, ',')) => continue,
            Some((_, ch)) => return Err(malformed(&format!("unexpected '{ch}' between elements"))),
        }
    }
}

/// Coerce a value token into the kind its field expects
pub fn coerce(
    field: &'static FieldSpec,
    operator: Operator,
    token: &Token,
) -> Result<FieldValue, SyntaxError> {
    let raw = read_value(token)?;

    match (operator, raw) {
        (Operator::In, RawValue::List(items)) => items
            .iter()
            .map(|item| coerce_scalar(field, item, token.start))
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::List),
        (Operator::In, RawValue::Scalar(_)) => Err(SyntaxError::ListRequired {
            field: field.name.to_string(),
            position: token.start,
        }),
        (operator, RawValue::List(_)) => Err(SyntaxError::ListNotAllowed {
            operator: operator.to_string(),
            position: token.start,
        }),
        (_, RawValue::Scalar(text)) => coerce_scalar(field, &text, token.start),
    }
}

fn coerce_scalar(
    field: &'static FieldSpec,
    text: &str,
    position: usize,
) -> Result<FieldValue, SyntaxError> {
    let invalid = || SyntaxError::InvalidValue {
        value: text.to_string(),
        field: field.name.to_string(),
        expected: field.kind.expected_value(),
        position,
    };

    match field.kind {
        ValueKind::String => Ok(FieldValue::Text(text.to_string())),
        ValueKind::Number => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(FieldValue::Number)
            .ok_or_else(invalid),
        ValueKind::Enum(values) => values
            .iter()
            .find(|value| value.eq_ignore_ascii_case(text.trim()))
            .map(|value| FieldValue::Enum(*value))
            .ok_or_else(invalid),
        ValueKind::IpOrCidr => text
            .trim()
            .parse::<IpMatcher>()
            .map(FieldValue::Ip)
            .map_err(|_| invalid()),
        ValueKind::Duration => parse_duration(text)
            .map(FieldValue::Duration)
            .ok_or_else(invalid),
    }
}

/// Parse `<digits><unit>` where unit is one of `s m h d w`
pub fn parse_duration(text: &str) -> Option<DurationValue> {
    let captures = DURATION.captures(text.trim())?;
    let amount: i64 = captures[1].parse().ok()?;
    let unit = match &captures[2] {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        _ => 604_800,
    };

    let seconds = amount.checked_mul(unit)?;
    chrono::Duration::try_seconds(seconds)?;

    Some(DurationValue {
        text: text.trim().to_string(),
        seconds,
    })
}
