//! Static field schema for the query language
//!
//! The schema is the single source of truth for which fields a query may
//! reference, which operators each field accepts and what a legal value
//! looks like. It is fixed at compile time and never mutated.

use super::parser::ast::Operator;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;

/// Kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "values")]
pub enum ValueKind {
    /// Free text
    String,
    /// Integer or decimal numeral
    Number,
    /// One of a closed set of values
    Enum(&'static [&'static str]),
    /// IPv4/IPv6 address or CIDR block
    IpOrCidr,
    /// Relative age such as `7d` or `24h`
    Duration,
}

impl ValueKind {
    /// Operators legal for this kind, in suggestion order
    pub fn operators(&self) -> &'static [Operator] {
        use Operator::*;

        match self {
            ValueKind::String => &[Equal, NotEqual, Contains, StartsWith, In],
            ValueKind::Number => &[
                Equal,
                NotEqual,
                GreaterThan,
                LessThan,
                GreaterThanOrEqual,
                LessThanOrEqual,
                In,
            ],
            ValueKind::Enum(_) => &[Equal, NotEqual, In],
            ValueKind::IpOrCidr => &[Equal, NotEqual, In],
            ValueKind::Duration => &[
                GreaterThan,
                LessThan,
                GreaterThanOrEqual,
                LessThanOrEqual,
            ],
        }
    }

    /// Check whether an operator may be applied to this kind
    pub fn accepts(&self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }

    /// Human-readable description of a legal value, used in error messages
    pub fn expected_value(&self) -> String {
        match self {
            ValueKind::String => "a string".to_string(),
            ValueKind::Number => "a number".to_string(),
            ValueKind::Enum(values) => format!("one of {}", values.join(", ")),
            ValueKind::IpOrCidr => "an IP address or CIDR block".to_string(),
            ValueKind::Duration => "a duration such as \"7d\" or \"24h\"".to_string(),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::Enum(_) => write!(f, "enum"),
            ValueKind::IpOrCidr => write!(f, "ip-or-cidr"),
            ValueKind::Duration => write!(f, "duration"),
        }
    }
}

/// A recognized field and its value kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ValueKind,
    pub description: &'static str,
}

/// Every field the language knows about, in declaration order
pub static FIELD_SCHEMA: [FieldSpec; 11] = [
    FieldSpec {
        name: "hostname",
        kind: ValueKind::String,
        description: "Device hostname",
    },
    FieldSpec {
        name: "os",
        kind: ValueKind::String,
        description: "Operating system name and version",
    },
    FieldSpec {
        name: "ip",
        kind: ValueKind::IpOrCidr,
        description: "Primary IP address",
    },
    FieldSpec {
        name: "risk_level",
        kind: ValueKind::Enum(&["LOW", "MEDIUM", "HIGH", "CRITICAL"]),
        description: "Assessed risk level",
    },
    FieldSpec {
        name: "status",
        kind: ValueKind::Enum(&["online", "offline", "isolated"]),
        description: "Agent connectivity status",
    },
    FieldSpec {
        name: "device_type",
        kind: ValueKind::Enum(&["workstation", "server", "laptop", "mobile", "iot"]),
        description: "Device category",
    },
    FieldSpec {
        name: "open_ports",
        kind: ValueKind::Number,
        description: "Number of listening ports",
    },
    FieldSpec {
        name: "vulnerabilities",
        kind: ValueKind::Number,
        description: "Number of known vulnerabilities",
    },
    FieldSpec {
        name: "last_activity",
        kind: ValueKind::Duration,
        description: "Time since the device was last seen",
    },
    FieldSpec {
        name: "user",
        kind: ValueKind::String,
        description: "Logged-in user",
    },
    FieldSpec {
        name: "department",
        kind: ValueKind::String,
        description: "Owning department",
    },
];

/// Field names in schema order
pub static SUPPORTED_FIELDS: Lazy<Vec<&'static str>> =
    Lazy::new(|| FIELD_SCHEMA.iter().map(|field| field.name).collect());

/// Durations offered as completions for duration fields
pub const DURATION_PRESETS: &[&str] = &["1h", "24h", "7d", "30d"];

/// Look up a field by its exact (case-sensitive) name
pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
    FIELD_SCHEMA.iter().find(|field| field.name == name)
}

/// All fields in declaration order
pub fn fields() -> &'static [FieldSpec] {
    &FIELD_SCHEMA
}
