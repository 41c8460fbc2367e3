//! Abstract Syntax Tree (AST) definitions for the query language

use crate::query::schema::FieldSpec;
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    StartsWith,
    In,
}

impl Operator {
    /// Resolve an operator token's text; keywords are case-insensitive and
    /// `STARTS WITH` may be separated by any run of whitespace
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        let normalized = lexeme
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        match normalized.as_str() {
            "=" => Some(Operator::Equal),
            "!=" => Some(Operator::NotEqual),
            ">" => Some(Operator::GreaterThan),
            "<" => Some(Operator::LessThan),
            ">=" => Some(Operator::GreaterThanOrEqual),
            "<=" => Some(Operator::LessThanOrEqual),
            "CONTAINS" => Some(Operator::Contains),
            "STARTS WITH" => Some(Operator::StartsWith),
            "IN" => Some(Operator::In),
            _ => None,
        }
    }

    /// Canonical spelling
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
            Operator::Contains => "CONTAINS",
            Operator::StartsWith => "STARTS WITH",
            Operator::In => "IN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Logical connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        if lexeme.eq_ignore_ascii_case("and") {
            Some(LogicalOp::And)
        } else if lexeme.eq_ignore_ascii_case("or") {
            Some(LogicalOp::Or)
        } else {
            None
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
        }
    }
}

/// IP literal: a single address or a CIDR block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IpMatcher {
    Addr(IpAddr),
    Cidr { network: IpAddr, prefix: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid IP address or CIDR block '{0}'")]
pub struct InvalidIp(pub String);

impl IpMatcher {
    /// Whether `addr` equals the address or falls inside the block
    pub fn contains(&self, addr: IpAddr) -> bool {
        match *self {
            IpMatcher::Addr(own) => own == addr,
            IpMatcher::Cidr { network, prefix } => match (network, addr) {
                (IpAddr::V4(network), IpAddr::V4(addr)) => {
                    let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
                    u32::from(network) & mask == u32::from(addr) & mask
                }
                (IpAddr::V6(network), IpAddr::V6(addr)) => {
                    let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
                    u128::from(network) & mask == u128::from(addr) & mask
                }
                _ => false,
            },
        }
    }
}

impl FromStr for IpMatcher {
    type Err = InvalidIp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidIp(s.to_string());

        match s.split_once('/') {
            Some((addr, prefix)) => {
                let network: IpAddr = addr.parse().map_err(|_| invalid())?;
                let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
                let max = if network.is_ipv4() { 32 } else { 128 };
                if prefix > max {
                    return Err(invalid());
                }
                Ok(IpMatcher::Cidr { network, prefix })
            }
            None => s.parse().map(IpMatcher::Addr).map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for IpMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpMatcher::Addr(addr) => write!(f, "{addr}"),
            IpMatcher::Cidr { network, prefix } => write!(f, "{network}/{prefix}"),
        }
    }
}

/// Relative age literal such as `7d`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationValue {
    pub text: String,
    pub seconds: i64,
}

impl DurationValue {
    /// `None` past the range chrono can represent
    pub fn as_chrono(&self) -> Option<chrono::Duration> {
        chrono::Duration::try_seconds(self.seconds)
    }
}

/// A literal coerced to its field's kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Enum(&'static str),
    Ip(IpMatcher),
    Duration(DurationValue),
    List(Vec<FieldValue>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{text:?}"),
            FieldValue::Number(number) => write!(f, "{number}"),
            FieldValue::Enum(value) => write!(f, "\"{value}\""),
            FieldValue::Ip(ip) => write!(f, "\"{ip}\""),
            FieldValue::Duration(duration) => write!(f, "\"{}\"", duration.text),
            FieldValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A single `field op value` leaf
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub field: &'static FieldSpec,
    pub operator: Operator,
    pub value: FieldValue,
    /// Byte offset of the field token
    pub position: usize,
}

/// Filter expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Comparison(Comparison),
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
    Group(Box<Expr>),
}

impl Expr {
    /// Visit every comparison leaf from left to right
    pub fn comparisons(&self) -> Vec<&Comparison> {
        let mut leaves = Vec::new();
        self.collect_comparisons(&mut leaves);
        leaves
    }

    fn collect_comparisons<'a>(&'a self, leaves: &mut Vec<&'a Comparison>) {
        match self {
            Expr::Comparison(comparison) => leaves.push(comparison),
            Expr::Logical { left, right, .. } => {
                left.collect_comparisons(leaves);
                right.collect_comparisons(leaves);
            }
            Expr::Group(inner) => inner.collect_comparisons(leaves),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Comparison(comparison) => write!(
                f,
                "{} {} {}",
                comparison.field.name, comparison.operator, comparison.value
            ),
            Expr::Logical { left, op, right } => write!(f, "{left} {op} {right}"),
            Expr::Group(inner) => write!(f, "({inner})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_lexemes() {
        assert_eq!(Operator::from_lexeme("="), Some(Operator::Equal));
        assert_eq!(Operator::from_lexeme("contains"), Some(Operator::Contains));
        assert_eq!(Operator::from_lexeme("Starts   With"), Some(Operator::StartsWith));
        assert_eq!(Operator::from_lexeme("=="), None);
    }

    #[test]
    fn test_cidr_containment() {
        let block: IpMatcher = "10.0.0.0/8".parse().unwrap();
        assert!(block.contains("10.20.30.40".parse().unwrap()));
        assert!(!block.contains("192.168.1.1".parse().unwrap()));

        let everything: IpMatcher = "0.0.0.0/0".parse().unwrap();
        assert!(everything.contains("8.8.8.8".parse().unwrap()));

        let v6: IpMatcher = "fe80::/10".parse().unwrap();
        assert!(v6.contains("fe80::1".parse().unwrap()));
        assert!(!v6.contains("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_invalid_ip_literals() {
        assert!("10.0.0.0/33".parse::<IpMatcher>().is_err());
        assert!("not-an-ip".parse::<IpMatcher>().is_err());
        assert!("10.0.0/8".parse::<IpMatcher>().is_err());
    }

    #[test]
    fn test_value_display() {
        let list = FieldValue::List(vec![
            FieldValue::Enum("HIGH"),
            FieldValue::Enum("CRITICAL"),
        ]);
        assert_eq!(list.to_string(), "[\"HIGH\", \"CRITICAL\"]");
        assert_eq!(FieldValue::Text("Win".to_string()).to_string(), "\"Win\"");
    }
}
