//! Record evaluation for validated filter expressions
//!
//! Records are JSON objects keyed by field name. Connectives short-circuit
//! and groups are transparent.

pub mod filters;

pub use filters::comparison_matches;

use super::parser::ast::{Expr, LogicalOp};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

/// Applies expressions to records relative to a fixed "now"
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    now: DateTime<Utc>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Evaluate durations against the current time
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Evaluate durations against a fixed instant
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Whether a single record satisfies the expression
    pub fn matches(&self, expr: &Expr, record: &Value) -> bool {
        match expr {
            Expr::Comparison(comparison) => comparison_matches(comparison, record, self.now),
            Expr::Logical { left, op, right } => match op {
                LogicalOp::And => self.matches(left, record) && self.matches(right, record),
                LogicalOp::Or => self.matches(left, record) || self.matches(right, record),
            },
            Expr::Group(inner) => self.matches(inner, record),
        }
    }

    /// Records satisfying the expression, in input order; an absent
    /// expression keeps every record
    pub fn filter<'r>(&self, expr: Option<&Expr>, records: &'r [Value]) -> Vec<&'r Value> {
        let matched: Vec<&Value> = match expr {
            Some(expr) => records
                .iter()
                .filter(|record| self.matches(expr, record))
                .collect(),
            None => records.iter().collect(),
        };

        debug!(total = records.len(), matched = matched.len(), "filtered records");
        matched
    }
}

/// Filter records with the current time as reference
pub fn filter_records<'r>(expr: Option<&Expr>, records: &'r [Value]) -> Vec<&'r Value> {
    Evaluator::new().filter(expr, records)
}
