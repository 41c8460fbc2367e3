use chrono::{DateTime, Utc};
use jql_engine::query::{parse, validate_jql_syntax, Evaluator};
use serde_json::Value;
use test_case::test_case;

use super::fixtures::devices;

fn evaluator() -> Evaluator {
    let now: DateTime<Utc> = "2024-06-01T12:00:00Z".parse().unwrap();
    Evaluator::at(now)
}

fn hostnames(query: &str) -> Vec<String> {
    let expr = parse(query).unwrap();
    let records = devices();

    evaluator()
        .filter(expr.as_ref(), &records)
        .into_iter()
        .map(|record| record["hostname"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test_case("os CONTAINS \"windows\"", &["ws-finance-01", "lt-eng-07"] ; "case insensitive substring")]
#[test_case("risk_level IN [HIGH, CRITICAL] AND status != offline", &["ws-finance-01", "srv-db-02"] ; "enum membership")]
#[test_case("ip = \"10.0.0.0/8\"", &["ws-finance-01", "srv-db-02"] ; "cidr containment")]
#[test_case("ip = \"172.16.0.4\"", &["cam-lobby"] ; "exact address")]
#[test_case("last_activity < \"24h\"", &["ws-finance-01", "lt-eng-07"] ; "recent activity")]
#[test_case("last_activity > \"7d\"", &["srv-db-02"] ; "stale activity")]
#[test_case("department STARTS WITH eng AND (open_ports > 20 OR vulnerabilities = 0)", &["srv-db-02", "lt-eng-07"] ; "grouped")]
#[test_case("user IN [alice, bob]", &["ws-finance-01", "lt-eng-07"] ; "string membership")]
fn test_filter(query: &str, expected: &[&str]) {
    assert_eq!(hostnames(query), expected);
}

#[test]
fn test_empty_query_keeps_every_record() {
    assert_eq!(hostnames("").len(), devices().len());
}

#[test]
fn test_connectives_apply_left_to_right() {
    // (iot OR server) AND open_ports > 100
    assert!(hostnames("device_type = iot OR device_type = server AND open_ports > 100").is_empty());
    assert_eq!(
        hostnames("device_type = iot OR (device_type = server AND open_ports > 100)"),
        vec!["cam-lobby"]
    );
}

#[test]
fn test_missing_fields_never_match() {
    // cam-lobby has no os, user or open_ports
    assert_eq!(hostnames("os != \"Linux\"").len(), 3);
    assert!(!hostnames("open_ports < 1000").contains(&"cam-lobby".to_string()));
}

#[test]
fn test_non_object_records_are_skipped() {
    let expr = parse("os = Linux").unwrap();
    let records = vec![Value::Null, Value::from("os = Linux"), serde_json::json!({ "os": "linux" })];

    assert_eq!(evaluator().filter(expr.as_ref(), &records).len(), 1);
}

#[test]
fn test_out_of_range_durations_are_rejected_before_evaluation() {
    for query in [
        "last_activity < \"10000000000000000s\"",
        "last_activity > \"15250000000w\"",
    ] {
        let result = validate_jql_syntax(query);
        assert!(!result.valid, "{query}");
        assert!(result.error.unwrap_or_default().starts_with("Invalid value"), "{query}");
        assert!(parse(query).is_err(), "{query}");
    }

    assert_eq!(hostnames("last_activity < \"5000w\"").len(), 3);
}
