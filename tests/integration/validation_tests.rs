use jql_engine::query::parser::MAX_NESTING;
use jql_engine::query::{
    get_autocomplete_suggestions, get_syntax_tokens, validate_jql_syntax, TokenKind,
    SUPPORTED_FIELDS,
};
use jql_engine::query::schema::{self, ValueKind};
use pretty_assertions::assert_eq;
use test_case::test_case;

use super::fixtures::EXAMPLE_QUERY;

#[test_case("hostname = \"web-01\"" ; "string equality")]
#[test_case("os = \"Windows\"" ; "os equality")]
#[test_case("ip = \"10.0.0.5\"" ; "ip address")]
#[test_case("ip != \"10.0.0.0/8\"" ; "cidr block")]
#[test_case("risk_level = \"HIGH\"" ; "enum value")]
#[test_case("status IN [\"online\", \"isolated\"]" ; "enum list")]
#[test_case("device_type = server" ; "bare enum value")]
#[test_case("open_ports > 20" ; "number ordering")]
#[test_case("vulnerabilities IN [1, 2, 3]" ; "number list")]
#[test_case("last_activity > \"7d\"" ; "duration")]
#[test_case("user CONTAINS \"admin\"" ; "substring")]
#[test_case("department STARTS WITH \"Eng\"" ; "prefix")]
fn test_field_validates_with_compatible_operator(query: &str) {
    let result = validate_jql_syntax(query);
    assert!(result.valid, "{query}: {:?}", result.error);
}

#[test]
fn test_every_supported_field_validates() {
    for field in schema::fields() {
        let query = match field.kind {
            ValueKind::String => format!("{} = \"Windows\"", field.name),
            ValueKind::Number => format!("{} >= 1", field.name),
            ValueKind::Enum(values) => format!("{} = \"{}\"", field.name, values[0]),
            ValueKind::IpOrCidr => format!("{} = \"192.168.0.0/16\"", field.name),
            ValueKind::Duration => format!("{} < \"24h\"", field.name),
        };

        assert!(validate_jql_syntax(&query).valid, "{query}");
    }

    assert_eq!(SUPPORTED_FIELDS.len(), schema::fields().len());
}

#[test_case("" ; "empty")]
#[test_case("   \t " ; "whitespace only")]
fn test_blank_query_is_valid(query: &str) {
    let result = validate_jql_syntax(query);
    assert!(result.valid);
    assert_eq!(result.error, None);
}

#[test]
fn test_unknown_field_is_named() {
    let result = validate_jql_syntax("nonexistent_field = \"x\"");

    assert!(!result.valid);
    assert!(result.error.unwrap().contains("nonexistent_field"));
    assert_eq!(result.error_position, Some(0));
}

#[test]
fn test_field_names_are_case_sensitive() {
    assert!(!validate_jql_syntax("OS = \"Windows\"").valid);
    assert!(validate_jql_syntax("os = \"Windows\" and risk_level = HIGH").valid);
}

#[test_case("(os = \"Windows\"", 0 ; "unclosed group")]
#[test_case("os = \"Windows\")", 14 ; "unmatched close")]
#[test_case("((os = a) OR os = b", 0 ; "outer group unclosed")]
fn test_unbalanced_parentheses(query: &str, position: usize) {
    let result = validate_jql_syntax(query);
    assert!(!result.valid);
    assert_eq!(result.error_position, Some(position));
}

#[test]
fn test_missing_connective() {
    let result = validate_jql_syntax("os = \"Windows\" risk_level = \"HIGH\"");

    assert!(!result.valid);
    assert!(result.error.unwrap().contains("Expected AND/OR"));
    assert_eq!(result.error_position, Some(15));
}

#[test]
fn test_dangling_connective() {
    let result = validate_jql_syntax("os = \"Windows\" AND");
    assert_eq!(result.error.as_deref(), Some("Expected expression after AND"));
}

#[test_case("risk_level > \"HIGH\"", "Operator '>' cannot be used with enum field 'risk_level'" ; "ordering on enum")]
#[test_case("os > \"Windows\"", "Operator '>' cannot be used with string field 'os'" ; "ordering on string")]
fn test_incompatible_operator(query: &str, message: &str) {
    assert_eq!(validate_jql_syntax(query).error.as_deref(), Some(message));
}

#[test_case("open_ports = many" ; "non numeric")]
#[test_case("risk_level = \"SEVERE\"" ; "outside enum")]
#[test_case("ip = \"10.0.0.0/40\"" ; "bad prefix")]
#[test_case("last_activity > \"soon\"" ; "bad duration")]
fn test_invalid_value(query: &str) {
    let result = validate_jql_syntax(query);
    assert!(!result.valid);
    assert!(result.error.unwrap().starts_with("Invalid value"), "{query}");
}

#[test]
fn test_only_first_error_is_reported() {
    let result = validate_jql_syntax("bogus = 1 AND open_ports = many");
    assert!(result.error.unwrap().contains("bogus"));
    assert_eq!(result.error_position, Some(0));
}

#[test]
fn test_example_end_to_end() {
    assert!(validate_jql_syntax(EXAMPLE_QUERY).valid);

    let kinds: Vec<TokenKind> = get_syntax_tokens(EXAMPLE_QUERY)
        .into_iter()
        .map(|token| token.token_type)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Field,
            TokenKind::Operator,
            TokenKind::Value,
            TokenKind::Logical,
            TokenKind::Field,
            TokenKind::Operator,
            TokenKind::Value,
        ]
    );
}

#[test]
fn test_syntax_tokens_serialize_for_rendering() {
    let json = serde_json::to_value(get_syntax_tokens("os = \"Linux\"")).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "type": "field", "value": "os" },
            { "type": "operator", "value": "=" },
            { "type": "value", "value": "\"Linux\"" },
        ])
    );
}

#[test]
fn test_validation_result_wire_format() {
    let invalid = serde_json::to_value(validate_jql_syntax("(os = a")).unwrap();
    assert_eq!(invalid["valid"], false);
    assert_eq!(invalid["errorPosition"], 0);
    assert_eq!(invalid["error"], "Unclosed parenthesis");

    let valid = serde_json::to_value(validate_jql_syntax("os = a")).unwrap();
    assert_eq!(valid, serde_json::json!({ "valid": true }));
}

#[test]
fn test_deep_nesting_is_rejected() {
    let query = "(".repeat(10_000);
    let result = validate_jql_syntax(&query);
    assert!(!result.valid);
    assert_eq!(result.error_position, Some(MAX_NESTING));
    assert_eq!(
        result.error.as_deref(),
        Some(format!("Parentheses nested more than {MAX_NESTING} deep").as_str())
    );

    assert!(get_autocomplete_suggestions(&query, query.len()).is_empty());
}

#[test]
fn test_nesting_within_limit_validates() {
    let depth = MAX_NESTING - 4;
    let query = format!("{}os = a{}", "(".repeat(depth), ")".repeat(depth));
    assert!(validate_jql_syntax(&query).valid);

    let open = "(".repeat(depth);
    assert_eq!(
        get_autocomplete_suggestions(&open, open.len()).len(),
        SUPPORTED_FIELDS.len()
    );
}
