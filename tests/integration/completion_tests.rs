use jql_engine::query::{get_autocomplete_suggestions, CompletionEngine, QueryEngine, SUPPORTED_FIELDS};
use jql_engine::JqlConfig;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn at_end(query: &str) -> Vec<String> {
    get_autocomplete_suggestions(query, query.len())
}

#[test]
fn test_position_zero_offers_supported_fields() {
    assert_eq!(get_autocomplete_suggestions("", 0), *SUPPORTED_FIELDS);
}

#[test]
fn test_prefix_filters_fields() {
    let suggestions = get_autocomplete_suggestions("o", 1);

    assert!(suggestions.contains(&"os".to_string()));
    assert!(suggestions.iter().all(|field| field.starts_with('o')));
    assert!(!suggestions.contains(&"ip".to_string()));
}

#[test_case("os = \"Windows\" AND " ; "after connective")]
#[test_case("(" ; "after open paren")]
#[test_case("os = a OR (" ; "nested group")]
fn test_field_positions(query: &str) {
    assert_eq!(at_end(query), *SUPPORTED_FIELDS);
}

#[test_case("ip ", &["=", "!=", "IN"] ; "ip operators")]
#[test_case("open_ports ", &["=", "!=", ">", "<", ">=", "<=", "IN"] ; "number operators")]
#[test_case("user ", &["=", "!=", "CONTAINS", "STARTS WITH", "IN"] ; "string operators")]
#[test_case("user s", &["STARTS WITH"] ; "operator prefix")]
fn test_operator_positions(query: &str, expected: &[&str]) {
    assert_eq!(at_end(query), expected);
}

#[test]
fn test_enum_values_after_operator() {
    assert_eq!(
        at_end("device_type = "),
        vec!["\"workstation\"", "\"server\"", "\"laptop\"", "\"mobile\"", "\"iot\""]
    );
    assert_eq!(at_end("status != \"o"), vec!["\"online\"", "\"offline\""]);
}

#[test]
fn test_connectives_after_comparison() {
    assert_eq!(at_end("open_ports > 20 "), vec!["AND", "OR"]);
    assert_eq!(at_end("(open_ports > 20 "), vec!["AND", "OR", ")"]);
    assert_eq!(at_end("open_ports > 20 o"), vec!["OR"]);
}

#[test]
fn test_usage_errors_give_empty_list() {
    assert!(get_autocomplete_suggestions("os", 10).is_empty());
    assert!(at_end("os = a )").is_empty());
}

#[test]
fn test_suggestions_are_deterministic() {
    let query = "risk_level = \"HIGH\" AND d";
    for cursor in 0..=query.len() {
        assert_eq!(
            get_autocomplete_suggestions(query, cursor),
            get_autocomplete_suggestions(query, cursor)
        );
    }
}

#[test]
fn test_completion_can_be_applied() {
    let query = "risk_level = \"HIGH\" AND dev";
    let completion = CompletionEngine::new().complete(query, query.len()).unwrap();
    let (text, cursor) = completion
        .apply(query, query.len(), &completion.suggestions[0])
        .unwrap();

    assert_eq!(text, "risk_level = \"HIGH\" AND device_type ");
    assert_eq!(at_end(&text[..cursor]), vec!["=", "!=", "IN"]);
}

#[test]
fn test_configured_limit() {
    let mut config = JqlConfig::default();
    config.completion.max_suggestions = 2;
    let engine = QueryEngine::from_config(&config);

    assert_eq!(engine.suggest("", 0), vec!["hostname", "os"]);
    assert_eq!(engine.suggest("risk_level = ", 13), vec!["\"LOW\"", "\"MEDIUM\""]);
}
