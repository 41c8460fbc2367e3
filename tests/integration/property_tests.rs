use jql_engine::query::{
    get_autocomplete_suggestions, get_syntax_tokens, tokenize, validate_jql_syntax, QueryEngine,
    TokenKind, SUPPORTED_FIELDS,
};
use proptest::prelude::*;

/// Strings built from query-like fragments, more likely to reach deep
/// parser states than arbitrary unicode
fn query_like() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("os".to_string()),
        Just("risk_level".to_string()),
        Just("open_ports".to_string()),
        Just("last_activity".to_string()),
        Just("ip".to_string()),
        Just("=".to_string()),
        Just("!=".to_string()),
        Just(">=".to_string()),
        Just("CONTAINS".to_string()),
        Just("STARTS WITH".to_string()),
        Just("IN".to_string()),
        Just("AND".to_string()),
        Just("or".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("\"HIGH\"".to_string()),
        Just("\"7d\"".to_string()),
        Just("[1, 2]".to_string()),
        Just("\"unterminated".to_string()),
        Just("10.0.0.0/8".to_string()),
        "[a-z0-9_\"\\[\\],!<>()]{1,6}",
    ];
    prop::collection::vec(fragment, 0..10).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn prop_tokenize_is_idempotent(query in ".*") {
        prop_assert_eq!(tokenize(&query), tokenize(&query));
    }

    #[test]
    fn prop_validation_is_total(query in ".*") {
        let result = validate_jql_syntax(&query);
        prop_assert_eq!(result.valid, result.error.is_none());
        if let Some(position) = result.error_position {
            prop_assert!(position <= query.len());
        }
    }

    #[test]
    fn prop_validation_is_total_for_query_like_input(query in query_like()) {
        let result = validate_jql_syntax(&query);
        prop_assert_eq!(result.valid, result.error_position.is_none());
    }

    #[test]
    fn prop_tokens_cover_non_whitespace(query in query_like()) {
        let mut covered = 0;
        for token in tokenize(&query) {
            prop_assert!(token.start < token.end);
            prop_assert!(query[covered..token.start].chars().all(char::is_whitespace));
            prop_assert_eq!(&query[token.start..token.end], token.text.as_str());
            covered = token.end;
        }
        prop_assert!(query[covered..].chars().all(char::is_whitespace));
    }

    #[test]
    fn prop_syntax_tokens_mirror_lexer(query in query_like()) {
        let tokens = tokenize(&query);
        let syntax = get_syntax_tokens(&query);

        prop_assert_eq!(tokens.len(), syntax.len());
        for (token, rendered) in tokens.iter().zip(&syntax) {
            prop_assert_eq!(token.kind, rendered.token_type);
            prop_assert_eq!(&token.text, &rendered.value);
        }
    }

    #[test]
    fn prop_suggestions_never_panic(query in query_like(), cursor in 0usize..80) {
        let suggestions = get_autocomplete_suggestions(&query, cursor);
        if cursor > query.len() {
            prop_assert!(suggestions.is_empty());
        }
    }

    #[test]
    fn prop_field_suggestions_come_from_schema(query in query_like()) {
        let query = format!("{query} ");
        let tokens = tokenize(&query);
        let expects_field = tokens
            .last()
            .map_or(true, |token| token.kind == TokenKind::Logical || token.is_open_paren());

        let suggestions = get_autocomplete_suggestions(&query, query.len());
        if expects_field {
            for suggestion in &suggestions {
                prop_assert!(SUPPORTED_FIELDS.contains(&suggestion.as_str()));
            }
        }
    }

    #[test]
    fn prop_cache_is_transparent(queries in prop::collection::vec(query_like(), 1..20)) {
        let cached = QueryEngine::new();
        for query in queries.iter().chain(queries.iter()) {
            prop_assert_eq!(cached.validate(query), validate_jql_syntax(query));
            prop_assert_eq!(
                cached.suggest(query, query.len()),
                get_autocomplete_suggestions(query, query.len())
            );
        }
    }
}
