use anyhow::Result;
use jql_engine::config::JqlConfig;
use jql_engine::error::HistoryError;
use jql_engine::history::{MemoryStore, QueryHistory, QueryStore, SavedQueries, HISTORY_KEY};
use jql_engine::query::repl::{Control, InteractiveRepl};
use std::sync::Arc;
use tempfile::TempDir;

use super::fixtures::devices;

fn plain_config() -> JqlConfig {
    let mut config = JqlConfig::default();
    config.repl.color = false;
    config
}

fn run_lines(repl: &mut InteractiveRepl, lines: &[&str]) -> Result<String> {
    let mut out = Vec::new();
    for line in lines {
        if repl.handle_line(line, &mut out)? == Control::Exit {
            break;
        }
    }
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_history_is_shared_through_the_store() -> Result<()> {
    let store: Arc<dyn QueryStore> = Arc::new(MemoryStore::new());
    let mut repl = InteractiveRepl::new(&plain_config(), Arc::clone(&store));

    run_lines(&mut repl, &["os = Linux", "not a query", "risk_level = HIGH"])?;

    let history = QueryHistory::new(Arc::clone(&store), 10);
    assert_eq!(history.entries()?, vec!["risk_level = HIGH", "os = Linux"]);
    assert!(store.load(HISTORY_KEY)?.is_some());
    Ok(())
}

#[test]
fn test_saved_queries_survive_a_new_session() -> Result<()> {
    let store: Arc<dyn QueryStore> = Arc::new(MemoryStore::new());

    let mut first = InteractiveRepl::new(&plain_config(), Arc::clone(&store));
    run_lines(&mut first, &["\\save critical risk_level = CRITICAL", "exit"])?;

    let mut second =
        InteractiveRepl::new(&plain_config(), Arc::clone(&store)).with_records(devices());
    let output = run_lines(&mut second, &["\\r critical"])?;
    assert!(output.contains("Matched 1 of 4 records"));
    assert!(output.contains("srv-db-02"));

    let saved = SavedQueries::new(store);
    assert!(matches!(
        saved.save("broken", "os = a AND"),
        Err(HistoryError::InvalidQuery { .. })
    ));
    Ok(())
}

#[test]
fn test_exit_stops_processing() -> Result<()> {
    let mut repl = InteractiveRepl::new(&plain_config(), Arc::new(MemoryStore::new()));
    let output = run_lines(&mut repl, &["\\q", "os = Linux"])?;

    assert!(output.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_config_round_trip_and_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_file = temp_dir.path().join("jql.toml");

    // Missing file means defaults
    assert_eq!(JqlConfig::load_or_default(&config_file).await?, JqlConfig::default());

    let mut config = JqlConfig::default();
    config.completion.max_suggestions = 5;
    config.repl.history_size = 50;
    config.save(&config_file).await?;

    assert_eq!(JqlConfig::load(&config_file).await?, config);
    Ok(())
}

#[tokio::test]
async fn test_partial_config_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_file = temp_dir.path().join("jql.toml");
    tokio::fs::write(&config_file, "[cache]\nenabled = false\n").await?;

    let config = JqlConfig::load(&config_file).await?;
    assert!(!config.cache.enabled);
    assert_eq!(config.cache.max_entries, 256);
    assert_eq!(config.completion.max_suggestions, 20);
    Ok(())
}

#[tokio::test]
async fn test_invalid_config_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_file = temp_dir.path().join("jql.toml");
    tokio::fs::write(&config_file, "[repl]\ndisplay_limit = 0\n").await?;

    let error = JqlConfig::load(&config_file).await.unwrap_err();
    assert!(error.to_string().contains("repl.display_limit"));
    Ok(())
}
