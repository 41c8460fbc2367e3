use anyhow::Result;
use jql_engine::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run_cli().await
}
