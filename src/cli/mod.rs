pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ReportFormat, TokenFormat};

use crate::config::{self, JqlConfig};
use crate::query::QueryEngine;
use anyhow::Result;
use clap::Parser;
use commands::{
    config::ConfigCommand, fields::FieldsCommand, filter::FilterCommand, repl::ReplCommand,
    tokens::TokensCommand, validate::ValidateCommand, complete::CompleteCommand, Command,
};
use std::path::PathBuf;

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays machine-readable
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("jql_engine={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_file()?,
    };

    let command: Box<dyn Command> = match cli.command {
        Commands::Config { action } => Box::new(ConfigCommand::new(action, config_path)),
        command => {
            let config = JqlConfig::load_or_default(&config_path).await?;
            build_command(command, config, config_path)
        }
    };

    command.execute().await
}

fn build_command(command: Commands, config: JqlConfig, config_path: PathBuf) -> Box<dyn Command> {
    let engine = QueryEngine::from_config(&config);

    match command {
        Commands::Validate { query, format } => {
            Box::new(ValidateCommand::new(engine, query, format))
        }
        Commands::Complete {
            query,
            cursor,
            format,
        } => Box::new(CompleteCommand::new(engine, query, cursor, format)),
        Commands::Tokens { query, format } => Box::new(TokensCommand::new(engine, query, format)),
        Commands::Filter {
            query,
            input,
            limit,
        } => Box::new(FilterCommand::new(engine, query, input, limit)),
        Commands::Fields { format } => Box::new(FieldsCommand::new(format)),
        Commands::Repl { records } => Box::new(ReplCommand::new(config, records)),
        Commands::Config { action } => Box::new(ConfigCommand::new(action, config_path)),
    }
}
