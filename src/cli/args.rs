use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigAction;

/// Command-line interface for the JQL query engine.
///
/// Validates, completes and highlights filter queries for the security
/// dashboard, and evaluates them against JSON records.
///
/// # Examples
///
/// ```bash
/// # Check a query
/// jql validate 'os CONTAINS "Windows" AND risk_level = "HIGH"'
///
/// # Completions at the end of a partial query
/// jql complete 'risk_level = '
///
/// # Filter records read from stdin
/// cat devices.json | jql filter 'open_ports > 20'
/// ```
#[derive(Parser)]
#[command(name = "jql")]
#[command(about = "Validate, complete and evaluate JQL filter queries")]
#[command(version)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a query for syntax and schema errors
    Validate {
        /// Query text (read from stdin when omitted)
        query: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Suggest completions at a cursor position
    Complete {
        /// Query text
        query: String,

        /// Byte offset of the cursor (default: end of query)
        #[arg(short, long)]
        cursor: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Show the classified tokens of a query
    Tokens {
        /// Query text
        query: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: TokenFormat,
    },

    /// Evaluate a query against a JSON array of records
    Filter {
        /// Query text
        query: String,

        /// Records file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Maximum number of records to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List the supported fields and their operators
    Fields {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Start an interactive query session
    Repl {
        /// Records to evaluate queries against
        #[arg(short, long)]
        records: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Configuration action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Output formats for reports
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
}

/// Output formats for the token listing
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TokenFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// The query with ANSI highlighting
    Color,
}
