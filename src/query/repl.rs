use super::executor::Evaluator;
use super::highlight::Highlighter;
use super::schema;
use super::{QueryEngine, SyntaxError};
use crate::config::JqlConfig;
use crate::history::{QueryHistory, QueryStore, SavedQueries};
use anyhow::Result;
use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{self, ClearType},
};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::debug;

/// What the loop should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

const PROMPT: &str = "jql> ";

pub struct InteractiveRepl {
    engine: QueryEngine,
    evaluator: Evaluator,
    history: QueryHistory,
    saved_queries: SavedQueries,
    records: Vec<Value>,
    highlighter: Highlighter,
    color: bool,
    display_limit: usize,
}

impl InteractiveRepl {
    pub fn new(config: &JqlConfig, store: Arc<dyn QueryStore>) -> Self {
        Self {
            engine: QueryEngine::from_config(config),
            evaluator: Evaluator::new(),
            history: QueryHistory::new(Arc::clone(&store), config.repl.history_size),
            saved_queries: SavedQueries::new(store),
            records: Vec::new(),
            highlighter: Highlighter::new(config.repl.color),
            color: config.repl.color,
            display_limit: config.repl.display_limit,
        }
    }

    /// Records that valid queries are evaluated against
    pub fn with_records(mut self, records: Vec<Value>) -> Self {
        self.records = records;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.print_welcome(&mut stdout)?;

        let mut input = String::new();
        loop {
            write!(stdout, "{}", self.paint(PROMPT.green().bold()))?;
            stdout.flush()?;

            input.clear();
            if stdin.lock().read_line(&mut input)? == 0 {
                break;
            }
            let line = input.trim_end_matches(['\r', '\n']);
            if self.handle_line(line, &mut stdout)? == Control::Exit {
                break;
            }
        }

        writeln!(stdout, "\n{}", self.paint("Goodbye!".green()))?;
        Ok(())
    }

    /// Process one input line, writing all output to `out`
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> Result<Control> {
        let line = line.trim_start();

        match line.trim_end() {
            "" => {}
            "exit" | "quit" | "\\q" => return Ok(Control::Exit),
            "help" | "\\h" | "?" => self.print_help(out)?,
            "fields" | "\\f" => self.print_fields(out)?,
            "history" | "\\l" => self.print_history(out)?,
            "saved" | "\\s" => self.print_saved_queries(out)?,
            "clear" | "\\c" => self.clear_screen(out)?,
            cmd if cmd.starts_with("\\save ") => self.save_query(&cmd[6..], out)?,
            cmd if cmd.starts_with("\\r ") => self.run_saved_query(cmd[3..].trim(), out)?,
            cmd if cmd.starts_with("\\d ") => self.delete_saved_query(cmd[3..].trim(), out)?,
            "\\complete" => self.print_completions("", out)?,
            // trailing whitespace is significant to completion
            cmd if cmd.starts_with("\\complete ") => self.print_completions(&line[10..], out)?,
            cmd if cmd.starts_with("\\tokens ") => self.print_tokens(&cmd[8..], out)?,
            query => self.run_query(query, out)?,
        }

        Ok(Control::Continue)
    }

    fn run_query(&mut self, query: &str, out: &mut impl Write) -> Result<()> {
        match self.engine.parse(query) {
            Ok(expr) => {
                self.history.record(query)?;
                writeln!(out, "{}", self.highlighter.render(query))?;

                if self.records.is_empty() {
                    writeln!(out, "{}", self.paint("Query is valid.".green()))?;
                    return Ok(());
                }

                let matched = self.evaluator.filter(expr.as_ref(), &self.records);
                self.display_records(&matched, out)?;
            }
            Err(error) => self.print_syntax_error(query, &error, out)?,
        }

        Ok(())
    }

    fn print_syntax_error(
        &self,
        query: &str,
        error: &SyntaxError,
        out: &mut impl Write,
    ) -> Result<()> {
        let position = error.position().min(query.len());
        let column = query
            .get(..position)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);

        writeln!(out, "{}{}", " ".repeat(PROMPT.len()), query)?;
        writeln!(
            out,
            "{}{}",
            " ".repeat(PROMPT.len() + column),
            self.paint("^".red().bold())
        )?;
        writeln!(out, "{}: {}", self.paint("Syntax error".red()), error)?;

        let hints = self.engine.suggest(query, position);
        if !hints.is_empty() {
            let shown: Vec<&str> = hints.iter().take(5).map(String::as_str).collect();
            writeln!(out, "{}: try {}", self.paint("Hint".yellow()), shown.join(", "))?;
        }

        Ok(())
    }

    fn display_records(&self, matched: &[&Value], out: &mut impl Write) -> Result<()> {
        writeln!(
            out,
            "{}",
            self.paint(
                format!("Matched {} of {} records", matched.len(), self.records.len()).dimmed()
            )
        )?;

        for record in matched.iter().take(self.display_limit) {
            writeln!(out, "  {}", serde_json::to_string(record)?)?;
        }

        if matched.len() > self.display_limit {
            writeln!(
                out,
                "{}",
                self.paint(
                    format!("... and {} more records", matched.len() - self.display_limit)
                        .dimmed()
                )
            )?;
        }

        Ok(())
    }

    fn print_completions(&self, text: &str, out: &mut impl Write) -> Result<()> {
        let suggestions = self.engine.suggest(text, text.len());
        if suggestions.is_empty() {
            writeln!(out, "{}", self.paint("No suggestions.".yellow()))?;
        }
        for suggestion in suggestions {
            writeln!(out, "  {}", suggestion)?;
        }
        Ok(())
    }

    fn print_tokens(&self, text: &str, out: &mut impl Write) -> Result<()> {
        for token in self.engine.tokenize(text).iter() {
            writeln!(
                out,
                "  {:<8} {:>3}..{:<3} {}",
                token.kind.as_str(),
                token.start,
                token.end,
                token.text
            )?;
        }
        Ok(())
    }

    fn save_query(&self, args: &str, out: &mut impl Write) -> Result<()> {
        let args = args.trim();
        let Some((name, query)) = args.split_once(char::is_whitespace) else {
            writeln!(out, "{}: \\save <name> <query>", self.paint("Usage".yellow()))?;
            return Ok(());
        };

        match self.saved_queries.save(name, query) {
            Ok(saved) => writeln!(
                out,
                "Saved {} as {}",
                self.highlighter.render(&saved.query),
                self.paint(saved.name.yellow())
            )?,
            Err(error) => writeln!(out, "{}: {}", self.paint("Error".red()), error)?,
        }

        Ok(())
    }

    fn run_saved_query(&mut self, name: &str, out: &mut impl Write) -> Result<()> {
        match self.saved_queries.get(name) {
            Ok(saved) => {
                writeln!(out, "{}: {}", self.paint("Running".dimmed()), saved.query)?;
                self.run_query(&saved.query, out)
            }
            Err(error) => {
                writeln!(out, "{}: {}", self.paint("Error".red()), error)?;
                self.print_saved_queries(out)
            }
        }
    }

    fn delete_saved_query(&self, name: &str, out: &mut impl Write) -> Result<()> {
        if self.saved_queries.remove(name)? {
            writeln!(out, "Deleted {}", self.paint(name.yellow()))?;
        } else {
            writeln!(out, "{}: No saved query named '{}'", self.paint("Error".red()), name)?;
        }
        Ok(())
    }

    fn print_welcome(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "{}", self.paint("JQL interactive filter console".blue().bold()))?;
        writeln!(
            out,
            "Type {} for help, {} to list fields, {} to quit",
            self.paint("help".yellow()),
            self.paint("fields".yellow()),
            self.paint("exit".yellow())
        )?;
        if !self.records.is_empty() {
            writeln!(out, "{} records loaded", self.records.len())?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn print_help(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "\n{}", self.paint("=== Query Language Help ===".cyan().bold()))?;
        writeln!(out)?;
        writeln!(out, "{}", self.paint("Syntax:".yellow()))?;
        writeln!(out, "  field OPERATOR value [AND|OR field OPERATOR value ...]")?;
        writeln!(out, "  Parentheses group; AND and OR apply left to right.")?;
        writeln!(out)?;
        writeln!(out, "{}", self.paint("Operators:".yellow()))?;
        writeln!(out, "  =, !=, >, <, >=, <=, CONTAINS, STARTS WITH, IN [a, b]")?;
        writeln!(out)?;
        writeln!(out, "{}", self.paint("Examples:".yellow()))?;
        for example in [
            "os CONTAINS \"Windows\" AND risk_level = \"HIGH\"",
            "status IN [\"online\", \"isolated\"] AND open_ports > 20",
            "last_activity > \"7d\" OR ip = \"10.0.0.0/8\"",
        ] {
            writeln!(out, "  {}", self.highlighter.render(example))?;
        }
        writeln!(out)?;
        writeln!(out, "{}", self.paint("Special Commands:".yellow()))?;
        for (command, description) in [
            ("help, \\h", "Show this help"),
            ("fields, \\f", "List fields and operators"),
            ("history, \\l", "Show recent queries"),
            ("saved, \\s", "List saved queries"),
            ("\\save <name> <query>", "Save a query"),
            ("\\r <name>", "Run a saved query"),
            ("\\d <name>", "Delete a saved query"),
            ("\\complete <text>", "Show completions for text"),
            ("\\tokens <text>", "Show tokens for text"),
            ("clear, \\c", "Clear screen"),
            ("exit, quit, \\q", "Exit"),
        ] {
            writeln!(out, "  • {} - {}", self.paint(command.green()), description)?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn print_fields(&self, out: &mut impl Write) -> Result<()> {
        for field in schema::fields() {
            let operators: Vec<&str> = field.kind.operators().iter().map(|op| op.symbol()).collect();
            writeln!(
                out,
                "  {:<16} {:<11} {}",
                self.paint(field.name.cyan()),
                field.kind.to_string(),
                operators.join(" ")
            )?;
        }
        Ok(())
    }

    fn print_history(&self, out: &mut impl Write) -> Result<()> {
        let entries = self.history.entries()?;
        if entries.is_empty() {
            writeln!(out, "{}", self.paint("No queries yet.".dimmed()))?;
        }
        for (index, query) in entries.iter().enumerate() {
            writeln!(out, "  {:>2}  {}", index + 1, self.highlighter.render(query))?;
        }
        Ok(())
    }

    fn print_saved_queries(&self, out: &mut impl Write) -> Result<()> {
        let saved = self.saved_queries.list()?;
        writeln!(out, "\n{}", self.paint("=== Saved Queries ===".cyan().bold()))?;
        if saved.is_empty() {
            writeln!(out, "{}", self.paint("None yet. Use \\save <name> <query>.".dimmed()))?;
        }
        for query in &saved {
            writeln!(out, "{}: {}", self.paint(query.name.yellow()), self.highlighter.render(&query.query))?;
        }
        Ok(())
    }

    fn clear_screen(&self, out: &mut impl Write) -> Result<()> {
        debug!("clearing screen");
        execute!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        self.print_welcome(out)
    }

    fn paint(&self, text: ColoredString) -> ColoredString {
        if self.color {
            text
        } else {
            text.clear()
        }
    }
}
