//! Interactive search shell.

use crate::output::{self, OutputFormat, PAGE_SIZE};
use anyhow::Result;
use colored::Colorize;
use racksearch_core::{BookRecord, Config, SearchEngine, SearchMode};
use racksearch_http::SheetClient;
use racksearch_sheet::Table;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// What a shell line asks for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Help,
    By(SearchMode),
    More,
    Refresh,
    Unknown(String),
    Query(String),
}

fn parse_line(line: &str) -> Command {
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Query(line.to_string());
    };
    let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
    match name {
        "quit" | "q" | "exit" => Command::Quit,
        "help" | "h" | "?" => Command::Help,
        "more" | "m" => Command::More,
        "refresh" | "r" => Command::Refresh,
        "by" => match arg.parse() {
            Ok(mode) => Command::By(mode),
            Err(_) => Command::Unknown(line.to_string()),
        },
        _ => Command::Unknown(line.to_string()),
    }
}

/// Session state: the loaded sheet and the last result set.
struct Session {
    config: Config,
    client: SheetClient,
    table: Option<Table>,
    mode: SearchMode,
    results: Vec<BookRecord>,
    shown: usize,
}

impl Session {
    async fn reload(&mut self) {
        match self.client.fetch_table(&self.config).await {
            Ok(table) => {
                println!(
                    "{} {} books loaded",
                    "ok:".green().bold(),
                    table.row_count()
                );
                self.table = Some(table);
            }
            Err(e) => {
                println!("{} could not load data: {e}", "Error:".red().bold());
                self.table = None;
            }
        }
    }

    fn run_query(&mut self, query: &str) {
        let Some(table) = &self.table else {
            println!(
                "{} search is unavailable until the sheet loads (:refresh)",
                "Error:".red().bold()
            );
            return;
        };
        let engine = SearchEngine::new(table, &self.config.column_map);
        let rows = engine.search_mode(self.mode, query);
        self.results = engine.project_all(&rows);
        self.shown = 0;
        self.show_page();
    }

    fn show_page(&mut self) {
        if self.results.is_empty() {
            println!("{}", "No matches found.".dimmed());
            return;
        }
        let (visible, remaining) = output::page(&self.results, self.shown, PAGE_SIZE);
        if visible.is_empty() {
            println!("{}", "No more results.".dimmed());
            return;
        }
        if let Err(e) = output::print_records(visible, OutputFormat::Table) {
            println!("{} {e}", "Error:".red().bold());
        }
        self.shown += visible.len();
        output::print_remaining(remaining, "type :more");
    }
}

/// Run the interactive shell.
pub async fn run(config: Config, client: SheetClient, mode: SearchMode) -> Result<()> {
    println!(
        "{} {} - Interactive Search",
        "rack".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "Type a query to search, {} for help, {} to exit\n",
        ":help".yellow(),
        ":quit".yellow()
    );

    let mut session = Session {
        config,
        client,
        table: None,
        mode,
        results: Vec::new(),
        shown: 0,
    };
    session.reload().await;

    let mut rl = DefaultEditor::new()?;
    let history_path = history_path();

    // Load history if available
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = format!("rack [{}]> ", session.mode).green().bold().to_string();

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match parse_line(line) {
                    Command::Quit => break,
                    Command::Help => print_help(),
                    Command::By(mode) => {
                        session.mode = mode;
                        println!("searching by {mode}");
                    }
                    Command::More => session.show_page(),
                    Command::Refresh => session.reload().await,
                    Command::Unknown(cmd) => {
                        println!("{} Unknown command: {cmd}", "Error:".red().bold());
                    }
                    Command::Query(query) => session.run_query(&query),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                println!("{} {e}", "Error:".red().bold());
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Get the history file path.
fn history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|mut p| {
        p.push("racksearch");
        let _ = std::fs::create_dir_all(&p);
        p.push("history.txt");
        p
    })
}

/// Print shell help.
fn print_help() {
    println!("{}", "rack shell commands:".cyan().bold());
    println!("  {}     Show this help", ":help, :h, :?".yellow());
    println!("  {}   Exit the shell", ":quit, :q, :exit".yellow());
    println!(
        "  {}  Search by number, name, location or all",
        ":by <field>".yellow()
    );
    println!("  {}            Show the next page of results", ":more".yellow());
    println!("  {}         Reload the sheet", ":refresh".yellow());
    println!();
    println!("Any other line is a search query.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use racksearch_core::LogicalField;

    #[test]
    fn test_parse_query() {
        assert_eq!(parse_line("atlas"), Command::Query("atlas".to_string()));
        assert_eq!(parse_line("12 b"), Command::Query("12 b".to_string()));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line(":q"), Command::Quit);
        assert_eq!(parse_line(":help"), Command::Help);
        assert_eq!(parse_line(":more"), Command::More);
        assert_eq!(parse_line(":refresh"), Command::Refresh);
    }

    #[test]
    fn test_parse_by() {
        assert_eq!(
            parse_line(":by name"),
            Command::By(SearchMode::Field(LogicalField::Name))
        );
        assert_eq!(parse_line(":by all"), Command::By(SearchMode::Any));
        assert_eq!(
            parse_line(":by price"),
            Command::Unknown(":by price".to_string())
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse_line(":vars"), Command::Unknown(":vars".to_string()));
    }
}
