//! # racksearch-cli
//!
//! Command-line interface for searching the book rack sheet.

mod output;
mod shell;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use output::{OutputFormat, PAGE_SIZE};
use racksearch_core::{AdminGate, Config, ConfigStore, LogicalField, SearchEngine, SearchMode};
use racksearch_http::SheetClient;
use racksearch_sheet::Table;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Rows `rack columns` previews by default.
const PREVIEW_ROWS: usize = 5;

/// rack - search books by number, name or rack location
#[derive(Parser)]
#[command(name = "rack")]
#[command(author, version, about = "Search the book rack sheet", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "RACKSEARCH_CONFIG",
        default_value = ConfigStore::DEFAULT_FILE
    )]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the sheet once and print the results
    Search(SearchArgs),
    /// Start an interactive search shell
    Shell {
        /// Field to search: number, name, location or all
        #[arg(short, long, default_value = "all")]
        by: SearchMode,
    },
    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List the sheet's column headers and how they are mapped (admin)
    Columns {
        /// Admin secret (prompted for when omitted)
        #[arg(long)]
        secret: Option<String>,

        /// Rows to preview through the column map (0 to skip)
        #[arg(long, default_value_t = PREVIEW_ROWS)]
        preview: usize,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Text to look for; empty matches every book
    #[arg(default_value = "")]
    query: String,

    /// Field to search: number, name, location or all
    #[arg(short, long, default_value = "all")]
    by: SearchMode,

    /// Match the book number exactly instead of searching
    #[arg(long, conflicts_with = "by")]
    exact: bool,

    /// Maximum results to print (0 for all)
    #[arg(short, long, default_value_t = PAGE_SIZE)]
    limit: usize,

    /// Output format (json, csv, table)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Change the sheet URL or column mapping (admin)
    Set(SetArgs),
}

#[derive(Args, Default)]
struct SetArgs {
    /// Sheet URL (Google Sheets link or direct CSV link)
    #[arg(long)]
    url: Option<String>,

    /// Sheet tab name
    #[arg(long)]
    sheet: Option<String>,

    /// Header holding the book number
    #[arg(long)]
    number: Option<String>,

    /// Header holding the book name
    #[arg(long)]
    name: Option<String>,

    /// Header holding the rack location
    #[arg(long)]
    location: Option<String>,

    /// Admin secret (prompted for when omitted)
    #[arg(long)]
    secret: Option<String>,
}

impl SetArgs {
    /// Merge the given values into `config`.
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.sheet_url.clone_from(url);
        }
        if let Some(sheet) = &self.sheet {
            config.sheet_name.clone_from(sheet);
        }
        let headers = [
            (LogicalField::Number, &self.number),
            (LogicalField::Name, &self.name),
            (LogicalField::Location, &self.location),
        ];
        for (field, header) in headers {
            if let Some(header) = header {
                config.column_map.set(field, header.trim());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let store = ConfigStore::new(&cli.config);

    match cli.command {
        Command::Search(args) => run_search(&store, &args).await,
        Command::Shell { by } => {
            let client = SheetClient::new().map_err(|e| anyhow!("{e}"))?;
            shell::run(store.load(), client, by).await
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", serde_json::to_string_pretty(&store.load())?);
                Ok(())
            }
            ConfigAction::Set(args) => run_config_set(&store, &args),
        },
        Command::Columns { secret, preview } => run_columns(&store, secret, preview).await,
    }
}

/// Fetch the configured sheet, mapping any failure to the user-facing message.
async fn load_table(config: &Config) -> Result<Table> {
    let client = SheetClient::new().map_err(|e| anyhow!("{e}"))?;
    client
        .fetch_table(config)
        .await
        .map_err(|e| anyhow!("could not load data: {e}"))
}

/// Run a one-shot search.
async fn run_search(store: &ConfigStore, args: &SearchArgs) -> Result<()> {
    let config = store.load();
    let table = load_table(&config).await?;

    let engine = SearchEngine::new(&table, &config.column_map);
    let rows = if args.exact {
        engine.find_by_number(&args.query)
    } else {
        engine.search_mode(args.by, &args.query)
    };
    tracing::info!(mode = %args.by, matches = rows.len(), "search complete");

    let records = engine.project_all(&rows);
    let (visible, remaining) = output::page(&records, 0, args.limit);
    output::print_records(visible, args.format)?;
    if matches!(args.format, OutputFormat::Table) {
        output::print_remaining(remaining, "use --limit 0 to show all");
    }
    Ok(())
}

/// Check the admin secret, prompting for it when not given.
fn require_admin(secret: Option<String>) -> Result<()> {
    let candidate = match secret {
        Some(secret) => secret,
        None => rpassword::prompt_password("Admin secret: ")?,
    };
    AdminGate::from_env()
        .verify(candidate.trim())
        .map_err(|e| anyhow!("{e}"))
}

/// Apply `rack config set`.
fn run_config_set(store: &ConfigStore, args: &SetArgs) -> Result<()> {
    require_admin(args.secret.clone())?;

    let mut config = store.load();
    args.apply(&mut config);

    for header in config.column_map.duplicate_headers() {
        println!(
            "{} column '{header}' is mapped to more than one field",
            "Warning:".yellow().bold()
        );
    }

    store
        .save(&config)
        .with_context(|| format!("Failed to save configuration to {}", store.path().display()))?;
    println!("{} saved {}", "ok:".green().bold(), store.path().display());
    Ok(())
}

/// Apply `rack columns`.
async fn run_columns(store: &ConfigStore, secret: Option<String>, preview: usize) -> Result<()> {
    require_admin(secret)?;

    let config = store.load();
    let table = load_table(&config).await?;
    print!("{}", columns_report(&config, &table, preview));
    Ok(())
}

/// Headers of `table` marked with the fields mapped to them, unresolved
/// fields, and the first `preview` rows as the column map reads them.
fn columns_report(config: &Config, table: &Table, preview: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} rows)",
        format!("Columns of '{}'", table.name()).cyan().bold(),
        table.row_count()
    );
    for header in table.headers() {
        let mapped: Vec<&str> = config
            .column_map
            .iter()
            .filter(|(_, h)| *h == header.as_str())
            .map(|(field, _)| field.key())
            .collect();
        if mapped.is_empty() {
            let _ = writeln!(out, "  {header}");
        } else {
            let marker = format!("<- {}", mapped.join(", "));
            let _ = writeln!(out, "  {header}  {}", marker.green());
        }
    }

    for field in config.column_map.unresolved(table) {
        let _ = writeln!(
            out,
            "{} {} ({}) is mapped to '{}', which is not a column",
            "Warning:".yellow().bold(),
            field.key(),
            field.label(),
            config.column_map.get(field)
        );
    }

    if preview > 0 && !table.is_empty() {
        let records = SearchEngine::new(table, &config.column_map).preview(preview);
        let _ = writeln!(out, "\n{}", "Preview".cyan().bold());
        out.push_str(&output::format_table(&records));
    }
    out
}
