//! Rendering search results.

use anyhow::Result;
use colored::Colorize;
use racksearch_core::{results_table, BookRecord, LogicalField};

/// Results shown per page.
pub const PAGE_SIZE: usize = 50;

/// Output format for results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Aligned table output (default)
    #[default]
    Table,
}

/// One page of results: the visible records and how many follow.
pub fn page(records: &[BookRecord], offset: usize, size: usize) -> (&[BookRecord], usize) {
    let start = offset.min(records.len());
    let end = if size == 0 {
        records.len()
    } else {
        start.saturating_add(size).min(records.len())
    };
    (&records[start..end], records.len() - end)
}

/// Print records in the given format.
pub fn print_records(records: &[BookRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if records.is_empty() {
                println!("{}", "No matches found.".dimmed());
            } else {
                print!("{}", format_table(records));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Csv => {
            print!("{}", results_table(records)?.to_csv_string());
        }
    }
    Ok(())
}

/// Print a "more results" hint after a page.
pub fn print_remaining(remaining: usize, hint: &str) {
    if remaining > 0 {
        println!(
            "{}",
            format!("... {remaining} more result(s), {hint}").yellow()
        );
    }
}

/// Format records as an aligned plain-text table.
pub fn format_table(records: &[BookRecord]) -> String {
    let headers = ["#", "Name", "Rack"];
    let cells = |r: &BookRecord| -> [String; 3] {
        [
            r.get(LogicalField::Number).to_string(),
            r.get(LogicalField::Name).to_string(),
            r.get(LogicalField::Location).to_string(),
        ]
    };

    let mut widths = headers.map(|h| h.chars().count());
    for record in records {
        for (width, cell) in widths.iter_mut().zip(cells(record)) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &headers.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for record in records {
        push_line(&mut out, &cells(record), &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width - cell.chars().count();
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}
