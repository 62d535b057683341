//! Terminal output helpers: colored status lines, tables, and JSON mode.

use comfy_table::{Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

/// Prints a section header.
pub fn header(text: &str) {
    if console::colors_enabled() {
        println!("{}", text.bold().underline());
    } else {
        println!("{text}");
    }
}

/// Prints an informational line.
pub fn info(text: &str) {
    if console::colors_enabled() {
        println!("{} {text}", "info".cyan().bold());
    } else {
        println!("info {text}");
    }
}

/// Prints a warning line.
pub fn warning(text: &str) {
    if console::colors_enabled() {
        eprintln!("{} {text}", "warning".yellow().bold());
    } else {
        eprintln!("warning {text}");
    }
}

/// Prints an error line.
pub fn error(text: &str) {
    if console::colors_enabled() {
        eprintln!("{} {text}", "error".red().bold());
    } else {
        eprintln!("error {text}");
    }
}

/// Renders `rows` (one row per package change) as a table, header first.
pub fn table(header: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic).set_header(header.iter().map(|h| Cell::new(h)));
    for row in rows {
        table.add_row(row);
    }
    table
}

/// Serializes `value` as pretty JSON for `--output json` modes.
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> String {
    sonic_rs::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
