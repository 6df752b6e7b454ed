//! Output formatting utilities

use budgetmap_core::{OperationResult, RowMapping};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use serde::Serialize;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Print `data` wrapped in the success envelope
pub fn print_json<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&OperationResult::ok(data))?);
    Ok(())
}

/// Cell values of a row joined for display
pub fn row_summary(mapping: &RowMapping) -> String {
    mapping
        .original_data
        .iter()
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Table of rows with their position and category
pub fn rows_table(rows: &[RowMapping]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["#", "Row", "Category"]);
    for (position, row) in rows.iter().enumerate() {
        let category = match row.mapped_category() {
            Some(c) => c.to_string(),
            None => "-".to_string(),
        };
        table.add_row(vec![position.to_string(), row_summary(row), category]);
    }
    table
}
