//! Inspect command - show how a CSV would be interpreted

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(file: &Path, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let report = ctx.upload_service.inspect(file)?;

    if json {
        return output::print_json(&report);
    }

    println!("{}", report.filename.bold());
    println!();

    let mut columns = output::create_table();
    columns.set_header(vec!["Column", "Role"]);
    for column in &report.columns {
        columns.add_row(vec![column.header.clone(), column.role.to_string()]);
    }
    println!("{columns}");
    println!();

    let mut rows = output::create_table();
    rows.set_header(vec!["Row", "Verdict", "Date", "Amount", "Description"]);
    for row in &report.rows {
        let verdict = if row.verdict.is_valid() {
            "valid".green().to_string()
        } else {
            row.verdict.reason().red().to_string()
        };
        rows.add_row(vec![
            row.row_number.to_string(),
            verdict,
            row.date.map(|d| d.to_string()).unwrap_or_default(),
            row.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
            row.description.clone().unwrap_or_default(),
        ]);
    }
    println!("{rows}");

    println!();
    println!("{} of {} rows valid", report.valid_rows, report.rows.len());
    Ok(())
}
