//! Upload command - read a CSV export and reconcile it with stored mappings

use std::path::Path;

use anyhow::Result;
use budgetmap_core::adapters::TracingObserver;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(file: &Path, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let result = ctx.upload_service.upload_path(file, &TracingObserver)?;

    if result.valid_rows == 0 {
        anyhow::bail!(
            "No valid transactions found in {} ({} row(s) skipped)",
            result.filename,
            result.skipped_rows
        );
    }

    if json {
        return output::print_json(&result);
    }

    println!(
        "{} Uploaded {} ({} valid of {} rows)",
        "✓".green(),
        result.filename.bold(),
        result.valid_rows,
        result.total_rows
    );
    if result.skipped_rows > 0 {
        output::warning(&format!("  Skipped {} row(s) without a date, amount or description", result.skipped_rows));
    }
    if result.carried_rows > 0 {
        println!("  Kept categories on {} row(s) from the previous upload", result.carried_rows);
    }
    if result.prefilled_rows > 0 {
        println!("  Prefilled {} row(s) from other files", result.prefilled_rows);
    }
    if result.preserved_rows > 0 {
        println!("  Preserved {} stored row(s) missing from this upload", result.preserved_rows);
    }
    if result.dropped_rows > 0 {
        output::warning(&format!("  Dropped {} unreadable stored row(s)", result.dropped_rows));
    }

    if !result.preview.is_empty() {
        println!();
        println!("{}", output::rows_table(&result.preview));
    }

    Ok(())
}
