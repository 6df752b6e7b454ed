//! Progress command - mapped rows of a file

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(file: Option<&str>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let filename = ctx.categorize_service.resolve_file(file)?;
    let progress = ctx.categorize_service.progress(&filename)?;

    if json {
        return output::print_json(&progress);
    }

    if progress.rows.is_empty() {
        output::info(&format!("No rows stored for {}", filename));
        return Ok(());
    }

    println!("{}", output::rows_table(&progress.rows));
    println!();
    println!(
        "{}: {}/{} mapped",
        progress.filename.bold(),
        progress.mapped_count,
        progress.total_rows
    );
    Ok(())
}
