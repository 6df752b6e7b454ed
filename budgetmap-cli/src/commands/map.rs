//! Map command - assign a category to one row

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(row: usize, category: &str, file: Option<&str>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let filename = ctx.categorize_service.resolve_file(file)?;
    let mapping = ctx.categorize_service.map_row(&filename, row, category)?;

    if json {
        return output::print_json(&mapping);
    }

    let assigned = mapping.category.as_deref().unwrap_or_default();
    println!("{} Row {} mapped to {}", "✓".green(), row, assigned.bold());
    if assigned != category.trim() {
        output::info(&format!("  Corrected from \"{}\"", category.trim()));
    }
    Ok(())
}
