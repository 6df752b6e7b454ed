//! Suggest command - ask the LLM for one row's category

use anyhow::Result;
use budgetmap_core::adapters::TracingObserver;
use budgetmap_core::services::AutoMapResult;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(row: usize, file: Option<&str>, apply: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let filename = ctx.categorize_service.resolve_file(file)?;

    let (suggestion, applied) = if apply {
        let result = ctx.categorize_service.auto_map(&filename, row, &TracingObserver)?;
        (result.suggestion, result.applied)
    } else {
        (ctx.categorize_service.suggest(&filename, row, &TracingObserver)?, false)
    };

    if json {
        return output::print_json(AutoMapResult {
            row_index: row,
            suggestion,
            applied,
        });
    }

    println!("Suggested category for row {}: {}", row, suggestion.category.bold());
    if suggestion.corrected {
        output::info(&format!("  Corrected from \"{}\"", suggestion.raw.trim()));
    }
    if !suggestion.known {
        output::warning("  Not in the category list");
    }
    if applied {
        println!("{} Row {} mapped", "✓".green(), row);
    } else if apply {
        output::warning("  Not applied; map it with `bm map` or add the category first");
    }
    Ok(())
}
