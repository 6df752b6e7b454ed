//! Auto-map command - suggest categories for every unmapped row

use anyhow::Result;
use budgetmap_core::adapters::TracingObserver;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use super::get_context;
use crate::output;

pub fn run(file: Option<&str>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let filename = ctx.categorize_service.resolve_file(file)?;

    let bar = if json { ProgressBar::hidden() } else { ProgressBar::new(0) };
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} rows") {
        bar.set_style(style);
    }

    let result = ctx.categorize_service.bulk_auto_map(&filename, &TracingObserver, |progress| {
        bar.set_length(progress.total as u64);
        bar.set_position(progress.done as u64);
    })?;
    bar.finish_and_clear();

    if json {
        return output::print_json(&result);
    }

    if result.total == 0 {
        output::info(&format!("Every row of {} is already mapped", filename));
        return Ok(());
    }

    println!(
        "{} Mapped {} of {} row(s) in {}",
        "✓".green(),
        result.mapped,
        result.total,
        filename.bold()
    );
    if result.unresolved > 0 {
        output::warning(&format!("  {} suggestion(s) outside the category list", result.unresolved));
    }
    if result.failed > 0 {
        println!();
        println!("{} {} suggestion(s) failed", "✗".red(), result.failed);
        for error in &result.errors {
            println!("  {}", error);
        }
    }
    Ok(())
}
