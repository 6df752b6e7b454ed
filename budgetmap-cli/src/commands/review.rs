//! Review command - walk unmapped rows and pick categories interactively

use anyhow::Result;
use budgetmap_core::adapters::TracingObserver;
use colored::Colorize;
use dialoguer::{Input, Select};

use super::get_context;
use crate::output;

enum Choice {
    Category(String),
    Other,
    Skip,
    Quit,
}

pub fn run(file: Option<&str>) -> Result<()> {
    let ctx = get_context()?;
    let filename = ctx.categorize_service.resolve_file(file)?;
    let progress = ctx.categorize_service.progress(&filename)?;

    let pending: Vec<usize> = (0..progress.rows.len()).filter(|&i| !progress.rows[i].mapped).collect();
    if pending.is_empty() {
        output::info(&format!("Every row of {} is already mapped", filename));
        return Ok(());
    }

    let mut mapped = 0;
    for (n, &position) in pending.iter().enumerate() {
        println!();
        println!(
            "{} {}",
            format!("[{}/{}] row {}", n + 1, pending.len(), position).dimmed(),
            output::row_summary(&progress.rows[position])
        );

        let suggestion = match ctx.categorize_service.suggest(&filename, position, &TracingObserver) {
            Ok(s) if s.known => Some(s.category),
            Ok(s) => {
                output::warning(&format!("  Suggestion \"{}\" is not a known category", s.category));
                None
            }
            Err(e) => {
                output::warning(&format!("  No suggestion: {}", e));
                None
            }
        };

        let categories = ctx.category_service.list()?;
        let mut choices = Vec::new();
        let mut labels = Vec::new();
        if let Some(category) = &suggestion {
            labels.push(format!("{} (suggested)", category));
            choices.push(Choice::Category(category.clone()));
        }
        for category in categories.iter().filter(|c| Some(*c) != suggestion.as_ref()) {
            labels.push(category.clone());
            choices.push(Choice::Category(category.clone()));
        }
        labels.push("Other...".to_string());
        choices.push(Choice::Other);
        labels.push("Skip".to_string());
        choices.push(Choice::Skip);
        labels.push("Quit".to_string());
        choices.push(Choice::Quit);

        let selected = Select::new()
            .with_prompt("Category")
            .items(&labels)
            .default(0)
            .interact()?;

        let category = match &choices[selected] {
            Choice::Category(c) => c.clone(),
            Choice::Other => Input::<String>::new().with_prompt("New category").interact_text()?,
            Choice::Skip => continue,
            Choice::Quit => break,
        };

        let row = ctx.categorize_service.map_row(&filename, position, &category)?;
        println!("{} {}", "✓".green(), row.category.as_deref().unwrap_or_default());
        mapped += 1;
    }

    println!();
    println!("Mapped {} row(s) in {}", mapped, filename.bold());
    Ok(())
}
