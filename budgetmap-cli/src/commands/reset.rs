//! Reset command - clear the categories of a file

use anyhow::Result;
use colored::Colorize;

use super::get_context;

pub fn run(file: Option<&str>, yes: bool) -> Result<()> {
    let ctx = get_context()?;
    let filename = ctx.categorize_service.resolve_file(file)?;

    if !yes {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Clear every category of {}?", filename))
            .default(false)
            .interact()?;

        if !confirm {
            println!("Cancelled");
            return Ok(());
        }
    }

    let cleared = ctx.categorize_service.reset_file(&filename)?;
    println!("{} Cleared {} row(s) of {}", "✓".green(), cleared, filename.bold());
    Ok(())
}
