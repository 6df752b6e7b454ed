//! Categories command - list, add and remove categories

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a category
    Add {
        /// Category name
        name: String,
    },
    /// Remove a category (mapped rows keep it)
    Remove {
        /// Category name
        name: String,
    },
}

pub fn run(command: Option<CategoryCommands>) -> Result<()> {
    let ctx = get_context()?;

    match command.unwrap_or(CategoryCommands::List { json: false }) {
        CategoryCommands::List { json } => {
            let categories = ctx.category_service.list()?;
            if json {
                return output::print_json(&categories);
            }
            for category in &categories {
                println!("  {}", category);
            }
        }
        CategoryCommands::Add { name } => {
            let added = ctx.category_service.add(&name)?;
            if added.added {
                println!("{} Added {}", "✓".green(), added.category.bold());
            } else {
                output::info(&format!("{} already exists", added.category));
            }
        }
        CategoryCommands::Remove { name } => {
            let removed = ctx.category_service.remove(&name)?;
            println!("{} Removed {}", "✓".green(), removed.bold());
        }
    }
    Ok(())
}
