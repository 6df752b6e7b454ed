//! CLI command implementations

pub mod automap;
pub mod categories;
pub mod inspect;
pub mod map;
pub mod progress;
pub mod reset;
pub mod review;
pub mod suggest;
pub mod summary;
pub mod upload;

use std::path::PathBuf;

use anyhow::{Context, Result};
use budgetmap_core::BudgetContext;

/// Get the budgetmap directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("BUDGETMAP_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".budgetmap"))
}

/// Get or create budgetmap context
pub fn get_context() -> Result<BudgetContext> {
    let data_dir = get_data_dir()?;
    tracing::debug!(data_dir = %data_dir.display(), "Opening budgetmap context");

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create budgetmap directory: {:?}", data_dir))?;

    BudgetContext::new(&data_dir).context("Failed to initialize budgetmap context")
}
