//! Category service - the category list

use std::sync::Arc;

use serde::Serialize;

use crate::domain::category::find_known;
use crate::domain::result::{Error, Result};
use crate::ports::{CategoryCorrector, MappingRepository};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAdded {
    pub category: String,
    /// Correction changed the requested name
    pub corrected: bool,
    /// False when the category already existed
    pub added: bool,
}

pub struct CategoryService {
    repository: Arc<dyn MappingRepository>,
    corrector: Arc<dyn CategoryCorrector>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn MappingRepository>, corrector: Arc<dyn CategoryCorrector>) -> Self {
        Self { repository, corrector }
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.repository.load_categories()
    }

    pub fn add(&self, name: &str) -> Result<CategoryAdded> {
        let mut categories = self.repository.load_categories()?;
        let correction = self.corrector.correct(name, &categories);
        if correction.value.is_empty() {
            return Err(Error::validation("Category must not be empty"));
        }

        if let Some(existing) = find_known(&categories, &correction.value) {
            return Ok(CategoryAdded {
                category: existing.to_string(),
                corrected: correction.changed,
                added: false,
            });
        }

        categories.push(correction.value.clone());
        self.repository.save_categories(&categories)?;
        Ok(CategoryAdded {
            category: correction.value,
            corrected: correction.changed,
            added: true,
        })
    }

    /// Remove a category (case-insensitive). Existing mappings keep it.
    pub fn remove(&self, name: &str) -> Result<String> {
        let mut categories = self.repository.load_categories()?;
        let existing = find_known(&categories, name)
            .map(str::to_string)
            .ok_or_else(|| Error::not_found(format!("Category not found: {}", name)))?;
        categories.retain(|c| *c != existing);
        self.repository.save_categories(&categories)?;
        Ok(existing)
    }
}
