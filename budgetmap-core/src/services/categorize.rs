//! Categorize service - manual mapping, suggestions and bulk auto-mapping

use std::sync::Arc;

use serde::Serialize;

use crate::domain::category::find_known;
use crate::domain::prompt::{build_prompt, clean_suggestion, collect_examples, PromptExample};
use crate::domain::result::{Error, Result};
use crate::domain::{ColumnKeywords, MappingStore, RowMapping, RowValidator};
use crate::ports::{CategoryCorrector, CategorySuggester, EngineEvent, EngineObserver, MappingRepository};

/// Mapping progress of one file
#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub filename: String,
    pub rows: Vec<RowMapping>,
    pub total_rows: usize,
    pub mapped_count: usize,
}

/// A cleaned and corrected category suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Reply as the suggester returned it
    pub raw: String,
    pub category: String,
    /// Correction changed the cleaned reply
    pub corrected: bool,
    /// `category` is in the category list
    pub known: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutoMapResult {
    pub row_index: usize,
    pub suggestion: Suggestion,
    pub applied: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BulkProgress {
    pub done: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkAutoMapResult {
    /// Unmapped rows attempted
    pub total: usize,
    pub mapped: usize,
    /// Suggestions outside the category list
    pub unresolved: usize,
    /// Suggester calls that errored
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Categorize service
pub struct CategorizeService {
    repository: Arc<dyn MappingRepository>,
    suggester: Arc<dyn CategorySuggester>,
    corrector: Arc<dyn CategoryCorrector>,
    keywords: ColumnKeywords,
    example_limit: usize,
}

impl CategorizeService {
    pub fn new(
        repository: Arc<dyn MappingRepository>,
        suggester: Arc<dyn CategorySuggester>,
        corrector: Arc<dyn CategoryCorrector>,
        keywords: ColumnKeywords,
        example_limit: usize,
    ) -> Self {
        Self {
            repository,
            suggester,
            corrector,
            keywords,
            example_limit,
        }
    }

    /// The given file name, else the most recently uploaded file
    pub fn resolve_file(&self, filename: Option<&str>) -> Result<String> {
        match filename {
            Some(name) => Ok(name.to_string()),
            None => self
                .repository
                .active_file()?
                .ok_or_else(|| Error::not_found("No file uploaded. Please upload a CSV first.")),
        }
    }

    pub fn progress(&self, filename: &str) -> Result<Progress> {
        let rows = self.repository.load_file(filename)?;
        let mapped_count = rows.iter().filter(|r| r.mapped).count();
        Ok(Progress {
            filename: filename.to_string(),
            total_rows: rows.len(),
            mapped_count,
            rows,
        })
    }

    /// Assign `category` to the row at `position` of the file's stored list
    pub fn map_row(&self, filename: &str, position: usize, category: &str) -> Result<RowMapping> {
        let mut rows = self.file_rows(filename)?;
        check_position(&rows, position)?;

        let mut categories = self.repository.load_categories()?;
        let correction = self.corrector.correct(category, &categories);
        if correction.value.trim().is_empty() {
            return Err(Error::validation("Category must not be empty"));
        }
        if find_known(&categories, &correction.value).is_none() {
            categories.push(correction.value.clone());
            self.repository.save_categories(&categories)?;
            tracing::info!(category = %correction.value, "Added category");
        }

        rows[position].assign(correction.value);
        self.repository.save_file(filename, &rows)?;
        Ok(rows[position].clone())
    }

    /// Ask the suggester for a category; nothing is stored
    pub fn suggest(&self, filename: &str, position: usize, observer: &dyn EngineObserver) -> Result<Suggestion> {
        let store = self.repository.load_store()?;
        let rows = store
            .get(filename)
            .ok_or_else(|| Error::not_found(format!("File not uploaded: {}", filename)))?;
        check_position(rows, position)?;

        let categories = self.repository.load_categories()?;
        let examples = collect_examples(store.rows(), self.example_limit);
        self.suggest_for(&rows[position], &categories, &examples, observer)
    }

    /// Suggest, then store the suggestion when it names a known category
    pub fn auto_map(&self, filename: &str, position: usize, observer: &dyn EngineObserver) -> Result<AutoMapResult> {
        let suggestion = self.suggest(filename, position, observer)?;
        let applied = suggestion.known;
        if applied {
            let mut rows = self.file_rows(filename)?;
            check_position(&rows, position)?;
            rows[position].assign(suggestion.category.clone());
            self.repository.save_file(filename, &rows)?;
        }
        Ok(AutoMapResult {
            row_index: position,
            suggestion,
            applied,
        })
    }

    /// Auto-map every unmapped row of a file
    ///
    /// A failing suggester call is counted and skipped. Rows are persisted
    /// once, after the loop.
    pub fn bulk_auto_map(
        &self,
        filename: &str,
        observer: &dyn EngineObserver,
        mut on_progress: impl FnMut(BulkProgress),
    ) -> Result<BulkAutoMapResult> {
        let store = self.repository.load_store()?;
        let mut rows = store
            .get(filename)
            .ok_or_else(|| Error::not_found(format!("File not uploaded: {}", filename)))?
            .to_vec();
        let categories = self.repository.load_categories()?;
        let examples = collect_examples(store.rows(), self.example_limit);

        let pending: Vec<usize> = (0..rows.len()).filter(|&i| !rows[i].mapped).collect();
        let mut result = BulkAutoMapResult {
            total: pending.len(),
            ..Default::default()
        };

        for (done, &position) in pending.iter().enumerate() {
            match self.suggest_for(&rows[position], &categories, &examples, observer) {
                Ok(suggestion) if suggestion.known => {
                    rows[position].assign(suggestion.category);
                    result.mapped += 1;
                }
                Ok(_) => result.unresolved += 1,
                Err(e) => {
                    tracing::warn!(filename, position, error = %e, "Suggestion failed");
                    result.failed += 1;
                    result.errors.push(format!("row {}: {}", position, e));
                }
            }
            on_progress(BulkProgress {
                done: done + 1,
                total: pending.len(),
            });
        }

        if result.mapped > 0 {
            self.repository.save_file(filename, &rows)?;
        }

        tracing::info!(
            filename,
            mapped = result.mapped,
            unresolved = result.unresolved,
            failed = result.failed,
            "Bulk auto-map finished"
        );
        Ok(result)
    }

    /// Clear every category of a file, keeping its rows
    pub fn reset_file(&self, filename: &str) -> Result<usize> {
        let mut rows = self.file_rows(filename)?;
        rows.iter_mut().for_each(RowMapping::clear);
        self.repository.save_file(filename, &rows)?;
        Ok(rows.len())
    }

    fn file_rows(&self, filename: &str) -> Result<Vec<RowMapping>> {
        let store: MappingStore = self.repository.load_store()?;
        store
            .get(filename)
            .map(<[RowMapping]>::to_vec)
            .ok_or_else(|| Error::not_found(format!("File not uploaded: {}", filename)))
    }

    fn suggest_for(
        &self,
        mapping: &RowMapping,
        categories: &[String],
        examples: &[PromptExample<'_>],
        observer: &dyn EngineObserver,
    ) -> Result<Suggestion> {
        let row = &mapping.original_data;
        let normalized = RowValidator::for_row(row, &self.keywords).normalize(row);
        let prompt = build_prompt(row, &normalized, categories, examples);

        let raw = self.suggester.suggest(&prompt)?;
        let cleaned = clean_suggestion(&raw);

        let suggestion = if cleaned.is_empty() {
            Suggestion {
                raw,
                category: String::new(),
                corrected: false,
                known: false,
            }
        } else {
            let correction = self.corrector.correct(&cleaned, categories);
            let known = find_known(categories, &correction.value);
            Suggestion {
                raw,
                category: known.map(str::to_string).unwrap_or(correction.value),
                corrected: correction.changed,
                known: known.is_some(),
            }
        };

        observer.on_event(&EngineEvent::SuggestionReceived {
            raw: suggestion.raw.clone(),
            category: suggestion.category.clone(),
            corrected: suggestion.corrected,
        });
        Ok(suggestion)
    }
}

fn check_position(rows: &[RowMapping], position: usize) -> Result<()> {
    if position >= rows.len() {
        return Err(Error::validation(format!(
            "Invalid row index {} (file has {} rows)",
            position,
            rows.len()
        )));
    }
    Ok(())
}
