//! Reconciliation of uploaded rows against stored mappings
//!
//! Re-uploading a file must not lose categorizations: rows are identified by
//! fingerprint, categories follow the fingerprint, and stored rows missing
//! from the new upload are kept after the new ones.

use std::collections::{HashMap, HashSet};

use super::columns::ColumnKeywords;
use super::fingerprint::{fingerprints_or_values_match, Fingerprint};
use super::mapping::{MappingStore, RowMapping};
use super::row::RawRow;
use crate::ports::{EngineEvent, EngineObserver};

/// Result of merging one file's upload into its stored rows
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// New rows first, then preserved stored rows
    pub rows: Vec<RowMapping>,
    pub new_rows: usize,
    /// New rows that inherited a category from the same file
    pub carried: usize,
    /// New rows categorized from another stored mapping
    pub prefilled: usize,
    /// Stored rows absent from the upload and kept as they were
    pub preserved: usize,
    /// Stored rows with nothing extractable, which cannot be re-identified
    pub dropped: usize,
}

/// Mapped rows of a store with their fingerprints precomputed
pub struct CategoryIndex<'a> {
    entries: Vec<(Fingerprint, &'a RowMapping)>,
    keywords: &'a ColumnKeywords,
}

impl<'a> CategoryIndex<'a> {
    pub fn build(store: &'a MappingStore, keywords: &'a ColumnKeywords) -> Self {
        let entries = store
            .rows()
            .filter(|m| m.mapped_category().is_some())
            .map(|m| (Fingerprint::of_row(&m.original_data, keywords), m))
            .collect();
        Self { entries, keywords }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category of the first stored mapping matching `row`, in store order
    pub fn find(&self, row: &RawRow, observer: &dyn EngineObserver) -> Option<String> {
        let fingerprint = Fingerprint::of_row(row, self.keywords);
        self.find_with(row, &fingerprint, observer)
    }

    fn find_with(&self, row: &RawRow, fingerprint: &Fingerprint, observer: &dyn EngineObserver) -> Option<String> {
        let (_, mapping) = self
            .entries
            .iter()
            .find(|(fp, m)| fingerprints_or_values_match(row, fingerprint, &m.original_data, fp))?;
        let category = mapping.mapped_category()?.to_string();
        observer.on_event(&EngineEvent::MatchFound {
            source_file: mapping.source_file.clone(),
            category: category.clone(),
        });
        Some(category)
    }
}

/// Stateless reconciliation over in-memory rows
#[derive(Debug, Clone, Default)]
pub struct ReconcileEngine {
    keywords: ColumnKeywords,
}

impl ReconcileEngine {
    pub fn new(keywords: ColumnKeywords) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &ColumnKeywords {
        &self.keywords
    }

    pub fn fingerprint(&self, row: &RawRow) -> Fingerprint {
        Fingerprint::of_row(row, &self.keywords)
    }

    pub fn rows_match(&self, a: &RawRow, b: &RawRow) -> bool {
        super::fingerprint::rows_match(a, b, &self.keywords)
    }

    pub fn find_matching_category(
        &self,
        row: &RawRow,
        store: &MappingStore,
        observer: &dyn EngineObserver,
    ) -> Option<String> {
        CategoryIndex::build(store, &self.keywords).find(row, observer)
    }

    /// Merge `new_rows` for `filename` with the rows stored for it
    ///
    /// The k-th occurrence of a fingerprint among the new rows takes the
    /// category of the k-th stored occurrence (or the last one when the
    /// stored file has fewer). Stored rows whose fingerprint is not among
    /// the new rows are appended unchanged; stored rows with an empty
    /// fingerprint are dropped.
    pub fn merge(
        &self,
        filename: &str,
        new_rows: Vec<RowMapping>,
        existing: &[RowMapping],
        observer: &dyn EngineObserver,
    ) -> MergeOutcome {
        let new_fps: Vec<Fingerprint> = new_rows.iter().map(|m| self.fingerprint(&m.original_data)).collect();
        let existing_fps: Vec<Fingerprint> = existing.iter().map(|m| self.fingerprint(&m.original_data)).collect();

        let mut occurrences: HashMap<&str, Vec<&RowMapping>> = HashMap::new();
        for (fp, mapping) in existing_fps.iter().zip(existing) {
            if !fp.is_empty() {
                occurrences.entry(fp.as_str()).or_default().push(mapping);
            }
        }

        let mut outcome = MergeOutcome {
            new_rows: new_rows.len(),
            ..Default::default()
        };
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for (fp, mut row) in new_fps.iter().zip(new_rows) {
            if !fp.is_empty() {
                let k = seen.entry(fp.as_str()).or_insert(0);
                let stored = occurrences
                    .get(fp.as_str())
                    .and_then(|list| list.get(*k).or_else(|| list.last()));
                *k += 1;

                if let Some(category) = stored.and_then(|m| m.mapped_category()) {
                    if !row.mapped {
                        row.assign(category);
                        outcome.carried += 1;
                        observer.on_event(&EngineEvent::CategoryCarried {
                            fingerprint: fp.to_string(),
                            category: category.to_string(),
                        });
                    }
                }
            }
            outcome.rows.push(row);
        }

        let seen: HashSet<&str> = seen.into_keys().collect();
        for (fp, mapping) in existing_fps.iter().zip(existing) {
            if fp.is_empty() {
                outcome.dropped += 1;
            } else if !seen.contains(fp.as_str()) {
                let mut kept = mapping.clone();
                kept.row_index = outcome.rows.len();
                outcome.rows.push(kept);
                outcome.preserved += 1;
            }
        }

        observer.on_event(&EngineEvent::MergeCompleted {
            filename: filename.to_string(),
            new_rows: outcome.new_rows,
            preserved_rows: outcome.preserved,
            dropped_rows: outcome.dropped,
        });

        outcome
    }

    /// Merge against the store's rows for `filename`, then fill still
    /// unmapped new rows from any matching mapping in the whole store
    pub fn reconcile(
        &self,
        filename: &str,
        new_rows: Vec<RowMapping>,
        store: &MappingStore,
        observer: &dyn EngineObserver,
    ) -> MergeOutcome {
        let existing = store.get(filename).unwrap_or(&[]);
        let mut outcome = self.merge(filename, new_rows, existing, observer);

        let index = CategoryIndex::build(store, &self.keywords);
        if index.is_empty() {
            return outcome;
        }

        let new_count = outcome.new_rows;
        for row in outcome.rows.iter_mut().take(new_count) {
            if row.mapped {
                continue;
            }
            if let Some(category) = index.find(&row.original_data, observer) {
                row.assign(category);
                outcome.prefilled += 1;
            }
        }

        outcome
    }
}
