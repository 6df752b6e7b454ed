//! Repository port - mapping store abstraction

use crate::domain::result::Result;
use crate::domain::{MappingStore, RowMapping};

/// Persistence for row mappings, the category list and the active file
///
/// Implementations only move bytes: merge decisions belong to the
/// reconciliation engine. Writes replace the stored value wholesale.
pub trait MappingRepository: Send + Sync {
    // === Mappings ===

    /// Every stored file's mappings. A missing or unreadable store is empty.
    fn load_store(&self) -> Result<MappingStore>;

    /// Mappings for one file, empty if the file was never uploaded
    fn load_file(&self, filename: &str) -> Result<Vec<RowMapping>> {
        Ok(self
            .load_store()?
            .get(filename)
            .map(<[RowMapping]>::to_vec)
            .unwrap_or_default())
    }

    /// Replace the mappings of one file, leaving other files untouched
    fn save_file(&self, filename: &str, rows: &[RowMapping]) -> Result<()>;

    // === Categories ===

    fn load_categories(&self) -> Result<Vec<String>>;

    fn save_categories(&self, categories: &[String]) -> Result<()>;

    // === Progress ===

    /// The file most recently uploaded, if any
    fn active_file(&self) -> Result<Option<String>>;

    fn set_active_file(&self, filename: &str) -> Result<()>;
}
