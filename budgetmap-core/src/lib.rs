//! budgetmap core - bank CSV interpretation and categorization
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Column roles, field extraction, fingerprints, reconciliation
//! - **ports**: Trait definitions for external dependencies (store, suggester, corrector, observer)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (JSON files, Ollama, tracing)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adapters::{EditDistanceCorrector, JsonFileStore, OllamaSuggester, TracingObserver};
use config::Config;
use ports::{CategoryCorrector, CategorySuggester, MappingRepository};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult, Result};
pub use domain::{
    ColumnKeywords, ColumnRole, Fingerprint, MappingStore, RawRow, ReconcileEngine, RowMapping, RowValidator,
    RowVerdict,
};
pub use ports::{EngineEvent, EngineObserver};

/// Main context for budgetmap operations
///
/// Holds the configuration, the store and all services.
pub struct BudgetContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub repository: Arc<dyn MappingRepository>,
    pub upload_service: UploadService,
    pub categorize_service: CategorizeService,
    pub category_service: CategoryService,
    pub summary_service: SummaryService,
}

impl BudgetContext {
    /// Context over `<data_dir>` with the JSON store and the Ollama suggester
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let suggester = Arc::new(OllamaSuggester::new(&config.llm)?);
        Self::with_suggester(data_dir, config, suggester)
    }

    /// Context with a caller-supplied suggester
    pub fn with_suggester(data_dir: &Path, config: Config, suggester: Arc<dyn CategorySuggester>) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;

        let repository: Arc<dyn MappingRepository> =
            Arc::new(JsonFileStore::new(data_dir).with_observer(Arc::new(TracingObserver)));
        let corrector: Arc<dyn CategoryCorrector> = Arc::new(EditDistanceCorrector::default());
        let engine = ReconcileEngine::new(config.column_keywords.clone());

        let upload_service = UploadService::new(Arc::clone(&repository), engine, config.preview_rows);
        let categorize_service = CategorizeService::new(
            Arc::clone(&repository),
            suggester,
            Arc::clone(&corrector),
            config.column_keywords.clone(),
            config.llm.example_limit,
        );
        let category_service = CategoryService::new(Arc::clone(&repository), corrector);
        let summary_service = SummaryService::new(Arc::clone(&repository), config.column_keywords.clone());

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            repository,
            upload_service,
            categorize_service,
            category_service,
            summary_service,
        })
    }
}
