//! Observer that forwards engine events to `tracing`

use crate::ports::{EngineEvent, EngineObserver};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn on_event(&self, event: &EngineEvent) {
        match event {
            EngineEvent::RowRejected { row_number, reason } => {
                tracing::debug!(row_number, reason = %reason, "Row rejected");
            }
            EngineEvent::ExtractionFailed { field, columns } => {
                tracing::debug!(field, columns = ?columns, "Extraction failed");
            }
            EngineEvent::MatchFound { source_file, category } => {
                tracing::debug!(source_file = ?source_file, category = %category, "Match found");
            }
            EngineEvent::CategoryCarried { fingerprint, category } => {
                tracing::debug!(fingerprint = %fingerprint, category = %category, "Category carried forward");
            }
            EngineEvent::MergeCompleted {
                filename,
                new_rows,
                preserved_rows,
                dropped_rows,
            } => {
                tracing::info!(
                    filename = %filename,
                    new_rows,
                    preserved_rows,
                    dropped_rows,
                    "Merge completed"
                );
            }
            EngineEvent::SuggestionReceived { raw, category, corrected } => {
                tracing::debug!(raw = %raw, category = %category, corrected, "Suggestion received");
            }
            EngineEvent::StoreRecovered { path } => {
                tracing::warn!(path = %path.display(), "Store file was malformed, treating it as empty");
            }
        }
    }
}
