//! Engine observer port
//!
//! Operations report what they did through an injected observer instead of
//! logging from inside the core.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::domain::RowVerdict;

/// Something noteworthy that happened while interpreting or reconciling rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// An uploaded row failed validation and was skipped (1-based data row)
    RowRejected { row_number: usize, reason: RowVerdict },
    /// A stored row had no extractable date or amount, or its amount overflowed a total
    ExtractionFailed { field: &'static str, columns: Vec<String> },
    /// A historical mapping supplied the category for a row
    MatchFound { source_file: Option<String>, category: String },
    /// A re-uploaded row inherited the category of the same row in the same file
    CategoryCarried { fingerprint: String, category: String },
    MergeCompleted {
        filename: String,
        new_rows: usize,
        preserved_rows: usize,
        dropped_rows: usize,
    },
    SuggestionReceived { raw: String, category: String, corrected: bool },
    /// A malformed store file was read as empty
    StoreRecovered { path: PathBuf },
}

pub trait EngineObserver: Send + Sync {
    fn on_event(&self, event: &EngineEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EngineObserver for NoopObserver {
    fn on_event(&self, _event: &EngineEvent) {}
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events for which `pred` holds
    pub fn count(&self, pred: impl Fn(&EngineEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl EngineObserver for RecordingObserver {
    fn on_event(&self, event: &EngineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
