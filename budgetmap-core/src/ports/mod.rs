//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod corrector;
mod observer;
mod repository;
mod suggester;

pub use corrector::{CategoryCorrector, Correction};
pub use observer::{EngineEvent, EngineObserver, NoopObserver, RecordingObserver};
pub use repository::MappingRepository;
pub use suggester::CategorySuggester;
