//! Adapter implementations (hexagonal architecture)
//!
//! Adapters implement the port traits for specific technologies.

pub mod corrector;
pub mod json_store;
pub mod ollama;
pub mod tracing_observer;

pub use corrector::EditDistanceCorrector;
pub use json_store::JsonFileStore;
pub use ollama::OllamaSuggester;
pub use tracing_observer::TracingObserver;
