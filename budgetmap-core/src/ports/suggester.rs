//! Category suggester port

use crate::domain::result::Result;

/// Produces a free-text category guess for a prompt
pub trait CategorySuggester: Send + Sync {
    /// Suggester name for logs (e.g. "ollama")
    fn name(&self) -> &str;

    fn suggest(&self, prompt: &str) -> Result<String>;
}
