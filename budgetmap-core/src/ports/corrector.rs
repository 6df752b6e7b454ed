//! Category spelling corrector port

use serde::Serialize;

/// A corrected category name and whether correction changed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    pub value: String,
    pub changed: bool,
}

pub trait CategoryCorrector: Send + Sync {
    /// Correct `input` against the known categories
    fn correct(&self, input: &str, known: &[String]) -> Correction;
}
