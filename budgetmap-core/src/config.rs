//! Configuration management
//!
//! Settings live in `<data_dir>/settings.json`:
//! ```json
//! {
//!   "columnKeywords": { "date": ["date"], "amount": ["amount", "debit", ...] },
//!   "llm": { "baseUrl": "http://localhost:11434", "model": "llama3.2" },
//!   "previewRows": 10
//! }
//! ```
//! Every field is optional; unknown fields are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::ColumnKeywords;

pub const DEFAULT_LLM_URL: &str = "http://localhost:11434";
pub const DEFAULT_LLM_MODEL: &str = "llama3.2";

/// Category suggester settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    /// Prior categorized rows included in each prompt
    pub example_limit: usize,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            example_limit: 10,
            timeout_secs: 30,
        }
    }
}

/// budgetmap configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub column_keywords: ColumnKeywords,
    pub llm: LlmSettings,
    /// Rows returned in an upload preview
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            column_keywords: ColumnKeywords::default(),
            llm: LlmSettings::default(),
            preview_rows: 10,
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or unparseable settings file yields defaults. The suggester
    /// endpoint can be overridden with BUDGETMAP_LLM_URL and
    /// BUDGETMAP_LLM_MODEL.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let mut config: Config = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %settings_path.display(), error = %e, "Ignoring unreadable settings");
                Config::default()
            })
        } else {
            Config::default()
        };

        if let Some(url) = non_empty_env("BUDGETMAP_LLM_URL") {
            config.llm.base_url = url;
        }
        if let Some(model) = non_empty_env("BUDGETMAP_LLM_MODEL") {
            config.llm.model = model;
        }

        Ok(config)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.column_keywords, ColumnKeywords::default());
        assert_eq!(config.llm.example_limit, 10);
    }

    #[test]
    fn test_partial_settings() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"columnKeywords": {"date": ["datum"]}, "llm": {"exampleLimit": 3}}"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.column_keywords.date, vec!["datum".to_string()]);
        assert_eq!(config.column_keywords.credit, vec!["credit".to_string()]);
        assert_eq!(config.llm.example_limit, 3);
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.preview_rows, 10);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.preview_rows, 10);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), r#"{"theme": "dark", "previewRows": 5}"#).unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.llm, LlmSettings::default());
    }
}
