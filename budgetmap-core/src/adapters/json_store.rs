//! JSON file store
//!
//! Layout under the data directory:
//! - `mappings.json`: file name → ordered array of row mappings
//! - `categories.json`: array of category names
//! - `progress.json`: `{ "activeFile": "..." }`
//!
//! Every write replaces the whole file through a temp file and rename.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::domain::{default_categories, MappingStore, RowMapping};
use crate::ports::{EngineEvent, EngineObserver, MappingRepository, NoopObserver};

const MAPPINGS_FILE: &str = "mappings.json";
const CATEGORIES_FILE: &str = "categories.json";
const PROGRESS_FILE: &str = "progress.json";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressFile {
    #[serde(default)]
    active_file: Option<String>,
}

pub struct JsonFileStore {
    dir: PathBuf,
    observer: Arc<dyn EngineObserver>,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Report store recoveries to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn EngineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mappings_path(&self) -> PathBuf {
        self.dir.join(MAPPINGS_FILE)
    }

    pub fn categories_path(&self) -> PathBuf {
        self.dir.join(CATEGORIES_FILE)
    }

    pub fn progress_path(&self) -> PathBuf {
        self.dir.join(PROGRESS_FILE)
    }

    /// Read and parse a JSON file. Missing → `None`; malformed → `None`
    /// plus a `StoreRecovered` event.
    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                self.recovered(path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Malformed store file");
                self.recovered(path);
                Ok(None)
            }
        }
    }

    fn recovered(&self, path: &Path) {
        self.observer.on_event(&EngineEvent::StoreRecovered {
            path: path.to_path_buf(),
        });
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_vec_pretty(value)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&content)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)
            .map_err(|e| Error::storage(format!("Failed to write {}: {}", path.display(), e.error)))?;
        Ok(())
    }
}

impl MappingRepository for JsonFileStore {
    fn load_store(&self) -> Result<MappingStore> {
        Ok(self
            .read_json::<MappingStore>(&self.mappings_path())?
            .unwrap_or_default())
    }

    fn save_file(&self, filename: &str, rows: &[RowMapping]) -> Result<()> {
        let mut store = self.load_store()?;
        store.set(filename, rows.to_vec());
        self.write_json(&self.mappings_path(), &store)
    }

    fn load_categories(&self) -> Result<Vec<String>> {
        let path = self.categories_path();
        let exists = path.exists();
        let categories: Option<Vec<String>> = self.read_json(&path)?;

        match categories {
            Some(list) if !list.is_empty() => Ok(list),
            _ => {
                let defaults = default_categories();
                if !exists {
                    self.write_json(&path, &defaults)?;
                }
                Ok(defaults)
            }
        }
    }

    fn save_categories(&self, categories: &[String]) -> Result<()> {
        self.write_json(&self.categories_path(), categories)
    }

    fn active_file(&self) -> Result<Option<String>> {
        Ok(self
            .read_json::<ProgressFile>(&self.progress_path())?
            .and_then(|p| p.active_file))
    }

    fn set_active_file(&self, filename: &str) -> Result<()> {
        let progress = ProgressFile {
            active_file: Some(filename.to_string()),
        };
        self.write_json(&self.progress_path(), &progress)
    }
}
