//! Persisted row mappings

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::row::RawRow;

/// One uploaded row and the category a user (or the suggester) gave it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMapping {
    /// Position in the file's stored list, renumbered on every merge
    pub row_index: usize,
    pub original_data: RawRow,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub mapped: bool,
    #[serde(default)]
    pub source_file: Option<String>,
}

impl RowMapping {
    /// A freshly uploaded, uncategorized row
    pub fn new(row_index: usize, original_data: RawRow, source_file: impl Into<String>) -> Self {
        Self {
            row_index,
            original_data,
            category: None,
            mapped: false,
            source_file: Some(source_file.into()),
        }
    }

    pub fn assign(&mut self, category: impl Into<String>) {
        self.category = Some(category.into());
        self.mapped = true;
    }

    pub fn clear(&mut self) {
        self.category = None;
        self.mapped = false;
    }

    /// Mapped with a category set
    pub fn mapped_category(&self) -> Option<&str> {
        match (&self.category, self.mapped) {
            (Some(c), true) => Some(c.as_str()),
            _ => None,
        }
    }
}

/// Every stored mapping, keyed by source file name in upload order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingStore {
    files: Vec<(String, Vec<RowMapping>)>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, filename: &str) -> Option<&[RowMapping]> {
        self.files
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, rows)| rows.as_slice())
    }

    /// Replace the rows of a file, keeping its position; new files go last
    pub fn set(&mut self, filename: &str, rows: Vec<RowMapping>) {
        match self.files.iter_mut().find(|(name, _)| name == filename) {
            Some(entry) => entry.1 = rows,
            None => self.files.push((filename.to_string(), rows)),
        }
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(name, _)| name.as_str())
    }

    /// All mappings flattened in file-then-row order
    pub fn rows(&self) -> impl Iterator<Item = &RowMapping> {
        self.files.iter().flat_map(|(_, rows)| rows.iter())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Serialize for MappingStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.files.len()))?;
        for (name, rows) in &self.files {
            map.serialize_entry(name, rows)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MappingStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = MappingStore;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of file name to row mappings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<MappingStore, A::Error> {
                let mut store = MappingStore::new();
                while let Some((name, value)) = access.next_entry::<String, serde_json::Value>()? {
                    // Entries that aren't arrays, and rows that don't parse, are skipped
                    let serde_json::Value::Array(items) = value else {
                        continue;
                    };
                    let rows = items
                        .into_iter()
                        .filter_map(|item| serde_json::from_value::<RowMapping>(item).ok())
                        .collect();
                    store.set(&name, rows);
                }
                Ok(store)
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}
