//! Upload service - CSV ingestion and reconciliation against stored mappings

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{ColumnRole, RawRow, ReconcileEngine, RowMapping, RowValidator, RowVerdict};
use crate::ports::{EngineEvent, EngineObserver, MappingRepository};

/// Parsed CSV content: header list plus one row per record
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Result of uploading a file
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub filename: String,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub skipped_rows: usize,
    /// Rows that kept their category from a previous upload of this file
    pub carried_rows: usize,
    /// Rows categorized from a matching row of any stored file
    pub prefilled_rows: usize,
    /// Stored rows absent from this upload that were kept
    pub preserved_rows: usize,
    pub dropped_rows: usize,
    pub preview: Vec<RowMapping>,
}

/// Column classification of one header
#[derive(Debug, Clone, Serialize)]
pub struct ColumnReport {
    pub header: String,
    pub role: ColumnRole,
}

/// Verdict and extracted fields of one row
#[derive(Debug, Clone, Serialize)]
pub struct RowReport {
    /// 1-based data row number
    pub row_number: usize,
    pub verdict: RowVerdict,
    pub date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    pub description: Option<String>,
}

/// What an upload would see, without touching the store
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub filename: String,
    pub columns: Vec<ColumnReport>,
    pub rows: Vec<RowReport>,
    pub valid_rows: usize,
}

/// Upload service for CSV files
pub struct UploadService {
    repository: Arc<dyn MappingRepository>,
    engine: ReconcileEngine,
    preview_rows: usize,
}

impl UploadService {
    pub fn new(repository: Arc<dyn MappingRepository>, engine: ReconcileEngine, preview_rows: usize) -> Self {
        Self {
            repository,
            engine,
            preview_rows,
        }
    }

    /// Upload a CSV file from disk; the stored name is the file name
    pub fn upload_path(&self, path: &Path, observer: &dyn EngineObserver) -> Result<UploadResult> {
        let filename = file_name(path)?;
        let bytes = std::fs::read(path)?;
        self.upload_bytes(&filename, &bytes, observer)
    }

    /// Validate rows, reconcile with the stored mappings for `filename`,
    /// persist the merged rows and mark the file active
    ///
    /// An upload without a single valid row is reported but not stored.
    pub fn upload_bytes(&self, filename: &str, bytes: &[u8], observer: &dyn EngineObserver) -> Result<UploadResult> {
        let parsed = parse_csv(filename, bytes)?;
        let validator = RowValidator::with_keywords(&parsed.headers, self.engine.keywords().clone());
        let total_rows = parsed.rows.len();

        let mut new_rows = Vec::new();
        for (idx, row) in parsed.rows.into_iter().enumerate() {
            let verdict = validator.check_row(&row);
            if verdict.is_valid() {
                new_rows.push(RowMapping::new(new_rows.len(), row, filename));
            } else {
                observer.on_event(&EngineEvent::RowRejected {
                    row_number: idx + 1,
                    reason: verdict,
                });
            }
        }
        let valid_rows = new_rows.len();

        // Nothing to store; the stored rows and the active file stay as they were
        if valid_rows == 0 {
            tracing::warn!(filename, total_rows, "Upload has no valid rows");
            return Ok(UploadResult {
                filename: filename.to_string(),
                total_rows,
                valid_rows,
                skipped_rows: total_rows,
                carried_rows: 0,
                prefilled_rows: 0,
                preserved_rows: 0,
                dropped_rows: 0,
                preview: Vec::new(),
            });
        }

        let store = self.repository.load_store()?;
        let outcome = self.engine.reconcile(filename, new_rows, &store, observer);

        self.repository.save_file(filename, &outcome.rows)?;
        self.repository.set_active_file(filename)?;

        tracing::info!(
            filename,
            total_rows,
            valid_rows,
            carried = outcome.carried,
            prefilled = outcome.prefilled,
            "Upload stored"
        );

        Ok(UploadResult {
            filename: filename.to_string(),
            total_rows,
            valid_rows,
            skipped_rows: total_rows - valid_rows,
            carried_rows: outcome.carried,
            prefilled_rows: outcome.prefilled,
            preserved_rows: outcome.preserved,
            dropped_rows: outcome.dropped,
            preview: outcome.rows.into_iter().take(self.preview_rows).collect(),
        })
    }

    /// Classify columns and check every row of a file without storing it
    pub fn inspect(&self, path: &Path) -> Result<InspectReport> {
        let filename = file_name(path)?;
        let bytes = std::fs::read(path)?;
        let parsed = parse_csv(&filename, &bytes)?;
        let validator = RowValidator::with_keywords(&parsed.headers, self.engine.keywords().clone());

        let columns = validator
            .roles()
            .map(|(header, role)| ColumnReport {
                header: header.to_string(),
                role,
            })
            .collect();

        let rows: Vec<RowReport> = parsed
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let normalized = validator.normalize(row);
                RowReport {
                    row_number: idx + 1,
                    verdict: validator.check_row(row),
                    date: normalized.date,
                    amount: normalized.amount,
                    description: normalized.description,
                }
            })
            .collect();
        let valid_rows = rows.iter().filter(|r| r.verdict.is_valid()).count();

        Ok(InspectReport {
            filename,
            columns,
            rows,
            valid_rows,
        })
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::validation(format!("Not a file path: {}", path.display())))
}

/// Parse CSV bytes with a header row into dict-style rows
///
/// Short records are padded with empty cells and surplus cells ignored.
pub fn parse_csv(filename: &str, bytes: &[u8]) -> Result<ParsedCsv> {
    if !filename.to_lowercase().ends_with(".csv") {
        return Err(Error::validation(format!(
            "File must be a CSV file with .csv extension. Received: {}",
            filename
        )));
    }
    if bytes.is_empty() {
        return Err(Error::validation("File is empty"));
    }
    if std::str::from_utf8(bytes).is_err() {
        return Err(Error::validation(
            "File encoding error. Please ensure the file is UTF-8 encoded",
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let mut headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if let Some(first) = headers.first_mut() {
        *first = first.trim_start_matches('\u{feff}').to_string();
    }
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::validation("File has no header row"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(RawRow::from_record(&headers, record.iter()));
    }

    Ok(ParsedCsv { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_pads_and_truncates() {
        let csv = "Date,Description,Amount\n2024-01-01,Coffee\n2024-01-02,Tea,1.00,extra\n";
        let parsed = parse_csv("a.csv", csv.as_bytes()).unwrap();
        assert_eq!(parsed.headers, vec!["Date", "Description", "Amount"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].get("Amount"), Some(""));
        assert_eq!(parsed.rows[1].len(), 3);
    }

    #[test]
    fn test_parse_csv_strips_bom() {
        let csv = "\u{feff}Date,Description,Amount\n2024-01-01,Coffee,3.00\n";
        let parsed = parse_csv("a.csv", csv.as_bytes()).unwrap();
        assert_eq!(parsed.headers[0], "Date");
        let validator = RowValidator::new(&parsed.headers);
        assert_eq!(validator.date_columns(), vec!["Date"]);
    }

    #[test]
    fn test_parse_csv_rejections() {
        assert!(matches!(parse_csv("a.txt", b"Date\n"), Err(Error::Validation(_))));
        assert!(matches!(parse_csv("a.csv", b""), Err(Error::Validation(_))));
        assert!(matches!(parse_csv("a.csv", &[0xff, 0xfe, 0x00]), Err(Error::Validation(_))));
        assert!(parse_csv("UPPER.CSV", b"Date,Amount\n").is_ok());
    }
}
