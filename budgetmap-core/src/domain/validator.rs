//! Row validation and field extraction for arbitrary CSV schemas
//!
//! A `RowValidator` is built once per header list. Column roles are fixed
//! at construction; extraction then looks at the classified columns first
//! and falls back to scanning the row's own keys.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::amount::parse_amount_value;
use super::columns::{ColumnKeywords, ColumnRole};
use super::date::parse_date;
use super::row::{NormalizedTransaction, RawRow};

/// Outcome of checking one row, in the order the checks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowVerdict {
    Valid,
    Empty,
    MissingDate,
    MissingAmount,
    MissingDescription,
}

impl RowVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, RowVerdict::Valid)
    }

    pub fn reason(&self) -> &'static str {
        match self {
            RowVerdict::Valid => "valid",
            RowVerdict::Empty => "empty row",
            RowVerdict::MissingDate => "missing date",
            RowVerdict::MissingAmount => "missing amount",
            RowVerdict::MissingDescription => "missing description",
        }
    }
}

impl std::fmt::Display for RowVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

#[derive(Debug, Clone)]
pub struct RowValidator {
    headers: Vec<String>,
    roles: Vec<ColumnRole>,
    keywords: ColumnKeywords,
}

impl RowValidator {
    /// Validator using the default English keyword table
    pub fn new(headers: &[String]) -> Self {
        Self::with_keywords(headers, ColumnKeywords::default())
    }

    pub fn with_keywords(headers: &[String], keywords: ColumnKeywords) -> Self {
        let roles = headers.iter().map(|h| keywords.classify(h)).collect();
        Self {
            headers: headers.to_vec(),
            roles,
            keywords,
        }
    }

    /// Validator whose schema is the row's own key list
    pub fn for_row(row: &RawRow, keywords: &ColumnKeywords) -> Self {
        Self::with_keywords(&row.headers(), keywords.clone())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn keywords(&self) -> &ColumnKeywords {
        &self.keywords
    }

    /// (header, role) pairs in header order
    pub fn roles(&self) -> impl Iterator<Item = (&str, ColumnRole)> {
        self.headers
            .iter()
            .zip(self.roles.iter())
            .map(|(h, r)| (h.as_str(), *r))
    }

    fn columns(&self, role: ColumnRole) -> Vec<&str> {
        self.roles()
            .filter(|(_, r)| *r == role)
            .map(|(h, _)| h)
            .collect()
    }

    pub fn date_columns(&self) -> Vec<&str> {
        self.columns(ColumnRole::Date)
    }

    pub fn amount_columns(&self) -> Vec<&str> {
        self.columns(ColumnRole::Amount)
    }

    pub fn description_columns(&self) -> Vec<&str> {
        self.columns(ColumnRole::Description)
    }

    pub fn extract_date(&self, row: &RawRow) -> Option<NaiveDate> {
        let classified = self
            .date_columns()
            .into_iter()
            .filter_map(|col| row.get(col))
            .find_map(parse_date);
        if classified.is_some() {
            return classified;
        }

        // Keys outside the schema the validator was built for
        row.iter()
            .filter(|(key, _)| self.keywords.is_date_like(key))
            .find_map(|(_, value)| parse_date(value))
    }

    pub fn extract_amount(&self, row: &RawRow) -> Option<Decimal> {
        let classified = self
            .amount_columns()
            .into_iter()
            .find_map(|col| self.parse_cell(col, row.get(col)?));
        if classified.is_some() {
            return classified;
        }

        let candidates: Vec<(&str, &str)> = row
            .iter()
            .filter(|(key, _)| self.keywords.is_amount_like(key))
            .collect();
        if !candidates.is_empty() {
            return candidates
                .into_iter()
                .find_map(|(key, value)| self.parse_cell(key, value));
        }

        // No amount-looking key at all: any column holding a number will do
        row.iter().find_map(|(key, value)| self.parse_cell(key, value))
    }

    fn parse_cell(&self, column: &str, value: &str) -> Option<Decimal> {
        if value.is_empty() {
            return None;
        }
        parse_amount_value(value, column, &self.keywords)
    }

    pub fn has_description(&self, row: &RawRow) -> bool {
        self.description(row).is_some()
    }

    /// First non-empty description value, trimmed
    ///
    /// Classified description columns are read first, then any key of the
    /// row that is neither date-like nor amount-like.
    pub fn description(&self, row: &RawRow) -> Option<String> {
        let non_empty = |v: &str| {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        };

        self.description_columns()
            .into_iter()
            .filter_map(|col| row.get(col))
            .find_map(non_empty)
            .or_else(|| {
                row.iter()
                    .filter(|(key, _)| self.keywords.is_description_like(key))
                    .find_map(|(_, value)| non_empty(value))
            })
    }

    pub fn normalize(&self, row: &RawRow) -> NormalizedTransaction {
        NormalizedTransaction {
            date: self.extract_date(row),
            amount: self.extract_amount(row),
            description: self.description(row),
        }
    }

    /// Run the date, amount and description checks in order, stopping at
    /// the first failure
    pub fn check_row(&self, row: &RawRow) -> RowVerdict {
        if row.is_empty() || row.is_blank() {
            return RowVerdict::Empty;
        }
        if self.extract_date(row).is_none() {
            return RowVerdict::MissingDate;
        }
        if self.extract_amount(row).is_none() {
            return RowVerdict::MissingAmount;
        }
        if !self.has_description(row) {
            return RowVerdict::MissingDescription;
        }
        RowVerdict::Valid
    }

    pub fn is_row_valid(&self, row: &RawRow) -> bool {
        self.check_row(row).is_valid()
    }
}
