//! Content identity for transaction rows
//!
//! A fingerprint hashes the extracted (date, amount, description) triple, so
//! it survives column reordering and header renames that keep roles intact.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use super::columns::ColumnKeywords;
use super::row::RawRow;
use super::validator::RowValidator;

/// Bytes of the SHA-256 digest kept (128 bits)
const DIGEST_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    digest: String,
    empty: bool,
}

impl Fingerprint {
    /// Fingerprint of an already-extracted triple
    pub fn from_parts(date: Option<NaiveDate>, amount: Option<Decimal>, description: Option<&str>) -> Self {
        let date = date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        let amount = amount
            .map(|a| {
                let a = a.round_dp(2);
                // -0.00 hashes as 0.00
                let a = if a.is_zero() { Decimal::ZERO } else { a };
                format!("{:.2}", a)
            })
            .unwrap_or_default();
        let description = description
            .map(|d| d.trim().to_lowercase())
            .unwrap_or_default();

        let empty = date.is_empty() && amount.is_empty() && description.is_empty();
        let input = format!("{}|{}|{}", date, amount, description);

        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        let hash = hasher.finalize();

        Self {
            digest: hex::encode(&hash[..DIGEST_BYTES]),
            empty,
        }
    }

    /// Fingerprint a row using a validator built from the row's own keys
    pub fn of_row(row: &RawRow, keywords: &ColumnKeywords) -> Self {
        let validator = RowValidator::for_row(row, keywords);
        Self::with_validator(row, &validator)
    }

    pub fn with_validator(row: &RawRow, validator: &RowValidator) -> Self {
        let description = validator.description(row);
        Self::from_parts(
            validator.extract_date(row),
            validator.extract_amount(row),
            description.as_deref(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.digest
    }

    /// True when nothing could be extracted; such fingerprints never match
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Equal and non-empty
    pub fn matches(&self, other: &Fingerprint) -> bool {
        !self.empty && !other.empty && self.digest == other.digest
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digest)
    }
}

/// Same transaction?
///
/// Fingerprints decide when they agree. Otherwise rows with identical key
/// sets match when every value agrees ignoring case and surrounding space.
pub fn rows_match(a: &RawRow, b: &RawRow, keywords: &ColumnKeywords) -> bool {
    let fa = Fingerprint::of_row(a, keywords);
    let fb = Fingerprint::of_row(b, keywords);
    fingerprints_or_values_match(a, &fa, b, &fb)
}

pub(crate) fn fingerprints_or_values_match(a: &RawRow, fa: &Fingerprint, b: &RawRow, fb: &Fingerprint) -> bool {
    fa.matches(fb) || values_match(a, b)
}

fn values_match(a: &RawRow, b: &RawRow) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().all(|(key, value)| match b.get(key) {
        Some(other) => value.trim().to_lowercase() == other.trim().to_lowercase(),
        None => false,
    })
}
