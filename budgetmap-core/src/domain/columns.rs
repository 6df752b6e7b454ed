//! Column roles and the keyword table used to classify CSV headers

use serde::{Deserialize, Serialize};

/// Role a CSV column plays in a transaction row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Date,
    Amount,
    Description,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Date => "date",
            ColumnRole::Amount => "amount",
            ColumnRole::Description => "description",
        }
    }
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header keywords driving column classification and amount sign rules
///
/// Matching is a case-insensitive substring check against the header.
/// Overridable through `columnKeywords` in settings.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnKeywords {
    /// Headers containing any of these are dates
    pub date: Vec<String>,
    /// Headers containing any of these are amounts (unless already a date)
    pub amount: Vec<String>,
    /// Amount columns holding inflows; values are forced negative
    pub credit: Vec<String>,
    /// Amount columns holding outflows; negative values are flipped positive
    pub debit: Vec<String>,
}

impl Default for ColumnKeywords {
    fn default() -> Self {
        Self {
            date: vec!["date".to_string()],
            amount: ["amount", "debit", "credit", "value", "charge"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            credit: vec!["credit".to_string()],
            debit: vec!["debit".to_string()],
        }
    }
}

fn contains_any(header: &str, keywords: &[String]) -> bool {
    let header = header.to_lowercase();
    keywords
        .iter()
        .any(|k| !k.is_empty() && header.contains(&k.to_lowercase()))
}

impl ColumnKeywords {
    /// Classify a header. Date takes precedence over amount; everything
    /// else is a description column.
    pub fn classify(&self, header: &str) -> ColumnRole {
        if self.is_date_like(header) {
            ColumnRole::Date
        } else if self.is_amount_like(header) {
            ColumnRole::Amount
        } else {
            ColumnRole::Description
        }
    }

    pub fn is_date_like(&self, header: &str) -> bool {
        contains_any(header, &self.date)
    }

    pub fn is_amount_like(&self, header: &str) -> bool {
        contains_any(header, &self.amount)
    }

    pub fn is_credit(&self, header: &str) -> bool {
        contains_any(header, &self.credit)
    }

    pub fn is_debit(&self, header: &str) -> bool {
        contains_any(header, &self.debit)
    }

    /// True for headers that are neither date-like nor amount-like
    pub fn is_description_like(&self, header: &str) -> bool {
        !self.is_date_like(header) && !self.is_amount_like(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_defaults() {
        let kw = ColumnKeywords::default();
        assert_eq!(kw.classify("Transaction Date"), ColumnRole::Date);
        assert_eq!(kw.classify("AMOUNT"), ColumnRole::Amount);
        assert_eq!(kw.classify("Debit"), ColumnRole::Amount);
        assert_eq!(kw.classify("Credit"), ColumnRole::Amount);
        assert_eq!(kw.classify("Charge Total"), ColumnRole::Amount);
        assert_eq!(kw.classify("Memo"), ColumnRole::Description);
        assert_eq!(kw.classify("Running Balance"), ColumnRole::Description);
    }

    #[test]
    fn test_date_wins_over_amount() {
        let kw = ColumnKeywords::default();
        assert_eq!(kw.classify("Value Date"), ColumnRole::Date);
    }

    #[test]
    fn test_overridden_keywords() {
        let kw = ColumnKeywords {
            date: vec!["datum".to_string()],
            amount: vec!["betrag".to_string()],
            credit: vec!["haben".to_string()],
            debit: vec!["soll".to_string()],
        };
        assert_eq!(kw.classify("Buchungsdatum"), ColumnRole::Date);
        assert_eq!(kw.classify("Betrag (EUR)"), ColumnRole::Amount);
        assert_eq!(kw.classify("Date"), ColumnRole::Description);
        assert!(kw.is_credit("Haben"));
    }

    #[test]
    fn test_keywords_deserialize_partial() {
        let kw: ColumnKeywords = serde_json::from_str(r#"{"date": ["fecha"]}"#).unwrap();
        assert_eq!(kw.date, vec!["fecha".to_string()]);
        assert_eq!(kw.amount, ColumnKeywords::default().amount);
    }
}
