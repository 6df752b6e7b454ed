//! Summary service - monthly spending per category

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{ColumnKeywords, RowValidator};
use crate::ports::{EngineEvent, EngineObserver, MappingRepository};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub month: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthlySummary {
    /// Sorted by month, then category
    pub categories: Vec<CategoryTotal>,
    /// Sorted by month
    pub months: Vec<MonthTotal>,
    /// Mapped rows without an extractable date or amount, or whose amount
    /// would overflow a total
    pub skipped_rows: usize,
}

pub struct SummaryService {
    repository: Arc<dyn MappingRepository>,
    keywords: ColumnKeywords,
}

impl SummaryService {
    pub fn new(repository: Arc<dyn MappingRepository>, keywords: ColumnKeywords) -> Self {
        Self { repository, keywords }
    }

    /// Totals of every mapped row across all stored files, grouped by
    /// `YYYY-MM` and category
    pub fn monthly(&self, observer: &dyn EngineObserver) -> Result<MonthlySummary> {
        let store = self.repository.load_store()?;

        let mut by_category: BTreeMap<(String, String), (Decimal, usize)> = BTreeMap::new();
        let mut by_month: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
        let mut skipped_rows = 0;

        for mapping in store.rows() {
            let Some(category) = mapping.mapped_category() else {
                continue;
            };
            let row = &mapping.original_data;
            let validator = RowValidator::for_row(row, &self.keywords);

            let Some(date) = validator.extract_date(row) else {
                skipped_rows += 1;
                observer.on_event(&EngineEvent::ExtractionFailed {
                    field: "date",
                    columns: row.headers(),
                });
                continue;
            };
            let Some(amount) = validator.extract_amount(row) else {
                skipped_rows += 1;
                observer.on_event(&EngineEvent::ExtractionFailed {
                    field: "amount",
                    columns: row.headers(),
                });
                continue;
            };

            let month = date.format("%Y-%m").to_string();
            let key = (month.clone(), category.to_string());
            let category_total = by_category.get(&key).map_or(Decimal::ZERO, |e| e.0).checked_add(amount);
            let month_total = by_month.get(&month).map_or(Decimal::ZERO, |e| e.0).checked_add(amount);
            let (Some(category_total), Some(month_total)) = (category_total, month_total) else {
                skipped_rows += 1;
                observer.on_event(&EngineEvent::ExtractionFailed {
                    field: "amount",
                    columns: row.headers(),
                });
                continue;
            };

            let entry = by_category.entry(key).or_insert((Decimal::ZERO, 0));
            *entry = (category_total, entry.1 + 1);
            let entry = by_month.entry(month).or_insert((Decimal::ZERO, 0));
            *entry = (month_total, entry.1 + 1);
        }

        Ok(MonthlySummary {
            categories: by_category
                .into_iter()
                .map(|((month, category), (total, count))| CategoryTotal {
                    month,
                    category,
                    total,
                    count,
                })
                .collect(),
            months: by_month
                .into_iter()
                .map(|(month, (total, count))| MonthTotal { month, total, count })
                .collect(),
            skipped_rows,
        })
    }
}
