//! Integration tests for budgetmap-core services
//!
//! These tests run the services over a real JSON store in a temp directory.
//! The suggester is faked at the trait level.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use tempfile::TempDir;

use budgetmap_core::config::Config;
use budgetmap_core::ports::{CategorySuggester, MappingRepository, NoopObserver, RecordingObserver};
use budgetmap_core::{BudgetContext, EngineEvent, Error, Result, RowVerdict};

// ============================================================================
// Test Helpers
// ============================================================================

/// Suggester answering from a description → reply table
///
/// Descriptions listed in `failing` make the call error.
struct FakeSuggester {
    replies: Vec<(&'static str, &'static str)>,
    failing: Vec<&'static str>,
    calls: Mutex<usize>,
}

impl FakeSuggester {
    fn new(replies: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            replies,
            failing: Vec::new(),
            calls: Mutex::new(0),
        }
    }

    fn failing_on(mut self, description: &'static str) -> Self {
        self.failing.push(description);
        self
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl CategorySuggester for FakeSuggester {
    fn name(&self) -> &str {
        "fake"
    }

    fn suggest(&self, prompt: &str) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        // Only look at the transaction block, not the examples
        let transaction = prompt.rsplit("Transaction:").next().unwrap_or("");
        if self.failing.iter().any(|d| transaction.contains(d)) {
            return Err(Error::suggester("connection refused"));
        }
        Ok(self
            .replies
            .iter()
            .find(|(desc, _)| transaction.contains(desc))
            .map(|(_, reply)| reply.to_string())
            .unwrap_or_else(|| "I am not sure".to_string()))
    }
}

fn create_context(temp_dir: &TempDir, suggester: Arc<FakeSuggester>) -> BudgetContext {
    BudgetContext::with_suggester(temp_dir.path(), Config::default(), suggester)
        .expect("Failed to create context")
}

fn default_context(temp_dir: &TempDir) -> BudgetContext {
    create_context(temp_dir, Arc::new(FakeSuggester::new(Vec::new())))
}

fn upload(ctx: &BudgetContext, filename: &str, csv: &str) -> budgetmap_core::services::UploadResult {
    ctx.upload_service
        .upload_bytes(filename, csv.as_bytes(), &NoopObserver)
        .expect("upload failed")
}

const STATEMENT: &str = "\
Date,Description,Amount
12/30/2024,Whole Foods,-54.10
12/31/2024,Shell,-40.00
01/02/2025,Netflix,-15.99
";

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

// ============================================================================
// Upload and Re-upload Tests
// ============================================================================

#[test]
fn test_reupload_carries_manual_mapping() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    let first = upload(&ctx, "a.csv", STATEMENT);
    assert_eq!(first.valid_rows, 3);
    assert!(first.preview.iter().all(|r| !r.mapped));

    ctx.categorize_service.map_row("a.csv", 0, "Groceries").unwrap();

    let second = upload(&ctx, "a.csv", STATEMENT);
    assert_eq!(second.carried_rows, 1);
    assert_eq!(second.preserved_rows, 0);

    let rows = ctx.repository.load_file("a.csv").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].mapped_category(), Some("Groceries"));
    assert!(!rows[1].mapped);
}

#[test]
fn test_upload_skips_invalid_rows() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    let csv = "\
Date,Description,Amount
2024-01-01,Coffee,3.50
not a date,Tea,2.00
2024-01-03,Bagel,
2024-01-04,,1.00
2024-01-05,Lunch,12.00
";
    let observer = RecordingObserver::new();
    let result = ctx
        .upload_service
        .upload_bytes("b.csv", csv.as_bytes(), &observer)
        .unwrap();

    assert_eq!(result.total_rows, 5);
    assert_eq!(result.valid_rows, 2);
    assert_eq!(result.skipped_rows, 3);

    let rejected: Vec<(usize, RowVerdict)> = observer
        .events()
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::RowRejected { row_number, reason } => Some((row_number, reason)),
            _ => None,
        })
        .collect();
    assert_eq!(
        rejected,
        vec![
            (2, RowVerdict::MissingDate),
            (3, RowVerdict::MissingAmount),
            (4, RowVerdict::MissingDescription),
        ]
    );

    // Valid rows are numbered consecutively
    let rows = ctx.repository.load_file("b.csv").unwrap();
    assert_eq!(rows.iter().map(|r| r.row_index).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(rows[1].source_file.as_deref(), Some("b.csv"));
}

#[test]
fn test_all_rows_invalid_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);
    let result = upload(&ctx, "c.csv", "Date,Amount\n2024-01-01,5.00\n");
    assert_eq!(result.valid_rows, 0);
    assert_eq!(result.skipped_rows, 1);
    assert!(result.preview.is_empty());
}

#[test]
fn test_upload_without_valid_rows_leaves_store_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    upload(&ctx, "good.csv", STATEMENT);
    ctx.categorize_service.map_row("good.csv", 0, "Groceries").unwrap();

    let result = upload(&ctx, "bad.csv", "Date,Amount\n2024-01-01,5.00\n");
    assert_eq!(result.valid_rows, 0);

    assert_eq!(ctx.repository.active_file().unwrap().as_deref(), Some("good.csv"));
    let store = ctx.repository.load_store().unwrap();
    assert_eq!(store.file_names().collect::<Vec<_>>(), vec!["good.csv"]);
    assert_eq!(ctx.categorize_service.resolve_file(None).unwrap(), "good.csv");

    // Same for a re-upload of a stored file
    upload(&ctx, "good.csv", "Date,Amount\n2024-01-01,5.00\n");
    let rows = ctx.repository.load_file("good.csv").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].category.as_deref(), Some("Groceries"));
}

#[test]
fn test_reordered_columns_keep_categories() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    upload(&ctx, "a.csv", STATEMENT);
    ctx.categorize_service.map_row("a.csv", 2, "Entertainment").unwrap();

    let reordered = "\
Amount,Posted Date,Memo
-54.10,2024-12-30,WHOLE FOODS
-40.00,2024-12-31,SHELL
-15.99,2025-01-02,NETFLIX
";
    let result = upload(&ctx, "a.csv", reordered);
    assert_eq!(result.carried_rows, 1);
    let rows = ctx.repository.load_file("a.csv").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].mapped_category(), Some("Entertainment"));
}

#[test]
fn test_partial_reupload_preserves_missing_rows() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    upload(&ctx, "a.csv", STATEMENT);
    ctx.categorize_service.map_row("a.csv", 1, "Transportation").unwrap();
    ctx.categorize_service.map_row("a.csv", 2, "Entertainment").unwrap();

    let result = upload(&ctx, "a.csv", "Date,Description,Amount\n12/30/2024,Whole Foods,-54.10\n");
    assert_eq!(result.valid_rows, 1);
    assert_eq!(result.preserved_rows, 2);

    let rows = ctx.repository.load_file("a.csv").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].mapped_category(), Some("Transportation"));
    assert_eq!(rows[2].mapped_category(), Some("Entertainment"));
    assert_eq!(rows.iter().map(|r| r.row_index).collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[test]
fn test_partial_reupload_renumbers_rows_by_position() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    upload(&ctx, "a.csv", STATEMENT);
    ctx.categorize_service.map_row("a.csv", 0, "Groceries").unwrap();

    let result = upload(&ctx, "a.csv", "Date,Description,Amount\n01/02/2025,Netflix,-15.99\n");
    assert_eq!(result.preserved_rows, 2);

    let rows = ctx.repository.load_file("a.csv").unwrap();
    assert_eq!(rows.iter().map(|r| r.row_index).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(rows[0].original_data.get("Description"), Some("Netflix"));
    assert_eq!(rows[1].mapped_category(), Some("Groceries"));

    // Positions and indexes address the same row
    ctx.categorize_service.map_row("a.csv", 2, "Transportation").unwrap();
    let rows = ctx.repository.load_file("a.csv").unwrap();
    assert_eq!(rows[2].original_data.get("Description"), Some("Shell"));
    assert_eq!(rows[2].mapped_category(), Some("Transportation"));
}

#[test]
fn test_other_files_prefill_new_upload() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    upload(&ctx, "december.csv", STATEMENT);
    ctx.categorize_service.map_row("december.csv", 1, "Transportation").unwrap();

    let export = "\
Transaction Date,Payee,Debit,Credit
12/31/2024,Shell,40.00,
";
    // Debit 40.00 is +40.00, a different amount from -40.00, so no prefill
    let result = upload(&ctx, "export.csv", export);
    assert_eq!(result.prefilled_rows, 0);

    let result = upload(&ctx, "copy.csv", STATEMENT);
    assert_eq!(result.prefilled_rows, 1);
    let rows = ctx.repository.load_file("copy.csv").unwrap();
    assert_eq!(rows[1].mapped_category(), Some("Transportation"));
}

#[test]
fn test_corrupt_store_treated_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("mappings.json"), "{\"a.csv\": [{").unwrap();
    let ctx = default_context(&temp_dir);

    let result = upload(&ctx, "a.csv", STATEMENT);
    assert_eq!(result.valid_rows, 3);
    assert_eq!(result.preserved_rows, 0);

    let content = std::fs::read_to_string(temp_dir.path().join("mappings.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["a.csv"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_upload_rejects_bad_files() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    let err = ctx
        .upload_service
        .upload_bytes("a.txt", STATEMENT.as_bytes(), &NoopObserver)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = ctx
        .upload_service
        .upload_bytes("a.csv", b"", &NoopObserver)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_upload_path_uses_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    let csv_path = temp_dir.path().join("statement.csv");
    std::fs::write(&csv_path, STATEMENT).unwrap();
    let result = ctx.upload_service.upload_path(&csv_path, &NoopObserver).unwrap();
    assert_eq!(result.filename, "statement.csv");
    assert_eq!(
        ctx.categorize_service.resolve_file(None).unwrap(),
        "statement.csv"
    );
}

// ============================================================================
// Categorization Tests
// ============================================================================

#[test]
fn test_map_row_errors_and_new_categories() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);
    upload(&ctx, "a.csv", STATEMENT);

    assert!(matches!(
        ctx.categorize_service.map_row("missing.csv", 0, "Travel"),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        ctx.categorize_service.map_row("a.csv", 3, "Travel"),
        Err(Error::Validation(_))
    ));

    let row = ctx.categorize_service.map_row("a.csv", 0, "groceries").unwrap();
    assert_eq!(row.category.as_deref(), Some("Groceries"));

    let row = ctx.categorize_service.map_row("a.csv", 1, "car  stuff").unwrap();
    assert_eq!(row.category.as_deref(), Some("Car Stuff"));
    assert!(ctx.category_service.list().unwrap().contains(&"Car Stuff".to_string()));

    let progress = ctx.categorize_service.progress("a.csv").unwrap();
    assert_eq!(progress.total_rows, 3);
    assert_eq!(progress.mapped_count, 2);
}

#[test]
fn test_suggest_does_not_persist() {
    let temp_dir = TempDir::new().unwrap();
    let suggester = Arc::new(FakeSuggester::new(vec![("Netflix", "\"entertainment\".")]));
    let ctx = create_context(&temp_dir, suggester.clone());
    upload(&ctx, "a.csv", STATEMENT);

    let observer = RecordingObserver::new();
    let suggestion = ctx.categorize_service.suggest("a.csv", 2, &observer).unwrap();
    assert_eq!(suggestion.category, "Entertainment");
    assert!(suggestion.known);
    assert!(suggestion.corrected);
    assert_eq!(suggester.calls(), 1);
    assert_eq!(
        observer.count(|e| matches!(e, EngineEvent::SuggestionReceived { .. })),
        1
    );

    let rows = ctx.repository.load_file("a.csv").unwrap();
    assert!(!rows[2].mapped);
}

#[test]
fn test_auto_map_applies_known_only() {
    let temp_dir = TempDir::new().unwrap();
    let suggester = Arc::new(FakeSuggester::new(vec![
        ("Netflix", "Entertainment"),
        ("Shell", "Fuel for the car"),
    ]));
    let ctx = create_context(&temp_dir, suggester);
    upload(&ctx, "a.csv", STATEMENT);

    let applied = ctx.categorize_service.auto_map("a.csv", 2, &NoopObserver).unwrap();
    assert!(applied.applied);
    let skipped = ctx.categorize_service.auto_map("a.csv", 1, &NoopObserver).unwrap();
    assert!(!skipped.applied);

    let rows = ctx.repository.load_file("a.csv").unwrap();
    assert_eq!(rows[2].mapped_category(), Some("Entertainment"));
    assert!(!rows[1].mapped);
}

#[test]
fn test_bulk_auto_map_survives_failures() {
    let temp_dir = TempDir::new().unwrap();
    let suggester = Arc::new(
        FakeSuggester::new(vec![
            ("Whole Foods", "Groceries"),
            ("Netflix", "Category: Entertainment"),
        ])
        .failing_on("Shell"),
    );
    let ctx = create_context(&temp_dir, suggester.clone());
    upload(&ctx, "a.csv", STATEMENT);

    let mut ticks = Vec::new();
    let result = ctx
        .categorize_service
        .bulk_auto_map("a.csv", &NoopObserver, |p| ticks.push((p.done, p.total)))
        .unwrap();

    assert_eq!(result.total, 3);
    assert_eq!(result.mapped, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.unresolved, 0);
    assert_eq!(ticks, vec![(1, 3), (2, 3), (3, 3)]);

    let rows = ctx.repository.load_file("a.csv").unwrap();
    assert_eq!(rows[0].mapped_category(), Some("Groceries"));
    assert!(!rows[1].mapped);
    assert_eq!(rows[2].mapped_category(), Some("Entertainment"));

    // Mapped rows are not asked again
    let again = ctx
        .categorize_service
        .bulk_auto_map("a.csv", &NoopObserver, |_| {})
        .unwrap();
    assert_eq!(again.total, 1);
    assert_eq!(suggester.calls(), 4);
}

#[test]
fn test_reset_file_keeps_rows() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);
    upload(&ctx, "a.csv", STATEMENT);
    ctx.categorize_service.map_row("a.csv", 0, "Groceries").unwrap();
    ctx.categorize_service.map_row("a.csv", 1, "Transportation").unwrap();
    let before = ctx.repository.load_file("a.csv").unwrap();

    assert_eq!(ctx.categorize_service.reset_file("a.csv").unwrap(), 3);

    let after = ctx.repository.load_file("a.csv").unwrap();
    assert_eq!(after.len(), 3);
    assert!(after.iter().all(|r| !r.mapped && r.category.is_none()));
    for (b, a) in before.iter().zip(&after) {
        assert_eq!(b.original_data, a.original_data);
    }
}

// ============================================================================
// Category and Summary Tests
// ============================================================================

#[test]
fn test_category_add_and_remove() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    let added = ctx.category_service.add("pet care").unwrap();
    assert!(added.added);
    assert_eq!(added.category, "Pet Care");

    let again = ctx.category_service.add("PET CARE").unwrap();
    assert!(!again.added);
    assert_eq!(ctx.category_service.list().unwrap().len(), 16);

    assert_eq!(ctx.category_service.remove("pet care").unwrap(), "Pet Care");
    assert!(matches!(ctx.category_service.remove("pet care"), Err(Error::NotFound(_))));
}

#[test]
fn test_monthly_summary() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    upload(&ctx, "a.csv", STATEMENT);
    upload(
        &ctx,
        "b.csv",
        "Date,Description,Debit,Credit\n2024-12-15,Trader Joes,20.00,\n2024-12-20,Paycheck,,1000.00\n",
    );
    ctx.categorize_service.map_row("a.csv", 0, "Groceries").unwrap();
    ctx.categorize_service.map_row("a.csv", 2, "Entertainment").unwrap();
    ctx.categorize_service.map_row("b.csv", 0, "Groceries").unwrap();
    ctx.categorize_service.map_row("b.csv", 1, "Income").unwrap();

    let summary = ctx.summary_service.monthly(&NoopObserver).unwrap();
    let entries: Vec<(&str, &str, Decimal, usize)> = summary
        .categories
        .iter()
        .map(|c| (c.month.as_str(), c.category.as_str(), c.total, c.count))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("2024-12", "Groceries", dec("-34.10"), 2),
            ("2024-12", "Income", dec("-1000.00"), 1),
            ("2025-01", "Entertainment", dec("-15.99"), 1),
        ]
    );
    assert_eq!(summary.months.len(), 2);
    assert_eq!(summary.months[0].count, 3);
    assert_eq!(summary.skipped_rows, 0);
}

#[test]
fn test_monthly_summary_skips_rows_that_overflow_a_total() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = default_context(&temp_dir);

    upload(
        &ctx,
        "big.csv",
        "Date,Description,Amount\n\
         2024-03-01,Big A,79228162514264337593543950335\n\
         2024-03-02,Big B,79228162514264337593543950335\n",
    );
    ctx.categorize_service.map_row("big.csv", 0, "Other").unwrap();
    ctx.categorize_service.map_row("big.csv", 1, "Other").unwrap();

    let observer = RecordingObserver::new();
    let summary = ctx.summary_service.monthly(&observer).unwrap();

    assert_eq!(summary.categories.len(), 1);
    assert_eq!(summary.categories[0].total, Decimal::MAX);
    assert_eq!(summary.categories[0].count, 1);
    assert_eq!(summary.months[0].total, Decimal::MAX);
    assert_eq!(summary.skipped_rows, 1);
    assert_eq!(
        observer.count(|e| matches!(e, EngineEvent::ExtractionFailed { field: "amount", .. })),
        1
    );
}
