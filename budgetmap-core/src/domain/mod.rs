//! Core domain
//!
//! Pure data and algorithms: column roles, field extraction, fingerprints
//! and reconciliation. No I/O happens here.

pub mod amount;
pub mod category;
pub mod columns;
pub mod date;
pub mod fingerprint;
pub mod mapping;
pub mod prompt;
pub mod reconcile;
pub mod result;
pub mod row;
pub mod validator;

pub use category::{default_categories, DEFAULT_CATEGORIES};
pub use columns::{ColumnKeywords, ColumnRole};
pub use fingerprint::{rows_match, Fingerprint};
pub use mapping::{MappingStore, RowMapping};
pub use reconcile::{CategoryIndex, MergeOutcome, ReconcileEngine};
pub use row::{NormalizedTransaction, RawRow};
pub use validator::{RowValidator, RowVerdict};
