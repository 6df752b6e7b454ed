//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod categorize;
mod category;
mod summary;
pub mod upload;

pub use categorize::{AutoMapResult, BulkAutoMapResult, BulkProgress, CategorizeService, Progress, Suggestion};
pub use category::{CategoryAdded, CategoryService};
pub use summary::{CategoryTotal, MonthTotal, MonthlySummary, SummaryService};
pub use upload::{ColumnReport, InspectReport, RowReport, UploadResult, UploadService};
