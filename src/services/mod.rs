pub mod catalog_service;
pub mod filter_builder;
pub mod import_reconciler;
pub mod spreadsheet;

pub use catalog_service::CatalogService;
pub use filter_builder::{CatalogFilterBuilder, FilterSpec};
pub use import_reconciler::{ColumnMap, ImportField, ImportReconciler};
pub use spreadsheet::{parse_spreadsheet, SpreadsheetUpload};
