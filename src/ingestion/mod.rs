//! Gate entrypoints and pipeline stages.
//!
//! Most callers should use [`ingest`] or [`ingest_from_path`] (from [`unified`]) which:
//!
//! - normalize text or spreadsheet content into LF-separated text
//! - gate the header against the schema's column catalog
//! - tokenize each data row and validate it against the schema
//! - optionally report outcomes to an [`IngestionObserver`]
//!
//! The individual stages are public for callers that need them on their own:
//! - [`normalize`]
//! - [`tokenize`]
//! - [`columns`]
//! - [`rows`]

pub mod columns;
#[cfg(feature = "excel")]
pub mod excel;
pub mod normalize;
pub mod observability;
pub mod rows;
pub mod tokenize;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    StdErrObserver,
};
pub use rows::RowSeparator;
pub use unified::{ingest, ingest_from_path, ExcelSheetSelection, IngestionOptions, IngestionRequest};
