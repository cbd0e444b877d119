//! `rust-data-gate` is a small library that sits in front of bulk data uploads. It takes a
//! delimited text file or a spreadsheet, checks the header against a column catalog, and
//! classifies every row against a pluggable validator, producing a [`types::Report`].
//!
//! The primary entrypoints are [`ingestion::ingest`] (in-memory bytes) and
//! [`ingestion::ingest_from_path`] (reads a file and infers its format from the extension).
//!
//! ## What the gate does
//!
//! 1. **Normalize**: text is decoded, quoted substrings lose their quotes and any `,`/`;` inside,
//!    CRLF becomes LF. Spreadsheets (Cargo feature `excel`, on by default) are rendered from
//!    their first sheet as comma-separated text.
//! 2. **Gate the header**: the first line is split on `;` if it contains one, otherwise on `,`.
//!    Unknown, duplicate, or missing required columns end the run with a single message.
//! 3. **Tokenize rows**: each data line becomes a [`types::Record`] with a `lineNo` (the header
//!    is line 1). Blank lines are skipped, extra values dropped.
//! 4. **Validate rows**: the schema's [`validation::RecordValidator`] returns a
//!    [`types::FixedRecord`] or field issues. Failures are collected; the run never stops early.
//!
//! Only infrastructure problems (I/O, unreadable workbooks) are returned as
//! [`IngestionError`]; everything about the data is in the report.
//!
//! ## Quick example
//!
//! ```rust
//! use rust_data_gate::config::ColumnCatalog;
//! use rust_data_gate::ingestion::{ingest, IngestionOptions};
//! use rust_data_gate::types::RawInput;
//! use rust_data_gate::validation::{Constraint, DataType, FieldSpec, SchemaDefinition, TypedSchema};
//!
//! # fn main() -> Result<(), rust_data_gate::IngestionError> {
//! let schema = SchemaDefinition::new(
//!     ColumnCatalog::from_names(["a", "b", "c"]).require(["b"]),
//!     TypedSchema::new(vec![
//!         FieldSpec::new("a", DataType::Utf8),
//!         FieldSpec::new("b", DataType::Int64).with(Constraint::GreaterThan(1.0)),
//!     ]),
//! );
//!
//! let report = ingest(&RawInput::text("a,b\n1,2\n1,x\n"), &schema, &IngestionOptions::default())?;
//!
//! assert_eq!(report.columns, vec!["a", "b"]);
//! assert_eq!(report.data_source.len(), 2);
//! assert_eq!(report.schema_fixes[0].get("b"), Some(&serde_json::json!(2)));
//! assert_eq!(report.row_errors()[0].invalid_fields["b"], "Expected integer, received 'x'");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: gate entrypoints, pipeline stages and observers
//! - [`validation`]: validator trait, schema definition, shipped validators
//! - [`config`]: column catalog and JSON configuration
//! - [`report`]: the per-run report builder
//! - [`export`]: comma-separated output for accepted rows
//! - [`types`]: records, reports, input
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod report;
pub mod types;
pub mod validation;

pub use error::{IngestionError, IngestionResult};
