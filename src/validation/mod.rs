//! Pluggable per-record schema validation.
//!
//! A [`SchemaDefinition`] pairs a [`ColumnCatalog`] (used by the header gate) with a
//! [`RecordValidator`] (run on every record). Validators return an explicit
//! [`ValidationFailure`]; [`validate_row`] turns the result into a [`RowOutcome`] for the report
//! builder.
//!
//! Shipped validators:
//!
//! - [`TypedSchema`]: typed fields with simple constraints
//! - [`PassThrough`]: accepts every record, values stay strings
//! - any `Fn(&Record) -> ValidationResult + Send + Sync` closure

mod typed;

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;

use crate::config::ColumnCatalog;
use crate::types::{CurrentRow, FixedRecord, Record, RowError};

pub use typed::{Constraint, DataType, FieldSpec, TypedSchema};

/// Message stored in the report when a validator fails in an unexpected way.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// One failing field and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Why a validator did not produce a [`FixedRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// Structured, per-field failure. The row is reported and processing continues.
    #[error("{} field(s) failed validation", .0.len())]
    Fields(Vec<FieldIssue>),
    /// The validator itself is broken for this input (not a data problem).
    #[error("unexpected validation failure: {0}")]
    Unexpected(String),
}

/// Result of a single [`RecordValidator::validate`] call.
pub type ValidationResult = Result<FixedRecord, ValidationFailure>;

/// Validating transform from a raw [`Record`] to a [`FixedRecord`].
pub trait RecordValidator: Send + Sync {
    fn validate(&self, record: &Record) -> ValidationResult;
}

impl<F> RecordValidator for F
where
    F: Fn(&Record) -> ValidationResult + Send + Sync,
{
    fn validate(&self, record: &Record) -> ValidationResult {
        self(record)
    }
}

/// Accepts every record unchanged; each value becomes a JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl RecordValidator for PassThrough {
    fn validate(&self, record: &Record) -> ValidationResult {
        let values = record
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        Ok(FixedRecord::for_record(record, values))
    }
}

/// Column vocabulary plus record validator. Immutable once built.
#[derive(Clone)]
pub struct SchemaDefinition {
    catalog: ColumnCatalog,
    validator: Arc<dyn RecordValidator>,
}

impl SchemaDefinition {
    pub fn new(catalog: ColumnCatalog, validator: impl RecordValidator + 'static) -> Self {
        Self {
            catalog,
            validator: Arc::new(validator),
        }
    }

    /// Share an existing validator between several definitions.
    pub fn with_shared(catalog: ColumnCatalog, validator: Arc<dyn RecordValidator>) -> Self {
        Self { catalog, validator }
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    pub fn validate(&self, record: &Record) -> ValidationResult {
        self.validator.validate(record)
    }
}

impl fmt::Debug for SchemaDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDefinition")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

/// Classified result of validating one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Fixed(FixedRecord),
    Invalid(RowError),
    /// Validator defect; carries the detail for logging.
    Unexpected(String),
}

/// Run the schema's validator on one record.
///
/// A panicking validator is treated as an unexpected failure rather than aborting the run.
pub fn validate_row(schema: &SchemaDefinition, index: usize, record: &Record) -> RowOutcome {
    let result = catch_unwind(AssertUnwindSafe(|| schema.validate(record)))
        .unwrap_or_else(|panic| Err(ValidationFailure::Unexpected(panic_message(panic.as_ref()))));

    match result {
        Ok(fixed) => RowOutcome::Fixed(fixed),
        Err(ValidationFailure::Fields(issues)) => {
            let mut invalid_fields = serde_json::Map::new();
            for issue in issues {
                invalid_fields.insert(issue.field, serde_json::Value::String(issue.message));
            }
            RowOutcome::Invalid(RowError {
                current_row: CurrentRow {
                    index,
                    data: record.clone(),
                },
                invalid_fields,
            })
        }
        Err(ValidationFailure::Unexpected(detail)) => RowOutcome::Unexpected(detail),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "validator panicked".to_string()
    }
}
