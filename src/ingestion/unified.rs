//! Unified gate entrypoint.
//!
//! [`ingest`] runs the whole pipeline on in-memory bytes; [`ingest_from_path`] reads a file first
//! and infers its format from the extension.
//!
//! - A header that fails the column gate ends the run with a fatal message and no rows.
//! - Row-level validation failures are collected and never stop the run.
//! - Only infrastructure failures (I/O, unreadable workbook) come back as `Err`.
//! - If an [`IngestionObserver`] is configured, every outcome is reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::report::ReportBuilder;
use crate::types::{InputFormat, RawInput, Report};
use crate::validation::{validate_row, RowOutcome, SchemaDefinition};

use super::columns::validate_columns;
use super::normalize::normalize;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::rows::{build_record, RowSeparator};
use super::tokenize::{detect_separator, split_header, split_lines};

/// How to choose the sheet when the input is a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// Use the first sheet (default).
    #[default]
    First,
    /// Use a single named sheet.
    Sheet(String),
}

/// Options controlling a gate run.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Path-based runs only: if `None`, infer the format from the file extension.
    pub format: Option<InputFormat>,
    /// Sheet to read from workbooks.
    pub sheet: ExcelSheetSelection,
    /// Separator used for data rows. Defaults to comma regardless of the header.
    pub row_separator: RowSeparator,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("sheet", &self.sheet)
            .field("row_separator", &self.row_separator)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            sheet: ExcelSheetSelection::default(),
            row_separator: RowSeparator::default(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Run the gate on in-memory content.
///
/// # Examples
///
/// ```rust
/// use rust_data_gate::config::ColumnCatalog;
/// use rust_data_gate::ingestion::{ingest, IngestionOptions};
/// use rust_data_gate::types::RawInput;
/// use rust_data_gate::validation::{DataType, FieldSpec, SchemaDefinition, TypedSchema};
///
/// # fn main() -> Result<(), rust_data_gate::IngestionError> {
/// let schema = SchemaDefinition::new(
///     ColumnCatalog::from_names(["id", "name"]).require(["id"]),
///     TypedSchema::new(vec![
///         FieldSpec::new("id", DataType::Int64),
///         FieldSpec::new("name", DataType::Utf8),
///     ]),
/// );
///
/// let report = ingest(&RawInput::text("id,name\n1,Ada\nx,Bob\n"), &schema, &IngestionOptions::default())?;
/// assert_eq!(report.data_source.len(), 2);
/// assert_eq!(report.schema_fixes.len(), 1);
/// assert_eq!(report.row_errors().len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn ingest(input: &RawInput, schema: &SchemaDefinition, options: &IngestionOptions) -> IngestionResult<Report> {
    let ctx = IngestionContext {
        source: input.name().unwrap_or("<memory>").to_string(),
        format: input.format(),
    };

    let result = run(input, schema, options, &ctx);
    if let (Err(e), Some(obs)) = (&result, options.observer.as_ref()) {
        report_failure(obs.as_ref(), &ctx, options.alert_at_or_above, e);
    }
    result
}

fn run(
    input: &RawInput,
    schema: &SchemaDefinition,
    options: &IngestionOptions,
    ctx: &IngestionContext,
) -> IngestionResult<Report> {
    let observer = options.observer.as_deref();

    let text = normalize(input, &options.sheet)?;
    if text.is_empty() {
        return Ok(Report::default());
    }

    let lines = split_lines(&text);
    let header = lines.first().copied().unwrap_or_default();
    let header_separator = detect_separator(header);
    let columns = split_header(header);

    if let Some(message) = validate_columns(&columns, schema.catalog()) {
        if let Some(obs) = observer {
            obs.on_rejected(ctx, &message);
        }
        return Ok(ReportBuilder::rejected(message));
    }

    let mut builder = ReportBuilder::new(columns.clone());
    for (index, line) in lines.iter().skip(1).enumerate() {
        let Some(record) = build_record(index, line, &columns, options.row_separator, header_separator) else {
            builder.skip_blank();
            continue;
        };

        let outcome = validate_row(schema, index, &record);
        if let Some(obs) = observer {
            match &outcome {
                RowOutcome::Invalid(row_error) => obs.on_row_invalid(ctx, row_error),
                RowOutcome::Unexpected(detail) => obs.on_unexpected(ctx, record.line_no(), detail),
                RowOutcome::Fixed(_) => {}
            }
        }
        builder.push(record, outcome);
    }

    let stats = IngestionStats {
        records: builder.records(),
        fixed: builder.fixed(),
        invalid: builder.invalid(),
        skipped: builder.skipped(),
    };
    let report = builder.finish();
    if let Some(obs) = observer {
        obs.on_success(ctx, stats);
    }
    Ok(report)
}

fn report_failure(
    obs: &dyn IngestionObserver,
    ctx: &IngestionContext,
    alert_at_or_above: IngestionSeverity,
    e: &IngestionError,
) {
    let sev = severity_for_error(e);
    obs.on_failure(ctx, sev, e);
    if sev >= alert_at_or_above {
        obs.on_alert(ctx, sev, e);
    }
}

fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        #[cfg(feature = "excel")]
        IngestionError::Excel(_) => IngestionSeverity::Error,
        IngestionError::Json(_) => IngestionSeverity::Error,
        IngestionError::UnsupportedFormat { .. } => IngestionSeverity::Error,
        IngestionError::Workbook { .. } => IngestionSeverity::Error,
        IngestionError::InvalidConfig { .. } => IngestionSeverity::Error,
    }
}

/// Read a file and run the gate on it.
///
/// - If `options.format` is `None`, format is inferred from the file extension.
/// - The file name is used as the observer context source.
///
/// ```no_run
/// use std::sync::Arc;
///
/// use rust_data_gate::config::GateConfig;
/// use rust_data_gate::ingestion::{ingest_from_path, IngestionOptions, StdErrObserver};
///
/// # fn main() -> Result<(), rust_data_gate::IngestionError> {
/// let schema = GateConfig::from_path("gate.json")?.into_schema()?;
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(StdErrObserver::default())),
///     ..Default::default()
/// };
///
/// let report = ingest_from_path("upload.xlsx", &schema, &opts)?;
/// println!("clean={} rows={}", report.is_clean(), report.data_source.len());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    schema: &SchemaDefinition,
    options: &IngestionOptions,
) -> IngestionResult<Report> {
    let path = path.as_ref();
    let source = path.display().to_string();

    let loaded = match options.format {
        Some(f) => Ok(f),
        None => infer_format_from_path(path),
    }
    .and_then(|format| Ok((format, std::fs::read(path)?)));

    match loaded {
        Ok((format, content)) => ingest(&RawInput::new(content, format).with_name(source), schema, options),
        Err(e) => {
            if let Some(obs) = options.observer.as_ref() {
                let ctx = IngestionContext {
                    source,
                    format: options.format.unwrap_or(InputFormat::Text),
                };
                report_failure(obs.as_ref(), &ctx, options.alert_at_or_above, &e);
            }
            Err(e)
        }
    }
}

fn infer_format_from_path(path: &Path) -> IngestionResult<InputFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::UnsupportedFormat {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    InputFormat::from_extension(ext).ok_or_else(|| IngestionError::UnsupportedFormat {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

/// Convenience helper for callers that want an owned request object.
///
/// This can be useful if you want to enqueue gate runs in a job system.
#[derive(Clone)]
pub struct IngestionRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Column catalog and validator.
    pub schema: SchemaDefinition,
    /// Options controlling the run.
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("path", &self.path)
            .field("schema", &self.schema)
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Execute the request by calling [`ingest_from_path`].
    pub fn run(&self) -> IngestionResult<Report> {
        ingest_from_path(&self.path, &self.schema, &self.options)
    }
}
