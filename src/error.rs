use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned when a run cannot produce a [`crate::types::Report`] at all.
///
/// Header problems and row validation failures are *not* errors at this level: they are data,
/// carried in [`crate::types::Report::error_state`].
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Workbook could not be opened or a sheet could not be read (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Delimited output could not be written.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration JSON could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input format is unknown or not enabled in this build.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// The workbook opened but has nothing to read.
    #[error("workbook error: {message}")]
    Workbook { message: String },

    /// The gate configuration is internally inconsistent.
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
}
