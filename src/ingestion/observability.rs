use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IngestionError;
use crate::types::{InputFormat, RowError};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about a gate run.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// File name or caller-supplied label; `"<memory>"` when the input had none.
    pub source: String,
    /// Format used for normalization.
    pub format: InputFormat,
}

/// Counts reported when a run produces a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionStats {
    /// Records that reached schema validation.
    pub records: usize,
    /// Records the validator accepted.
    pub fixed: usize,
    /// Records that failed validation.
    pub invalid: usize,
    /// Blank data lines skipped.
    pub skipped: usize,
}

/// Observer interface for gate outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts. Every method has a no-op default.
pub trait IngestionObserver: Send + Sync {
    /// Called when a run produced a report (clean or not) past the header gate.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when the header gate rejected the file.
    fn on_rejected(&self, _ctx: &IngestionContext, _message: &str) {}

    /// Called for every row that failed field validation, even after the error state collapsed.
    fn on_row_invalid(&self, _ctx: &IngestionContext, _error: &RowError) {}

    /// Called when the validator failed unexpectedly on a row.
    fn on_unexpected(&self, _ctx: &IngestionContext, _line_no: usize, _detail: &str) {}

    /// Called when a run could not produce a report.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_rejected(&self, ctx: &IngestionContext, message: &str) {
        for o in &self.observers {
            o.on_rejected(ctx, message);
        }
    }

    fn on_row_invalid(&self, ctx: &IngestionContext, error: &RowError) {
        for o in &self.observers {
            o.on_row_invalid(ctx, error);
        }
    }

    fn on_unexpected(&self, ctx: &IngestionContext, line_no: usize, detail: &str) {
        for o in &self.observers {
            o.on_unexpected(ctx, line_no, detail);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs gate events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!("[gate][ok] {} {}", describe(ctx), describe_stats(stats));
    }

    fn on_rejected(&self, ctx: &IngestionContext, message: &str) {
        eprintln!("[gate][rejected] {} reason={message}", describe(ctx));
    }

    fn on_row_invalid(&self, ctx: &IngestionContext, error: &RowError) {
        eprintln!("[gate][row] {} {}", describe(ctx), describe_row(error));
    }

    fn on_unexpected(&self, ctx: &IngestionContext, line_no: usize, detail: &str) {
        eprintln!("[gate][unexpected] {} line={line_no} detail={detail}", describe(ctx));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!("[gate][{:?}] {} err={}", severity, describe(ctx), error);
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!("[ALERT][gate][{:?}] {} err={}", severity, describe(ctx), error);
    }
}

/// Appends gate events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", unix_ts());
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append_line(&format!("ok {} {}", describe(ctx), describe_stats(stats)));
    }

    fn on_rejected(&self, ctx: &IngestionContext, message: &str) {
        self.append_line(&format!("rejected {} reason={message}", describe(ctx)));
    }

    fn on_row_invalid(&self, ctx: &IngestionContext, error: &RowError) {
        self.append_line(&format!("row {} {}", describe(ctx), describe_row(error)));
    }

    fn on_unexpected(&self, ctx: &IngestionContext, line_no: usize, detail: &str) {
        self.append_line(&format!("unexpected {} line={line_no} detail={detail}", describe(ctx)));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&format!("fail severity={:?} {} err={}", severity, describe(ctx), error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append_line(&format!("ALERT severity={:?} {} err={}", severity, describe(ctx), error));
    }
}

fn describe(ctx: &IngestionContext) -> String {
    format!("format={:?} source={}", ctx.format, ctx.source)
}

fn describe_stats(stats: IngestionStats) -> String {
    format!(
        "records={} fixed={} invalid={} skipped={}",
        stats.records, stats.fixed, stats.invalid, stats.skipped
    )
}

fn describe_row(error: &RowError) -> String {
    let fields: Vec<String> = error
        .invalid_fields
        .iter()
        .map(|(field, message)| format!("{field}: {}", message.as_str().unwrap_or_default()))
        .collect();
    format!(
        "line={} fields=[{}]",
        error.current_row.data.line_no(),
        fields.join("; ")
    )
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CurrentRow, Record};

    fn ctx() -> IngestionContext {
        IngestionContext {
            source: "people.csv".to_string(),
            format: InputFormat::Text,
        }
    }

    #[test]
    fn file_observer_appends_one_line_per_event() {
        let path = std::env::temp_dir().join(format!("rust-data-gate-observer-{}.log", unix_ts_nanos()));
        let obs = FileObserver::new(&path);

        obs.on_rejected(&ctx(), "bad header");
        obs.on_row_invalid(
            &ctx(),
            &RowError {
                current_row: CurrentRow {
                    index: 0,
                    data: Record::new(2, vec![]),
                },
                invalid_fields: serde_json::Map::from_iter([("b".to_string(), serde_json::json!("Required"))]),
            },
        );
        obs.on_success(
            &ctx(),
            IngestionStats {
                records: 1,
                invalid: 1,
                ..Default::default()
            },
        );

        let log = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("rejected format=Text source=people.csv reason=bad header"));
        assert!(lines[1].ends_with("line=2 fields=[b: Required]"));
        assert!(lines[2].contains("records=1 fixed=0 invalid=1 skipped=0"));

        let _ = std::fs::remove_file(&path);
    }

    fn unix_ts_nanos() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    }
}
