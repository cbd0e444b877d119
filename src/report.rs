//! Folding per-row outcomes into a [`Report`].

use crate::types::{ErrorState, Record, Report};
use crate::validation::{RowOutcome, UNEXPECTED_ERROR_MESSAGE};

/// Accumulates one run's results. Owned by the run and consumed by [`Self::finish`].
#[derive(Debug, Default)]
pub struct ReportBuilder {
    report: Report,
    skipped: usize,
    invalid: usize,
}

impl ReportBuilder {
    /// Builder for a run whose header passed the column gate.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            report: Report {
                columns,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Report for a run stopped at the header: nothing but the message.
    pub fn rejected(message: impl Into<String>) -> Report {
        Report {
            error_state: Some(ErrorState::Fatal(message.into())),
            ..Default::default()
        }
    }

    /// Count a data line that was blank.
    pub fn skip_blank(&mut self) {
        self.skipped += 1;
    }

    /// Record one validated row.
    ///
    /// The raw record always lands in `data_source`, whether or not it validated. Once an
    /// unexpected failure has collapsed the error state to a message, later row errors are not
    /// added to the report.
    pub fn push(&mut self, record: Record, outcome: RowOutcome) {
        self.report.data_source.push(record);
        match outcome {
            RowOutcome::Fixed(fixed) => self.report.schema_fixes.push(fixed),
            RowOutcome::Invalid(row_error) => {
                self.invalid += 1;
                match &mut self.report.error_state {
                    None => self.report.error_state = Some(ErrorState::Rows(vec![row_error])),
                    Some(ErrorState::Rows(rows)) => rows.push(row_error),
                    Some(ErrorState::Fatal(_)) => {}
                }
            }
            RowOutcome::Unexpected(_) => {
                self.invalid += 1;
                self.report.error_state = Some(ErrorState::Fatal(UNEXPECTED_ERROR_MESSAGE.to_string()));
            }
        }
    }

    /// Records pushed so far.
    pub fn records(&self) -> usize {
        self.report.data_source.len()
    }

    /// Records the validator accepted so far.
    pub fn fixed(&self) -> usize {
        self.report.schema_fixes.len()
    }

    /// Blank data lines seen so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Rows that failed validation (field errors or unexpected failures) so far.
    pub fn invalid(&self) -> usize {
        self.invalid
    }

    pub fn finish(self) -> Report {
        self.report
    }
}
