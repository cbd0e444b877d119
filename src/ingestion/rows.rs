//! Data line -> [`Record`].

use crate::types::Record;

use super::tokenize::{strip_separator_noise, Separator};

/// Separator used to split data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowSeparator {
    /// Always split rows on `,`, whatever the header used.
    #[default]
    Comma,
    /// Split rows on the separator detected in the header.
    Header,
}

impl RowSeparator {
    fn resolve(self, header: Separator) -> char {
        match self {
            Self::Comma => ',',
            Self::Header => header.as_char(),
        }
    }
}

/// Source line number for the data line at `index` (0-based among data lines).
///
/// The header is line 1, so the first data line is line 2.
pub fn line_no_for(index: usize) -> usize {
    index + 2
}

/// Tokenize one data line into a [`Record`].
///
/// Returns `None` for a line that is empty once separator noise is stripped. Tokens past the
/// last header column are dropped; short rows simply leave trailing columns out.
pub fn build_record(
    index: usize,
    line: &str,
    columns: &[String],
    row_separator: RowSeparator,
    header_separator: Separator,
) -> Option<Record> {
    if strip_separator_noise(line).is_empty() {
        return None;
    }

    let fields = line
        .split(row_separator.resolve(header_separator))
        .zip(columns)
        .map(|(token, column)| (column.clone(), strip_separator_noise(token)))
        .collect();

    Some(Record::new(line_no_for(index), fields))
}
