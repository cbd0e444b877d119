//! Core data model for a gate run.
//!
//! A run turns a [`RawInput`] into a [`Report`]. Rows travel through the pipeline as [`Record`]s
//! (raw strings keyed by header column) and, once a validator accepts them, as [`FixedRecord`]s
//! (typed JSON values).

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Discriminator for how raw bytes are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma/semicolon delimited text.
    Text,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Spreadsheet,
}

impl InputFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::Text),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    /// Classify an upload by its MIME content type.
    ///
    /// Only the two Excel content types select [`InputFormat::Spreadsheet`]; everything else is
    /// read as text.
    pub fn from_content_type(content_type: &str) -> Self {
        match content_type.trim() {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel" => Self::Spreadsheet,
            _ => Self::Text,
        }
    }

    /// Whether this input goes through the spreadsheet path.
    pub fn is_spreadsheet(self) -> bool {
        matches!(self, Self::Spreadsheet)
    }
}

/// File content for one run, read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    content: Vec<u8>,
    format: InputFormat,
    name: Option<String>,
}

impl RawInput {
    /// Wrap raw bytes with their format.
    pub fn new(content: impl Into<Vec<u8>>, format: InputFormat) -> Self {
        Self {
            content: content.into(),
            format,
            name: None,
        }
    }

    /// Convenience for already-decoded delimited text.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(content.into().into_bytes(), InputFormat::Text)
    }

    /// Attach a display name (file name, upload id) used in observer callbacks.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// One data row: header column name -> trimmed string value, plus its source line number.
///
/// Columns the row did not supply (short rows) are absent rather than empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    line_no: usize,
    fields: Vec<(String, String)>,
}

impl Record {
    /// Build a record from `(column, value)` pairs in header order.
    pub fn new(line_no: usize, fields: Vec<(String, String)>) -> Self {
        Self { line_no, fields }
    }

    /// 1-based source line (the header is line 1).
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Value for `column`, if the row supplied one.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of supplied fields (excluding `lineNo`).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("lineNo", &self.line_no.to_string())?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A record after a validator accepted (and possibly transformed) it.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedRecord {
    line_no: usize,
    values: serde_json::Map<String, serde_json::Value>,
}

impl FixedRecord {
    /// Build a fixed record for the row at `line_no`.
    ///
    /// A `lineNo` key inside `values` is dropped; the line number is always the source one.
    pub fn new(line_no: usize, mut values: serde_json::Map<String, serde_json::Value>) -> Self {
        values.retain(|k, _| k != "lineNo");
        Self { line_no, values }
    }

    /// Build a fixed record carrying the line number of `record`.
    pub fn for_record(record: &Record, values: serde_json::Map<String, serde_json::Value>) -> Self {
        Self::new(record.line_no(), values)
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.values.get(field)
    }

    pub fn values(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.values
    }
}

impl Serialize for FixedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("lineNo", &self.line_no.to_string())?;
        for (k, v) in &self.values {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// The row a [`RowError`] refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentRow {
    /// 0-based position among data lines (blank lines included).
    pub index: usize,
    /// The raw record as tokenized.
    pub data: Record,
}

/// Field-level validation failure for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub current_row: CurrentRow,
    /// Failing field -> message (a JSON string), in the order the validator reported them.
    /// A later message for the same field replaces the earlier one and keeps its position.
    pub invalid_fields: serde_json::Map<String, serde_json::Value>,
}

/// Error state of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorState {
    /// A single message: header rejection or an unexpected validator failure.
    Fatal(String),
    /// One entry per row that failed field validation, in file order.
    Rows(Vec<RowError>),
}

/// Outcome of one gate run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Header column names in header order. Empty when the header was rejected.
    pub columns: Vec<String>,
    /// Every tokenized record that reached schema validation, including ones that failed it.
    pub data_source: Vec<Record>,
    /// Validator output for the records that passed.
    pub schema_fixes: Vec<FixedRecord>,
    /// `None` for a clean run.
    pub error_state: Option<ErrorState>,
}

impl Report {
    /// `true` when no header or row problem was found.
    pub fn is_clean(&self) -> bool {
        self.error_state.is_none()
    }

    /// The fatal message, if the run ended in one.
    pub fn fatal_message(&self) -> Option<&str> {
        match &self.error_state {
            Some(ErrorState::Fatal(message)) => Some(message),
            _ => None,
        }
    }

    /// Row errors, empty unless the error state is a list.
    pub fn row_errors(&self) -> &[RowError] {
        match &self.error_state {
            Some(ErrorState::Rows(rows)) => rows,
            _ => &[],
        }
    }

    /// Column names plus one string row per fixed record, ready for
    /// [`crate::export::to_delimited_bytes`].
    ///
    /// Missing and `null` values render as empty strings; strings render without quotes.
    pub fn fixes_table(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let rows = self
            .schema_fixes
            .iter()
            .map(|fixed| {
                self.columns
                    .iter()
                    .map(|column| match fixed.get(column) {
                        None | Some(serde_json::Value::Null) => String::new(),
                        Some(serde_json::Value::String(s)) => s.clone(),
                        Some(other) => other.to_string(),
                    })
                    .collect()
            })
            .collect();
        (self.columns.clone(), rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_from_extension_and_content_type() {
        assert_eq!(InputFormat::from_extension("CSV"), Some(InputFormat::Text));
        assert_eq!(InputFormat::from_extension("xlsx"), Some(InputFormat::Spreadsheet));
        assert_eq!(InputFormat::from_extension("parquet"), None);
        assert_eq!(
            InputFormat::from_content_type("application/vnd.ms-excel"),
            InputFormat::Spreadsheet
        );
        assert_eq!(InputFormat::from_content_type("text/csv"), InputFormat::Text);
    }

    #[test]
    fn record_serializes_line_no_as_string_first() {
        let r = Record::new(2, vec![("a".into(), "1".into()), ("b".into(), "2".into())]);
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({"lineNo": "2", "a": "1", "b": "2"})
        );
        assert_eq!(r.get("b"), Some("2"));
        assert_eq!(r.get("c"), None);
    }

    #[test]
    fn fixed_record_keeps_source_line_no() {
        let mut values = serde_json::Map::new();
        values.insert("lineNo".into(), json!("99"));
        values.insert("b".into(), json!(2));
        let fixed = FixedRecord::new(3, values);
        assert_eq!(fixed.line_no(), 3);
        assert_eq!(serde_json::to_value(&fixed).unwrap(), json!({"lineNo": "3", "b": 2}));
    }

    #[test]
    fn report_serializes_error_state_untagged() {
        let report = Report {
            error_state: Some(ErrorState::Fatal("boom".into())),
            ..Default::default()
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["errorState"], json!("boom"));
        assert_eq!(v["dataSource"], json!([]));

        let clean = serde_json::to_value(Report::default()).unwrap();
        assert_eq!(clean["errorState"], serde_json::Value::Null);
    }

    #[test]
    fn fixes_table_renders_in_column_order() {
        let mut values = serde_json::Map::new();
        values.insert("b".into(), json!(2));
        values.insert("a".into(), json!("x"));
        values.insert("c".into(), serde_json::Value::Null);
        let report = Report {
            columns: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            schema_fixes: vec![FixedRecord::new(2, values)],
            ..Default::default()
        };
        let (cols, rows) = report.fixes_table();
        assert_eq!(cols, vec!["a", "b", "c", "d"]);
        assert_eq!(rows, vec![vec!["x", "2", "", ""]]);
    }
}
