#![cfg(feature = "excel")]

//! Spreadsheet path of the normalizer.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Range, Reader};
use chrono::NaiveTime;

use crate::error::{IngestionError, IngestionResult};

use super::normalize::NormalizedText;
use super::unified::ExcelSheetSelection;

/// Render one sheet of an in-memory workbook (`.xlsx`, `.xls`, `.ods`, etc.) as delimited text.
///
/// Behavior:
/// - Uses the first sheet unless a named sheet is selected
/// - Cells are joined with a tab, rows with LF, then every tab becomes a comma
/// - Whole-number floats render without a fractional part (`3`, not `3.0`)
pub fn render_workbook(content: &[u8], sheet: &ExcelSheetSelection) -> IngestionResult<NormalizedText> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(content))?;

    let range = match sheet {
        ExcelSheetSelection::First => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| IngestionError::Workbook {
                message: "workbook has no sheets".to_string(),
            })??,
        ExcelSheetSelection::Sheet(name) => workbook.worksheet_range(name)?,
    };

    Ok(NormalizedText::new(render_range(&range)))
}

fn render_range(range: &Range<Data>) -> String {
    let text = range
        .rows()
        .map(|row| row.iter().map(cell_to_text).collect::<Vec<_>>().join("\t"))
        .collect::<Vec<_>>()
        .join("\n");
    // Tabs typed inside a cell are collapsed too.
    text.replace('\t', ",")
}

/// Largest magnitude where every whole `f64` converts to `i64` exactly (2^53).
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

fn cell_to_text(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < EXACT_INT_LIMIT {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => datetime_to_text(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

// Dates render as ISO text, with the time only when it is not midnight. Durations and serials
// outside the calendar keep the raw number.
fn datetime_to_text(dt: &ExcelDateTime) -> String {
    match dt.as_datetime() {
        Some(value) if !dt.is_duration() => {
            if value.time() == NaiveTime::MIN {
                value.format("%Y-%m-%d").to_string()
            } else {
                value.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }
        _ => dt.as_f64().to_string(),
    }
}
