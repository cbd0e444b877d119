//! Raw bytes -> [`NormalizedText`].
//!
//! Delimited text is decoded, quoted substrings lose their quotes and any `,`/`;` they contain,
//! and CRLF becomes LF. Spreadsheets are rendered by [`super::excel`].

use crate::error::IngestionResult;
use crate::types::{InputFormat, RawInput};

use super::unified::ExcelSheetSelection;

/// Single text blob with LF line breaks and no separators left inside quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalize `input` according to its format.
pub fn normalize(input: &RawInput, sheet: &ExcelSheetSelection) -> IngestionResult<NormalizedText> {
    match input.format() {
        InputFormat::Text => Ok(normalize_text(input.content())),
        InputFormat::Spreadsheet => normalize_spreadsheet(input.content(), sheet),
    }
}

/// Delimited-text path.
pub fn normalize_text(content: &[u8]) -> NormalizedText {
    let decoded = String::from_utf8_lossy(content);
    let decoded = decoded.strip_prefix('\u{feff}').unwrap_or(decoded.as_ref());
    NormalizedText::new(strip_quoted_separators(decoded).replace("\r\n", "\n"))
}

/// Remove every `"…"` pair's quotes and the `,` `;` inside it.
///
/// The closing quote is the next `"`, even across line breaks. An unmatched quote is kept.
pub fn strip_quoted_separators(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('"') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match after_open.find('"') {
            Some(close) => {
                out.extend(after_open[..close].chars().filter(|c| !matches!(c, ',' | ';')));
                rest = &after_open[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn normalize_spreadsheet(content: &[u8], sheet: &ExcelSheetSelection) -> IngestionResult<NormalizedText> {
    // Avoid unused warnings when the feature is off.
    let _ = (content, sheet);

    #[cfg(feature = "excel")]
    {
        super::excel::render_workbook(content, sheet)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(crate::error::IngestionError::UnsupportedFormat {
            message: "spreadsheet input not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
