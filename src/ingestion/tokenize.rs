//! Line splitting, separator detection and header tokenization.

use super::normalize::NormalizedText;

/// Field separators understood by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Comma,
    Semicolon,
}

impl Separator {
    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
        }
    }
}

/// Split normalized text into lines on LF. The first line is the header.
pub fn split_lines(text: &NormalizedText) -> Vec<&str> {
    text.as_str().split('\n').collect()
}

/// Semicolon if the header line contains one, otherwise comma.
pub fn detect_separator(header: &str) -> Separator {
    if header.contains(';') {
        Separator::Semicolon
    } else {
        Separator::Comma
    }
}

/// Remove every `,` and `;` and trim surrounding whitespace.
pub fn strip_separator_noise(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ',' | ';'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split the header line into column names.
///
/// Tokens that are empty once separator noise is removed are dropped; survivors are trimmed.
/// Duplicates are kept so the column validator can report them.
pub fn split_header(header: &str) -> Vec<String> {
    header
        .split(detect_separator(header).as_char())
        .filter(|token| !strip_separator_noise(token).is_empty())
        .map(|token| token.trim().to_string())
        .collect()
}
