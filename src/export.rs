//! Delimited output for accepted rows.
//!
//! Pair with [`crate::types::Report::fixes_table`] to hand validated rows to a downstream
//! system as a comma-separated file. Output re-ingests cleanly through the gate.

use std::io::Write;

use crate::error::IngestionResult;

/// Write a header line and rows as comma-separated text with LF line endings.
///
/// Rows may be shorter or longer than `columns`. Values containing a comma, quote or line break
/// are quoted.
pub fn write_delimited<W: Write>(writer: W, columns: &[String], rows: &[Vec<String>]) -> IngestionResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(columns)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// [`write_delimited`] into an in-memory buffer.
pub fn to_delimited_bytes(columns: &[String], rows: &[Vec<String>]) -> IngestionResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_delimited(&mut buf, columns, rows)?;
    Ok(buf)
}
