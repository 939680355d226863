//! Flat-file export.
//!
//! One line per record, no header, no quoting. Fields follow each record's own key order and
//! empty markers are written as empty strings.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{SummaryError, SummaryResult};
use crate::types::{Cell, Record};

/// Delimiters accepted by [`Delimiter::parse`].
pub const SUPPORTED_DELIMITERS: [char; 8] = [',', '.', ':', '|', '-', ';', '#', '*'];

/// A validated single-byte export delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter(u8);

impl Delimiter {
    /// Accept exactly one character from [`SUPPORTED_DELIMITERS`].
    pub fn parse(s: &str) -> SummaryResult<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if SUPPORTED_DELIMITERS.contains(&c) => Ok(Delimiter(c as u8)),
            _ => Err(SummaryError::UnsupportedDelimiter {
                delimiter: s.to_string(),
            }),
        }
    }

    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter(b',')
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as char)
    }
}

impl TryFrom<&str> for Delimiter {
    type Error = SummaryError;

    fn try_from(s: &str) -> SummaryResult<Self> {
        Delimiter::parse(s)
    }
}

/// Write `records` to `path`, replacing any existing file.
///
/// The delimiter is validated before the file is touched.
pub fn export_to_path(
    records: &[Record],
    path: impl AsRef<Path>,
    delimiter: &str,
) -> SummaryResult<usize> {
    let delimiter = Delimiter::parse(delimiter)?;
    let path = path.as_ref();
    let file = File::create(path)?;
    let lines = write_all(BufWriter::new(file), records, delimiter)?;
    tracing::info!(path = %path.display(), lines, %delimiter, "records exported");
    Ok(lines)
}

/// Write `records` to any [`Write`] sink. Returns the number of lines written.
pub fn export_to_writer<W: Write>(
    records: &[Record],
    writer: W,
    delimiter: Delimiter,
) -> SummaryResult<usize> {
    write_all(writer, records, delimiter)
}

// A record whose only field is empty comes out as a blank line, never `""`.
fn write_all<W: Write>(mut out: W, records: &[Record], delimiter: Delimiter) -> SummaryResult<usize> {
    let sep = delimiter.to_string();
    for record in records {
        let line = record
            .iter()
            .map(|(_, cell)| render(cell))
            .collect::<Vec<_>>()
            .join(&sep);
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(records.len())
}

fn render(cell: &Cell) -> String {
    match cell {
        Cell::Present(v) => v.to_string(),
        Cell::Empty => String::new(),
    }
}
