//! Writing curation sheets and statement dumps.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use belrich_common::{BelrichError, Result};
use csv::{QuoteStyle, WriterBuilder};
use tracing::{info, warn};

use crate::models::Statement;
use crate::rows::{CurationRow, END_HEADER, START_HEADER};

/// Layout of a curation sheet.
#[derive(Debug, Clone)]
pub struct SheetFormat {
    delimiter: u8,
    /// Empty columns for curators, placed between the BEL and provenance columns.
    pub extra_columns: Vec<String>,
}

impl Default for SheetFormat {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            extra_columns: Vec::new(),
        }
    }
}

impl SheetFormat {
    /// A format using the given single-byte separator.
    pub fn with_separator(separator: &str) -> Result<Self> {
        Ok(Self {
            delimiter: parse_separator(separator)?,
            ..Self::default()
        })
    }

    pub fn with_extra_columns(mut self, columns: Vec<String>) -> Self {
        self.extra_columns = columns;
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// File extension under which the sheet reads back with the same
    /// dialect: `tsv` for unquoted tab text, `csv` for quoted comma text.
    pub fn extension(&self) -> Option<&'static str> {
        match self.delimiter {
            b'\t' => Some("tsv"),
            b',' => Some("csv"),
            _ => None,
        }
    }

    pub fn header(&self) -> Vec<String> {
        START_HEADER
            .iter()
            .map(|s| s.to_string())
            .chain(self.extra_columns.iter().cloned())
            .chain(END_HEADER.iter().map(|s| s.to_string()))
            .collect()
    }
}

/// Accepts a literal single character or the escapes `\t` and `tab`.
pub fn parse_separator(separator: &str) -> Result<u8> {
    match separator {
        "\\t" | "tab" => Ok(b'\t'),
        s if s.len() == 1 => Ok(s.as_bytes()[0]),
        other => Err(BelrichError::Config(format!(
            "separator must be a single byte, got {other:?}"
        ))),
    }
}

/// Write the header and rows. Tab-separated sheets are written unquoted
/// with tabs and line breaks inside fields flattened to spaces. Returns the
/// number of rows written; nothing at all is written when there are none.
pub fn write_rows<W: Write>(writer: W, rows: &[CurationRow], format: &SheetFormat) -> Result<usize> {
    if rows.is_empty() {
        warn!("No rows written");
        return Ok(0);
    }

    let unquoted = format.delimiter == b'\t';
    let mut csv = WriterBuilder::new()
        .delimiter(format.delimiter)
        .quote_style(if unquoted { QuoteStyle::Never } else { QuoteStyle::Necessary })
        .from_writer(writer);

    let clean = |field: &str| -> String {
        if unquoted {
            field.replace(['\t', '\r', '\n'], " ")
        } else {
            field.to_string()
        }
    };

    csv.write_record(format.header())?;
    let placeholders = vec![String::new(); format.extra_columns.len()];
    for row in rows {
        let record: Vec<String> = row
            .start_fields()
            .into_iter()
            .map(&clean)
            .chain(placeholders.iter().cloned())
            .chain(row.end_fields().iter().map(|f| clean(f.as_str())))
            .collect();
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(rows.len())
}

/// Write a sheet to a file. The file is only created when there are rows.
pub fn write_sheet(path: &Path, rows: &[CurationRow], format: &SheetFormat) -> Result<usize> {
    if rows.is_empty() {
        warn!(path = %path.display(), "No rows to write");
        return Ok(0);
    }
    let written = write_rows(File::create(path)?, rows, format)?;
    info!(path = %path.display(), rows = written, "Wrote curation sheet");
    Ok(written)
}

/// Dump statements as pretty-printed JSON.
pub fn write_statements_json<W: Write>(writer: W, statements: &[Statement]) -> Result<()> {
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, statements)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_statements_json_file(path: &Path, statements: &[Statement]) -> Result<()> {
    write_statements_json(File::create(path)?, statements)?;
    info!(path = %path.display(), statements = statements.len(), "Wrote statement JSON");
    Ok(())
}
