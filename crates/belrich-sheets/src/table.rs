//! Reading curated sheets from delimited text.
//!
//! `.csv` files are comma separated with standard quoting; anything else is
//! read as unquoted tab-separated text, the format the sheet writer emits.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use belrich_common::{BelrichError, Result};
use csv::ReaderBuilder;
use tracing::warn;
use walkdir::WalkDir;

/// Columns every curated sheet must have.
pub const REQUIRED_COLUMNS: &[&str] = &["Curator", "Checked", "Correct", "Changed"];

/// Suffix of the sheets written by the enrichment workflow.
pub const DEFAULT_SHEET_SUFFIX: &str = ".bel.tsv";

#[derive(Debug, Clone)]
pub struct SheetRow {
    /// Line in the file the row starts on, counting the header as line 1.
    pub line_number: usize,
    fields: HashMap<String, String>,
}

impl SheetRow {
    /// Raw cell text, empty when the column is absent.
    pub fn raw(&self, column: &str) -> &str {
        self.fields.get(column).map_or("", String::as_str)
    }

    /// A cell with content. Blank cells and `nan` count as empty.
    pub fn get(&self, column: &str) -> Option<&str> {
        let value = self.raw(column).trim();
        if value.is_empty() || value.eq_ignore_ascii_case("nan") {
            None
        } else {
            Some(value)
        }
    }

    /// Whether a curator marked this cell.
    pub fn is_marked(&self, column: &str) -> bool {
        self.get(column).is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Sheet {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// An empty file left behind for a gene without statements.
    pub fn is_placeholder(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// The first required column this sheet lacks.
    pub fn missing_column(&self) -> Option<&'static str> {
        REQUIRED_COLUMNS.iter().copied().find(|c| !self.has_column(c))
    }

    /// Whether the curation columns are present, logging the first gap.
    pub fn has_curation_columns(&self) -> bool {
        match self.missing_column() {
            Some(column) => {
                warn!(path = %self.path.display(), column, "Sheet is missing a curation column");
                false
            }
            None => true,
        }
    }

    /// Like [`Sheet::has_curation_columns`] but as an error.
    pub fn check_curation_columns(&self) -> Result<()> {
        match self.missing_column() {
            Some(column) => Err(BelrichError::Sheet(format!(
                "{} is missing the \"{column}\" column",
                self.path.display()
            ))),
            None => Ok(()),
        }
    }
}

/// Read a sheet, choosing the dialect from the file extension.
pub fn read_sheet(path: &Path) -> Result<Sheet> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let mut builder = ReaderBuilder::new();
    builder.flexible(true);
    if is_csv {
        builder.delimiter(b',');
    } else {
        builder.delimiter(b'\t').quoting(false);
    }
    let mut reader = builder.from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line_number = record.position().map_or(0, |p| p.line() as usize);
        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(SheetRow { line_number, fields });
    }

    Ok(Sheet {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

/// Sheets under `directory` whose file name ends with `suffix`, sorted.
pub fn sheet_paths(directory: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(directory)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(suffix))
        .map(|e| e.into_path())
        .collect();
    paths.sort();
    paths
}
