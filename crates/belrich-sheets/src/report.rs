//! Curation reports: how many suggested statements curators accepted,
//! corrected or rejected, and which kinds of errors they found.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use belrich_common::{progress, BelrichError, Result};
use belrich_kg::Relation;
use csv::Writer;
use tracing::{debug, info, warn};

use crate::table::{read_sheet, sheet_paths, SheetRow};

pub const NO_EVIDENCE_TEXT: &str = "No evidence text.";
pub const SUMMARY_FILE: &str = "curation_summary.csv";
pub const ERROR_TYPES_FILE: &str = "error_types.csv";

// ── Categories ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CurationCategory {
    Correct,
    Error,
    ErrorButOtherStatement,
    ModifiedByCurator,
    NotCurated,
}

impl CurationCategory {
    /// Summary column order.
    pub const ALL: [CurationCategory; 5] = [
        CurationCategory::Correct,
        CurationCategory::Error,
        CurationCategory::ErrorButOtherStatement,
        CurationCategory::ModifiedByCurator,
        CurationCategory::NotCurated,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CurationCategory::Correct                => "Correct",
            CurationCategory::Error                  => "Error",
            CurationCategory::ErrorButOtherStatement => "Error but other statement was identified",
            CurationCategory::ModifiedByCurator      => "Modified by curator",
            CurationCategory::NotCurated             => "Not curated",
        }
    }

    /// Classify a row from its `Checked`, `Correct` and `Changed` marks.
    /// `None` means the marks conflict (correct and changed, not checked).
    pub fn classify(checked: bool, correct: bool, changed: bool) -> Option<Self> {
        if !(checked || correct || changed) {
            Some(Self::NotCurated)
        } else if checked && !correct && !changed {
            Some(Self::Error)
        } else if correct && !changed {
            Some(Self::Correct)
        } else if checked && changed {
            Some(Self::ModifiedByCurator)
        } else if changed && correct {
            None
        } else {
            Some(Self::ErrorButOtherStatement)
        }
    }
}

impl fmt::Display for CurationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Edge filter ─────────────────────────────────────────────────────────────

/// Restrict a report to causal increases or causal decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFilter {
    Activation,
    Inhibition,
}

impl EdgeFilter {
    pub fn accepts(&self, predicate: &str) -> bool {
        let Some(relation) = Relation::parse(predicate.trim()) else {
            return false;
        };
        match self {
            EdgeFilter::Activation => relation.is_causal_increase(),
            EdgeFilter::Inhibition => relation.is_causal_decrease(),
        }
    }
}

impl FromStr for EdgeFilter {
    type Err = BelrichError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "activation_edges" => Ok(EdgeFilter::Activation),
            "inhibition_edges" => Ok(EdgeFilter::Inhibition),
            other => Err(BelrichError::Sheet(format!("Not valid edge_type: {other}"))),
        }
    }
}

// ── Per-sheet reports ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurationReport {
    pub counts: BTreeMap<CurationCategory, usize>,
    pub total: usize,
}

impl CurationReport {
    pub fn count(&self, category: CurationCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    fn add_row(&mut self, row: &SheetRow, path: &Path) {
        let category = CurationCategory::classify(
            row.is_marked("Checked"),
            row.is_marked("Correct"),
            row.is_marked("Changed"),
        );
        match category {
            Some(category) => *self.counts.entry(category).or_default() += 1,
            None => warn!(path = %path.display(), line = row.line_number, "Conflict in row"),
        }
        self.total += 1;
    }
}

/// Count the curation outcome of every row in a sheet.
pub fn curation_report(path: &Path, edge_filter: Option<EdgeFilter>) -> Result<CurationReport> {
    let sheet = read_sheet(path)?;
    let mut report = CurationReport::default();
    // genes without statements leave empty placeholder sheets
    if sheet.is_placeholder() {
        return Ok(report);
    }
    sheet.check_curation_columns()?;

    for row in &sheet.rows {
        if row.raw("Evidence") == NO_EVIDENCE_TEXT {
            debug!(line = row.line_number, "No evidence text, skipping");
            continue;
        }
        if let Some(filter) = edge_filter {
            if !filter.accepts(row.raw("Predicate")) {
                continue;
            }
        }
        report.add_row(row, path);
    }
    Ok(report)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTypes {
    /// Lowercased error type -> occurrences.
    pub counts: BTreeMap<String, usize>,
    /// Curator named on the first row.
    pub curator: Option<String>,
}

/// Count the comma-separated entries of the `Error Type` column.
pub fn error_types(path: &Path) -> Result<ErrorTypes> {
    let sheet = read_sheet(path)?;
    let mut result = ErrorTypes {
        curator: sheet.rows.first().and_then(|r| r.get("Curator")).map(String::from),
        ..ErrorTypes::default()
    };
    for row in &sheet.rows {
        let Some(cell) = row.get("Error Type") else {
            continue;
        };
        for error in cell.split(',') {
            *result.counts.entry(error.trim().to_lowercase()).or_default() += 1;
        }
    }
    Ok(result)
}

// ── Directory summary ───────────────────────────────────────────────────────

/// Reports for every gene directory below an input directory.
#[derive(Debug, Clone, Default)]
pub struct CurationSummary {
    pub reports: BTreeMap<String, CurationReport>,
    pub error_types: BTreeMap<String, BTreeMap<String, usize>>,
}

impl CurationSummary {
    /// Write `curation_summary.csv` and `error_types.csv`.
    pub fn write(&self, output_directory: &Path) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(output_directory)?;

        let summary_path = output_directory.join(SUMMARY_FILE);
        let mut writer = Writer::from_path(&summary_path)?;
        let mut header = vec![String::new()];
        header.extend(CurationCategory::ALL.iter().map(|c| c.label().to_string()));
        header.push("Total".to_string());
        writer.write_record(&header)?;
        for (gene, report) in &self.reports {
            let mut record = vec![gene.clone()];
            record.extend(CurationCategory::ALL.iter().map(|c| report.count(*c).to_string()));
            record.push(report.total.to_string());
            writer.write_record(&record)?;
        }
        writer.flush()?;

        let errors_path = output_directory.join(ERROR_TYPES_FILE);
        let columns: BTreeSet<&String> = self.error_types.values().flat_map(|m| m.keys()).collect();
        let mut writer = Writer::from_path(&errors_path)?;
        let mut header = vec![String::new()];
        header.extend(columns.iter().map(|c| c.to_string()));
        writer.write_record(&header)?;
        for (gene, counts) in &self.error_types {
            let mut record = vec![gene.clone()];
            record.extend(
                columns
                    .iter()
                    .map(|c| counts.get(*c).copied().unwrap_or(0).to_string()),
            );
            writer.write_record(&record)?;
        }
        writer.flush()?;

        Ok((summary_path, errors_path))
    }
}

/// The gene a sheet belongs to: the name of its parent directory.
pub fn gene_of(path: &Path) -> Option<String> {
    path.parent()?
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

/// Build reports for every sheet under `input_directory` and write the two
/// summary tables into `output_directory`.
pub fn curation_summary(
    input_directory: &Path,
    output_directory: &Path,
    suffix: &str,
    edge_filter: Option<EdgeFilter>,
) -> Result<CurationSummary> {
    let paths = sheet_paths(input_directory, suffix);
    let pb = progress::bar(
        paths.len(),
        format!("Generating curation report in {}", output_directory.display()),
    );

    let mut summary = CurationSummary::default();
    for path in &paths {
        pb.inc(1);
        let Some(gene) = gene_of(path) else {
            continue;
        };
        let report = curation_report(path, edge_filter)?;
        let empty = report.is_empty();
        summary.reports.insert(gene.clone(), report);
        if empty {
            warn!(path = %path.display(), "Empty sheet, skipping error types");
            continue;
        }
        summary.error_types.insert(gene, error_types(path)?.counts);
    }
    pb.finish_and_clear();

    let (summary_path, errors_path) = summary.write(output_directory)?;
    info!(
        sheets = paths.len(),
        summary = %summary_path.display(),
        errors = %errors_path.display(),
        "Wrote curation summary"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "PMID\tEvidence\tSubject\tPredicate\tObject\tCurator\tChecked\tCorrect\tChanged\tError Type";

    fn sheet(dir: &Path, gene: &str, rows: &[&str]) -> PathBuf {
        let gene_dir = dir.join(gene);
        fs::create_dir_all(&gene_dir).unwrap();
        let path = gene_dir.join(format!("{gene}.bel.tsv"));
        let mut text = format!("{HEADER}\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_classify() {
        use CurationCategory::*;
        assert_eq!(CurationCategory::classify(false, false, false), Some(NotCurated));
        assert_eq!(CurationCategory::classify(true, false, false), Some(Error));
        assert_eq!(CurationCategory::classify(true, true, false), Some(Correct));
        assert_eq!(CurationCategory::classify(false, true, false), Some(Correct));
        assert_eq!(CurationCategory::classify(true, false, true), Some(ModifiedByCurator));
        assert_eq!(CurationCategory::classify(true, true, true), Some(ModifiedByCurator));
        assert_eq!(CurationCategory::classify(false, true, true), None);
        assert_eq!(CurationCategory::classify(false, false, true), Some(ErrorButOtherStatement));
    }

    #[test]
    fn test_report_counts_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = sheet(
            dir.path(),
            "AKT1",
            &[
                "1\ttext\tp(A)\tincreases\tp(B)\tjo\tx\tx\t\t",
                "2\ttext\tp(A)\tdecreases\tp(B)\tjo\tx\t\t\tWrong direction, Grounding",
                "3\tNo evidence text.\tp(A)\tincreases\tp(B)\tjo\tx\tx\t\t",
                "4\ttext\tp(A)\tincreases\tp(B)\tjo\t\tx\tx\t",
                "5\ttext\tp(A)\tdirectlyIncreases\tp(B)\tjo\t\t\t\t",
            ],
        );

        let report = curation_report(&path, None).unwrap();
        assert_eq!(report.count(CurationCategory::Correct), 1);
        assert_eq!(report.count(CurationCategory::Error), 1);
        assert_eq!(report.count(CurationCategory::NotCurated), 1);
        // the conflicting row counts towards the total only
        assert_eq!(report.total, 4);

        let activation = curation_report(&path, Some(EdgeFilter::Activation)).unwrap();
        assert_eq!(activation.total, 3);
        let inhibition = curation_report(&path, Some(EdgeFilter::Inhibition)).unwrap();
        assert_eq!(inhibition.total, 1);
    }

    #[test]
    fn test_invalid_edge_filter() {
        assert!("activation_edges".parse::<EdgeFilter>().is_ok());
        assert!("everything".parse::<EdgeFilter>().is_err());
    }

    #[test]
    fn test_error_types_are_normalised() {
        let dir = tempfile::tempdir().unwrap();
        let path = sheet(
            dir.path(),
            "MTOR",
            &[
                "1\ttext\tp(A)\tincreases\tp(B)\tjo\tx\t\t\tGrounding , Wrong Direction",
                "2\ttext\tp(A)\tincreases\tp(B)\tkim\tx\t\t\tgrounding",
            ],
        );
        let types = error_types(&path).unwrap();
        assert_eq!(types.curator.as_deref(), Some("jo"));
        assert_eq!(types.counts.get("grounding"), Some(&2));
        assert_eq!(types.counts.get("wrong direction"), Some(&1));
    }

    #[test]
    fn test_summary_writes_tables() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        sheet(input.path(), "AKT1", &["1\ttext\tp(A)\tincreases\tp(B)\tjo\tx\tx\t\t"]);
        sheet(input.path(), "MTOR", &["1\ttext\tp(A)\tincreases\tp(B)\tjo\tx\t\t\tgrounding"]);

        let summary = curation_summary(input.path(), output.path(), ".bel.tsv", None).unwrap();
        assert_eq!(summary.reports.len(), 2);

        let text = fs::read_to_string(output.path().join(SUMMARY_FILE)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            ",Correct,Error,Error but other statement was identified,Modified by curator,Not curated,Total"
        );
        assert_eq!(lines[1], "AKT1,1,0,0,0,0,1");
        assert_eq!(lines[2], "MTOR,0,1,0,0,0,1");

        let errors = fs::read_to_string(output.path().join(ERROR_TYPES_FILE)).unwrap();
        assert_eq!(errors.lines().collect::<Vec<_>>(), vec![",grounding", "AKT1,0", "MTOR,1"]);
    }

    #[test]
    fn test_missing_columns_fail_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bel.tsv");
        fs::write(&path, "PMID\tCurator\n1\tjo\n").unwrap();
        assert!(matches!(curation_report(&path, None), Err(BelrichError::Sheet(_))));
    }

    #[test]
    fn test_placeholder_sheet_is_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TP53.bel.tsv");
        fs::write(&path, "").unwrap();
        assert!(curation_report(&path, None).unwrap().is_empty());
    }
}
