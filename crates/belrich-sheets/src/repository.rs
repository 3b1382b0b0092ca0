//! A directory of curated sheets, compiled into one BEL graph.

use std::path::{Path, PathBuf};

use belrich_common::{progress, Result};
use belrich_kg::{nodelink, parse_statement, BelEdge, BelGraph, Citation, GraphWarning};
use tracing::{debug, info, warn};

use crate::table::{read_sheet, sheet_paths, SheetRow, DEFAULT_SHEET_SUFFIX};

pub const CACHE_NAME: &str = "sheets.bel.json";

/// Curated statements are re-curated later, so they enter with medium confidence.
pub const DEFAULT_CONFIDENCE: &str = "Medium";

#[derive(Debug, Clone)]
pub struct SheetsRepository {
    pub directory: PathBuf,
    pub output_directory: PathBuf,
    pub suffix: String,
}

impl SheetsRepository {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        Self {
            output_directory: directory.clone(),
            directory,
            suffix: DEFAULT_SHEET_SUFFIX.to_string(),
        }
    }

    pub fn with_output_directory(mut self, output_directory: impl Into<PathBuf>) -> Self {
        self.output_directory = output_directory.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn cache_path(&self) -> PathBuf {
        self.output_directory.join(CACHE_NAME)
    }

    /// The graph of all curated sheets. Reads the cache when allowed and
    /// present, otherwise compiles the sheets and refreshes the cache.
    pub fn graph(&self, use_cached: bool) -> Result<BelGraph> {
        let cache = self.cache_path();
        if use_cached && cache.exists() {
            info!(path = %cache.display(), "Using cached sheets graph");
            return nodelink::from_path(&cache);
        }

        let graph = self.compile()?;
        std::fs::create_dir_all(&self.output_directory)?;
        nodelink::to_path(&graph, &cache)?;
        info!(
            path = %cache.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            warnings = graph.warnings().len(),
            "Compiled curation sheets"
        );
        Ok(graph)
    }

    /// Parse every sheet into a fresh graph without touching the cache.
    pub fn compile(&self) -> Result<BelGraph> {
        let name = self
            .directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sheets".to_string());
        let mut graph = BelGraph::with_name(name);

        let paths = sheet_paths(&self.directory, &self.suffix);
        let pb = progress::bar(paths.len(), format!("Sheets in {}", self.directory.display()));
        for path in &paths {
            pb.inc(1);
            let sheet = read_sheet(path)?;
            if sheet.is_placeholder() {
                debug!(path = %path.display(), "Skipping empty sheet");
                continue;
            }
            if !sheet.has_curation_columns() {
                continue;
            }
            let has_citation_column = sheet.has_column("Citation Reference");
            for row in &sheet.rows {
                process_row(&mut graph, path, row, has_citation_column);
            }
        }
        pb.finish_and_clear();
        Ok(graph)
    }
}

/// Add one curated row to the graph. Unchecked rows and rows neither marked
/// correct nor changed are ignored; rows that fail to parse become warnings.
pub fn process_row(graph: &mut BelGraph, path: &Path, row: &SheetRow, has_citation_column: bool) {
    if !row.is_marked("Checked") {
        return;
    }
    if !(row.is_marked("Correct") || row.is_marked("Changed")) {
        return;
    }

    let bel = format!(
        "{} {} {}",
        row.raw("Subject").trim(),
        row.raw("Predicate").trim(),
        row.raw("Object").trim()
    );
    let warn_row = |graph: &mut BelGraph, message: String| {
        warn!(path = %path.display(), line = row.line_number, %message, "Skipping sheet row");
        graph.add_warning(GraphWarning {
            path: Some(path.display().to_string()),
            line_number: row.line_number,
            line: bel.clone(),
            message,
        });
    };

    let reference_column = if has_citation_column { "Citation Reference" } else { "PMID" };
    let Some(reference) = row.get(reference_column) else {
        warn_row(graph, "missing reference".to_string());
        return;
    };

    let statement = match parse_statement(&bel) {
        Ok(statement) => statement,
        Err(e) => {
            warn_row(graph, e.to_string());
            return;
        }
    };

    let mut edge = BelEdge::qualified(
        statement.relation,
        Citation::pubmed(reference),
        row.raw("Evidence").trim(),
    );
    if let Some(curator) = row.get("Curator") {
        edge.annotate("Curator", curator);
    }
    edge.annotate("Confidence", DEFAULT_CONFIDENCE);
    if let Some(uuid) = row.get("INDRA UUID").or_else(|| row.get("UUID")) {
        edge.annotate("INDRA_UUID", uuid);
    }
    if let Some(belief) = row.get("Belief") {
        edge.annotate("INDRA_Belief", belief);
    }
    if let Some(api) = row.get("API") {
        edge.annotate("INDRA_API", api);
    }
    edge.subject_modifier = statement.subject.modifier;
    edge.object_modifier = statement.object.modifier;

    graph.add_edge(statement.subject.node, statement.object.node, edge);
}
