//! Enrichment workflows: from a BEL graph to curation sheets.
//!
//! Genes are chosen by information score, statements about them are fetched
//! from a [`StatementSource`], filtered and written either as one sheet per
//! gene or as a single combined sheet.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use belrich_common::{progress, BelrichError, Result};
use belrich_indra::{
    curation_rows, write_rows, write_sheet, write_statements_json_file, EvidenceFilter, RowOptions,
    SheetFormat, StatementSource,
};
use belrich_kg::nodelink;
use belrich_ranker::gene_symbols;
use tracing::{debug, info, instrument};

/// Filters shared by the sheet-producing commands.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub minimum_belief: Option<f64>,
    pub limit: Option<usize>,
    pub allow_duplicates: bool,
    pub allow_ungrounded: bool,
    pub format: SheetFormat,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            minimum_belief: None,
            limit: None,
            allow_duplicates: false,
            allow_ungrounded: true,
            format: SheetFormat::default(),
        }
    }
}

impl ExportOptions {
    fn row_options(&self, evidence: EvidenceFilter) -> RowOptions {
        RowOptions {
            evidence,
            allow_ungrounded: self.allow_ungrounded,
            minimum_belief: self.minimum_belief,
            limit: self.limit,
        }
    }
}

/// What a per-gene export did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
    pub rows: usize,
}

/// HGNC genes of the graph at `path` whose information score reaches `cutoff`.
pub fn genes_from_graph(path: &Path, cutoff: f64) -> Result<Vec<String>> {
    let graph = nodelink::from_path(path)?;
    let genes = gene_symbols(&graph, cutoff);
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        genes = genes.len(),
        cutoff,
        "Selected genes"
    );
    Ok(genes)
}

/// Paths of the sheet and statement dump for `gene` below `directory`. The
/// sheet is `<gene>.bel.tsv` or `<gene>.bel.csv` depending on the separator;
/// other separators would not read back and are rejected.
pub fn gene_paths(directory: &Path, gene: &str, format: &SheetFormat) -> Result<(PathBuf, PathBuf)> {
    let extension = format.extension().ok_or_else(|| {
        BelrichError::Config(format!(
            "per-gene sheets need a tab or comma separator, got {:?}",
            char::from(format.delimiter())
        ))
    })?;
    let gene_directory = directory.join(gene);
    Ok((
        gene_directory.join(format!("{gene}.bel.{extension}")),
        gene_directory.join(format!("{gene}_statements.json")),
    ))
}

/// Write one sheet and one statement dump per gene. Genes whose sheet
/// already exists are skipped, so an interrupted run can be resumed.
#[instrument(skip(source, genes, options), fields(genes = genes.len()))]
pub async fn export_separate(
    source: &dyn StatementSource,
    genes: &[String],
    directory: &Path,
    options: &ExportOptions,
) -> Result<ExportReport> {
    let mut report = ExportReport::default();
    let pb = progress::bar(genes.len(), "Exporting genes");

    for gene in genes {
        pb.inc(1);
        pb.set_message(gene.clone());
        let (sheet_path, json_path) = gene_paths(directory, gene, &options.format)?;
        if sheet_path.exists() {
            debug!(gene = %gene, "Sheet already exists, skipping");
            report.skipped.push(gene.clone());
            continue;
        }
        fs::create_dir_all(sheet_path.parent().unwrap_or(directory))?;

        let statements = source.from_agents(std::slice::from_ref(gene)).await?;
        write_statements_json_file(&json_path, &statements)?;

        let rows = curation_rows(statements, &options.row_options(EvidenceFilter::new(options.allow_duplicates)));
        // An empty sheet still marks the gene as done.
        let written = write_rows(File::create(&sheet_path)?, &rows, &options.format)?;
        debug!(gene = %gene, rows = written, "Wrote gene sheet");

        report.rows += written;
        report.written.push(gene.clone());
    }
    pb.finish_and_clear();

    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        rows = report.rows,
        "Finished per-gene export"
    );
    Ok(report)
}

/// Query all genes at once and write a single combined sheet.
#[instrument(skip(source, genes, options), fields(genes = genes.len()))]
pub async fn export_single(
    source: &dyn StatementSource,
    genes: &[String],
    path: &Path,
    options: &ExportOptions,
) -> Result<usize> {
    let statements = source.from_agents(genes).await?;
    let rows = curation_rows(statements, &options.row_options(EvidenceFilter::new(options.allow_duplicates)));
    write_sheet(path, &rows, &options.format)
}

/// One sheet for a set of documents.
#[instrument(skip(source, pmids, options, json_path), fields(pmids = pmids.len()))]
pub async fn sheet_from_pmids(
    source: &dyn StatementSource,
    pmids: &[String],
    path: &Path,
    json_path: Option<&Path>,
    keep_only_query_pmids: bool,
    options: &ExportOptions,
) -> Result<usize> {
    let statements = source.from_papers(pmids).await?;
    if let Some(json_path) = json_path {
        write_statements_json_file(json_path, &statements)?;
    }

    let mut evidence = EvidenceFilter::new(options.allow_duplicates);
    if keep_only_query_pmids {
        evidence = evidence.with_pmids(pmids);
    }
    let rows = curation_rows(statements, &options.row_options(evidence));
    write_sheet(path, &rows, &options.format)
}

/// One sheet for a set of agents.
#[instrument(skip(source, agents, options, json_path), fields(agents = agents.len()))]
pub async fn sheet_from_agents(
    source: &dyn StatementSource,
    agents: &[String],
    path: &Path,
    json_path: Option<&Path>,
    options: &ExportOptions,
) -> Result<usize> {
    let statements = source.from_agents(agents).await?;
    if let Some(json_path) = json_path {
        write_statements_json_file(json_path, &statements)?;
    }
    let rows = curation_rows(statements, &options.row_options(EvidenceFilter::new(options.allow_duplicates)));
    write_sheet(path, &rows, &options.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use belrich_indra::{MockStatementSource, Statement};
    use belrich_test_utils::statement_json;

    fn statement(uuid: &str, subject: &str, object: &str, belief: f64, pmids: &[&str]) -> Statement {
        serde_json::from_value(statement_json(uuid, subject, object, belief, pmids)).unwrap()
    }

    #[tokio::test]
    async fn test_export_separate_writes_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockStatementSource::new()
            .with_agent("AKT1", vec![statement("u1", "AKT1", "MTOR", 0.9, &["1"])])
            .with_agent("TP53", vec![]);

        let genes = vec!["AKT1".to_string(), "TP53".to_string()];
        let report = export_separate(&source, &genes, dir.path(), &ExportOptions::default())
            .await
            .unwrap();
        assert_eq!(report.written, genes);
        assert_eq!(report.rows, 1);

        let (akt_sheet, akt_json) = gene_paths(dir.path(), "AKT1", &SheetFormat::default()).unwrap();
        assert!(akt_json.exists());
        let text = fs::read_to_string(&akt_sheet).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("1\t"));
        assert!(text.contains("\tu1\t"));

        // no statements still leaves an empty sheet behind
        let (tp53_sheet, _) = gene_paths(dir.path(), "TP53", &SheetFormat::default()).unwrap();
        assert_eq!(fs::read_to_string(tp53_sheet).unwrap(), "");

        let again = export_separate(&source, &genes, dir.path(), &ExportOptions::default())
            .await
            .unwrap();
        assert!(again.written.is_empty());
        assert_eq!(again.skipped, genes);
        assert_eq!(source.queries().len(), 2);
    }

    #[tokio::test]
    async fn test_export_single_sends_one_query() {
        let dir = tempfile::tempdir().unwrap();
        let joint = statement("u1", "AKT1", "MTOR", 0.9, &["1"]);
        let weak = statement("u3", "AKT1", "MTOR", 0.2, &["3"]);
        let source = MockStatementSource::new()
            .with_agents(&["AKT1", "MTOR"], vec![joint, weak])
            .with_agent("MTOR", vec![statement("u2", "MTOR", "TP53", 0.9, &["2"])]);
        let options = ExportOptions {
            minimum_belief: Some(0.3),
            ..ExportOptions::default()
        };

        let path = dir.path().join("all.tsv");
        let genes = vec!["AKT1".to_string(), "MTOR".to_string()];
        let written = export_single(&source, &genes, &path, &options).await.unwrap();
        // only the statement involving both genes and passing the belief cutoff
        assert_eq!(written, 1);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\tu1\t"));
        assert!(!text.contains("\tu2\t"));
        assert_eq!(source.queries(), vec![genes]);
    }

    #[tokio::test]
    async fn test_comma_separated_gene_sheets_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockStatementSource::new()
            .with_agent("AKT1", vec![statement("u1", "AKT1", "MTOR", 0.9, &["1"])]);
        let options = ExportOptions {
            format: SheetFormat::with_separator(",").unwrap(),
            ..ExportOptions::default()
        };

        export_separate(&source, &["AKT1".to_string()], dir.path(), &options)
            .await
            .unwrap();
        let (sheet_path, _) = gene_paths(dir.path(), "AKT1", &options.format).unwrap();
        assert!(sheet_path.ends_with("AKT1/AKT1.bel.csv"));

        let sheet = belrich_sheets::read_sheet(&sheet_path).unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].get("PMID"), Some("1"));
        assert_eq!(sheet.rows[0].get("UUID"), Some("u1"));
    }

    #[tokio::test]
    async fn test_unreadable_separator_is_rejected_before_querying() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockStatementSource::new();
        let options = ExportOptions {
            format: SheetFormat::with_separator(";").unwrap(),
            ..ExportOptions::default()
        };
        let result = export_separate(&source, &["AKT1".to_string()], dir.path(), &options).await;
        assert!(matches!(result, Err(BelrichError::Config(_))));
        assert!(source.queries().is_empty());
    }

    #[tokio::test]
    async fn test_sheet_from_pmids_keeps_query_documents() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockStatementSource::new()
            .with_paper("1", vec![statement("u1", "AKT1", "MTOR", 0.9, &["2", "1"])]);
        let options = ExportOptions {
            allow_duplicates: true,
            ..ExportOptions::default()
        };

        let path = dir.path().join("papers.tsv");
        let json = dir.path().join("papers.json");
        let written = sheet_from_pmids(&source, &["1".to_string()], &path, Some(&json), true, &options)
            .await
            .unwrap();
        assert_eq!(written, 1);
        assert!(json.exists());
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("1\t"));
    }

    #[tokio::test]
    async fn test_sheet_from_agents_without_statements_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockStatementSource::new();
        let path = dir.path().join("agents.tsv");
        let written = sheet_from_agents(&source, &["EGFR".to_string()], &path, None, &ExportOptions::default())
            .await
            .unwrap();
        assert_eq!(written, 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_genes_from_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = belrich_test_utils::write_file(dir.path(), "graph.json", belrich_test_utils::NODE_LINK_GRAPH);
        let mut genes = genes_from_graph(&path, 0.5).unwrap();
        genes.sort();
        assert_eq!(genes, vec!["AKT1", "MTOR", "TP53"]);
        assert_eq!(genes_from_graph(&path, 0.9).unwrap(), vec!["TP53"]);
    }
}
