//! End-to-end enrichment: graph to per-gene sheets against a mocked INDRA
//! service, then a curator's pass compiled back into a graph and summarized.

use std::fs;
use std::path::Path;

use belrich_cli::workflow::{export_separate, gene_paths, genes_from_graph, ExportOptions};
use belrich_common::IndraConfig;
use belrich_indra::{IndraDbClient, SheetFormat};
use belrich_sheets::{count_indra_apis, curation_summary, CurationCategory, SheetsRepository};
use belrich_test_utils::{assert_eq, indra_response, statement_json, write_file, NODE_LINK_GRAPH};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CURATION_COLUMNS: [&str; 5] = ["Curator", "Checked", "Correct", "Changed", "Error Type"];

async fn mount_agent(server: &MockServer, agent: &str, statements: &[serde_json::Value]) {
    Mock::given(method("GET"))
        .and(path("/statements/from_agents"))
        .and(query_param("agent0", agent))
        .respond_with(ResponseTemplate::new(200).set_body_json(indra_response(statements)))
        .expect(1)
        .mount(server)
        .await;
}

/// Fill the curation columns of every data row of a sheet.
fn curate(sheet: &Path, marks: [&str; 5]) {
    let text = fs::read_to_string(sheet).unwrap();
    let mut lines = text.lines();
    let mut curated = format!("{}\n", lines.next().unwrap());
    for line in lines {
        let mut fields: Vec<&str> = line.split('\t').collect();
        for (i, mark) in marks.iter().enumerate() {
            fields[5 + i] = *mark;
        }
        curated.push_str(&fields.join("\t"));
        curated.push('\n');
    }
    fs::write(sheet, curated).unwrap();
}

#[tokio::test]
async fn test_graph_to_curated_summary() {
    let dir = tempfile::tempdir().unwrap();
    let graph_path = write_file(dir.path(), "graph.json", NODE_LINK_GRAPH);

    let mut genes = genes_from_graph(&graph_path, 0.5).unwrap();
    genes.sort();
    assert_eq!(genes, vec!["AKT1", "MTOR", "TP53"]);

    let server = MockServer::start().await;
    mount_agent(&server, "AKT1", &[statement_json("u1", "AKT1", "MTOR", 0.9, &["11"])]).await;
    mount_agent(&server, "MTOR", &[statement_json("u2", "MTOR", "TP53", 0.7, &["12"])]).await;
    mount_agent(&server, "TP53", &[]).await;

    let client = IndraDbClient::new(&IndraConfig::with_url(server.uri())).unwrap();
    let options = ExportOptions {
        minimum_belief: Some(0.3),
        format: SheetFormat::default()
            .with_extra_columns(CURATION_COLUMNS.iter().map(|c| c.to_string()).collect()),
        ..ExportOptions::default()
    };
    let sheets = dir.path().join("sheets");
    let report = export_separate(&client, &genes, &sheets, &options).await.unwrap();
    assert_eq!(report.written.len(), 3);
    assert_eq!(report.rows, 2);

    let (akt_sheet, _) = gene_paths(&sheets, "AKT1", &options.format).unwrap();
    let (mtor_sheet, _) = gene_paths(&sheets, "MTOR", &options.format).unwrap();
    curate(&akt_sheet, ["jo", "x", "x", "", ""]);
    curate(&mtor_sheet, ["jo", "x", "", "", "grounding"]);

    // only the accepted AKT1 row enters the graph
    let graph = SheetsRepository::new(&sheets).graph(false).unwrap();
    assert_eq!(graph.edge_count(), 1);
    let apis = count_indra_apis(&graph);
    assert_eq!(apis.get("reach"), Some(&1));
    assert!(sheets.join(belrich_sheets::CACHE_NAME).exists());

    let out = dir.path().join("summary");
    let summary = curation_summary(&sheets, &out, ".bel.tsv", None).unwrap();
    assert_eq!(summary.reports["AKT1"].count(CurationCategory::Correct), 1);
    assert_eq!(summary.reports["MTOR"].count(CurationCategory::Error), 1);
    assert!(summary.reports["TP53"].is_empty());
    assert_eq!(summary.error_types["MTOR"].get("grounding"), Some(&1));
}

#[tokio::test]
async fn test_service_failure_stops_export() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = IndraDbClient::new(&IndraConfig::with_url(server.uri())).unwrap();
    let result = export_separate(&client, &["AKT1".to_string()], dir.path(), &ExportOptions::default()).await;
    assert!(result.is_err());
    let (sheet, _) = gene_paths(dir.path(), "AKT1", &SheetFormat::default()).unwrap();
    assert!(!sheet.exists());
}
