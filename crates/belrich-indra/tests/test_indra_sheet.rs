//! End-to-end: INDRA REST responses to a written curation sheet.

use belrich_common::IndraConfig;
use belrich_indra::{curation_rows, write_sheet, IndraDbClient, RowOptions, SheetFormat, StatementSource};
use belrich_test_utils::{assert_eq, indra_response, statement_json};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_agent_statements_become_sorted_rows() {
    let mock_server = MockServer::start().await;

    let mut chemical = statement_json("u0", "AKT1", "MTOR", 0.9, &["5"]);
    chemical["obj"] = json!({"name": "glucose", "db_refs": {"CHEBI": "CHEBI:17234"}});
    let body = indra_response(&[
        statement_json("u2", "AKT1", "MTOR", 0.8, &["3", "1"]),
        statement_json("u1", "AKT1", "TP53", 0.6, &["2"]),
        statement_json("u3", "AKT1", "EGFR", 0.1, &["4"]),
        chemical,
    ]);

    Mock::given(method("GET"))
        .and(path("/statements/from_agents"))
        .and(query_param("agent0", "AKT1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = IndraDbClient::new(&IndraConfig::with_url(mock_server.uri())).unwrap();
    let statements = client.from_agents(&["AKT1".to_string()]).await.unwrap();
    assert_eq!(statements.len(), 4);

    let mut options = RowOptions::new();
    options.minimum_belief = Some(0.3);
    options.evidence.allow_duplicates = true;
    let rows = curation_rows(statements, &options);

    // u3 is below the belief cutoff, u0 mentions a chemical
    let keys: Vec<(&str, &str)> = rows.iter().map(|r| (r.uuid.as_str(), r.pmid.as_str())).collect();
    assert_eq!(keys, vec![("u1", "2"), ("u2", "1"), ("u2", "3")]);

    let dir = tempfile::tempdir().unwrap();
    let sheet = dir.path().join("AKT1.bel.tsv");
    let written = write_sheet(&sheet, &rows, &SheetFormat::default()).unwrap();
    assert_eq!(written, 3);

    let text = std::fs::read_to_string(&sheet).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(
        header,
        "PMID\tEvidence\tSubject\tPredicate\tObject\tUUID\tStatement Hash\tEvidence Hash\tAPI\tBelief"
    );
    let first: Vec<&str> = text.lines().nth(1).unwrap().split('\t').collect();
    assert_eq!(first[0], "2");
    assert_eq!(first[3], "directlyIncreases");
    assert_eq!(first[5], "u1");
    assert_eq!(first[9], "0.6");
}

#[tokio::test]
async fn test_paper_statements_with_csv_separator() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/statements/from_papers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(indra_response(&[statement_json("u1", "AKT1", "MTOR", 0.9, &["7"])])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = IndraDbClient::new(&IndraConfig::with_url(mock_server.uri())).unwrap();
    let statements = client.from_papers(&["7".to_string()]).await.unwrap();
    let rows = curation_rows(statements, &RowOptions::new());

    let dir = tempfile::tempdir().unwrap();
    let sheet = dir.path().join("papers.csv");
    let format = SheetFormat::with_separator(",")
        .unwrap()
        .with_extra_columns(vec!["Checked".to_string(), "Correct".to_string()]);
    write_sheet(&sheet, &rows, &format).unwrap();

    let mut reader = csv::Reader::from_path(&sheet).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.get(5), Some("Checked"));
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(record.get(0), Some("7"));
    assert_eq!(record.get(5), Some(""));
    assert_eq!(record.get(7), Some("u1"));
}
