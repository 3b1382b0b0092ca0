//! Shared fixtures for belrich tests: a small node-link graph, an INDRA DB
//! REST response, and helpers for writing them to temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use belrich_kg::{BelEdge, BelGraph, BelNode, Citation, Relation};
use serde_json::{json, Value};

pub use pretty_assertions::assert_eq;

/// A PyBEL-style node-link graph.
///
/// After preprocessing it holds genes AKT1 and MTOR joined by one causal
/// edge (score 0.5 each) and an isolated gene TP53 (score 1.0). The mouse
/// gene never qualifies because it is not HGNC.
pub const NODE_LINK_GRAPH: &str = r#"{
    "directed": true,
    "multigraph": true,
    "graph": {"name": "fixture", "version": "0.1.0"},
    "nodes": [
        {"function": "Protein", "concept": {"namespace": "HGNC", "name": "AKT1", "identifier": "391"}},
        {"function": "Protein", "namespace": "HGNC", "name": "AKT1",
         "variants": [{"kind": "pmod", "concept": {"namespace": "bel", "name": "Ph"}, "code": "Ser", "pos": 473}]},
        {"function": "Protein", "namespace": "HGNC", "name": "MTOR"},
        {"function": "Pathology", "namespace": "MESH", "name": "Neoplasms"},
        {"function": "Abundance", "namespace": "CHEBI", "name": "glucose"},
        {"function": "Gene", "namespace": "HGNC", "name": "TP53"},
        {"function": "Gene", "namespace": "MGI", "name": "Trp53"}
    ],
    "links": [
        {"source": 0, "target": 1, "key": "a", "relation": "hasVariant"},
        {"source": 1, "target": 2, "key": "b", "relation": "increases",
         "citation": {"type": "PubMed", "reference": "1"}, "evidence": "AKT1 phosphorylation increases MTOR."},
        {"source": 2, "target": 3, "key": "c", "relation": "increases",
         "citation": {"type": "PubMed", "reference": "2"}, "evidence": "MTOR drives tumours."},
        {"source": 4, "target": 2, "key": "d", "relation": "increases",
         "citation": {"type": "PubMed", "reference": "3"}, "evidence": "Glucose activates MTOR."},
        {"source": 0, "target": 2, "key": "e", "relation": "association",
         "citation": {"type": "PubMed", "reference": "4"}, "evidence": "Associated."}
    ]
}"#;

/// The graph [`NODE_LINK_GRAPH`] describes, built in code.
pub fn akt_mtor_graph() -> BelGraph {
    let mut graph = BelGraph::with_name("fixture");
    let akt1 = BelNode::protein("HGNC", "AKT1");
    let mtor = BelNode::protein("HGNC", "MTOR");
    graph.add_edge(
        akt1.clone(),
        mtor.clone(),
        BelEdge::qualified(Relation::Increases, Citation::pubmed("1"), "AKT1 increases MTOR."),
    );
    graph.add_node(BelNode::gene("HGNC", "TP53"));
    graph
}

/// One INDRA statement in the REST API's JSON shape.
pub fn statement_json(uuid: &str, subject: &str, object: &str, belief: f64, pmids: &[&str]) -> Value {
    let evidence: Vec<Value> = pmids
        .iter()
        .enumerate()
        .map(|(i, pmid)| {
            json!({
                "source_api": "reach",
                "pmid": pmid,
                "text": format!("{subject} activates {object} ({i})."),
                "source_hash": format!("{uuid}{i}"),
            })
        })
        .collect();
    json!({
        "type": "Activation",
        "id": uuid,
        "matches_hash": format!("hash-{uuid}"),
        "belief": belief,
        "subj": {"name": subject, "db_refs": {"HGNC": format!("{subject}-id")}},
        "obj": {"name": object, "db_refs": {"HGNC": format!("{object}-id")}},
        "obj_activity": "activity",
        "evidence": evidence,
    })
}

/// A `statements` response body keyed by matches hash.
pub fn indra_response(statements: &[Value]) -> Value {
    let map: serde_json::Map<String, Value> = statements
        .iter()
        .map(|s| {
            let key = s["matches_hash"].as_str().unwrap_or_default().to_string();
            (key, s.clone())
        })
        .collect();
    json!({ "statements": map, "offset": 0 })
}

/// Write `contents` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture directory");
    }
    fs::write(&path, contents).expect("write fixture file");
    path
}

/// A fresh temporary directory.
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}
