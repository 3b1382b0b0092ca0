//! Statistics over a compiled sheets graph.

use std::collections::BTreeMap;

use belrich_kg::BelGraph;

/// Annotation key holding the reader that produced a curated statement.
pub const API_ANNOTATION: &str = "INDRA_API";

/// How many times each INDRA source API appears across the edges. An edge
/// annotated with several APIs counts once for each.
pub fn count_indra_apis(graph: &BelGraph) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for (_, _, edge) in graph.edges() {
        let Some(apis) = edge.annotations.get(API_ANNOTATION) else {
            continue;
        };
        for api in apis.iter().map(|a| a.trim()) {
            if api.is_empty() || api.eq_ignore_ascii_case("nan") {
                continue;
            }
            *counts.entry(api.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use belrich_kg::{BelEdge, BelNode, Citation, Relation};

    fn edge(pmid: &str, api: Option<&str>) -> BelEdge {
        let mut edge = BelEdge::qualified(Relation::Increases, Citation::pubmed(pmid), "text");
        if let Some(api) = api {
            edge.annotate(API_ANNOTATION, api);
        }
        edge
    }

    #[test]
    fn test_counts_apis_and_skips_blanks() {
        let mut graph = BelGraph::new();
        let akt = BelNode::protein("HGNC", "AKT1");
        let mtor = BelNode::protein("HGNC", "MTOR");
        graph.add_edge(akt.clone(), mtor.clone(), edge("1", Some("reach")));
        graph.add_edge(akt.clone(), mtor.clone(), edge("2", Some("reach")));
        graph.add_edge(akt.clone(), mtor.clone(), edge("3", Some("sparser")));
        graph.add_edge(akt.clone(), mtor.clone(), edge("4", Some("nan")));
        graph.add_edge(akt, mtor, edge("5", None));

        let counts = count_indra_apis(&graph);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["reach"], 2);
        assert_eq!(counts["sparser"], 1);
    }

    #[test]
    fn test_counts_every_api_of_an_edge() {
        let mut graph = BelGraph::new();
        let mut merged = edge("1", Some("reach"));
        merged.annotate(API_ANNOTATION, "sparser");
        merged.annotate(API_ANNOTATION, "nan");
        graph.add_edge(BelNode::protein("HGNC", "AKT1"), BelNode::protein("HGNC", "MTOR"), merged);

        let counts = count_indra_apis(&graph);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["reach"], 1);
        assert_eq!(counts["sparser"], 1);
    }
}
