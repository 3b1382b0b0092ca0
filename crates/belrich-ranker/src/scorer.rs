//! Information-density scoring of gene nodes.
//!
//! A gene's information score is `1 / (1 + degree)`: isolated genes score
//! 1.0 and the score falls as the graph says more about the gene. High
//! scores mark the genes most worth enriching.

use std::cmp::Ordering;

use belrich_kg::{BelGraph, Function};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Namespace whose gene names are valid agents for the statement service.
pub const HGNC: &str = "HGNC";

/// Score of a node with the given number of in- plus out-edges.
pub fn information_score(degree: usize) -> f64 {
    1.0 / (1.0 + degree as f64)
}

/// A ranked gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRank {
    pub namespace: String,
    pub name: String,
    pub degree: usize,
    pub score: f64,
}

impl GeneRank {
    pub fn is_hgnc(&self) -> bool {
        self.namespace.eq_ignore_ascii_case(HGNC)
    }
}

/// Rank the gene nodes of an already processed graph, best score first.
/// Ties are broken by namespace then name so output is stable.
pub fn rank_genes(graph: &BelGraph) -> Vec<GeneRank> {
    let mut ranks: Vec<GeneRank> = graph
        .degrees()
        .into_iter()
        .filter(|(node, _)| node.function == Function::Gene)
        .filter_map(|(node, degree)| {
            Some(GeneRank {
                namespace: node.namespace.clone()?,
                name: node.name.clone()?,
                degree,
                score: information_score(degree),
            })
        })
        .collect();

    ranks.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.namespace.cmp(&b.namespace))
            .then_with(|| a.name.cmp(&b.name))
    });
    ranks
}

/// Preprocess a copy of the graph, then rank its genes.
pub fn process_rank_genes(graph: &BelGraph) -> Vec<GeneRank> {
    let ranks = rank_genes(&belrich_kg::processed(graph));
    debug!(genes = ranks.len(), "Ranked genes");
    ranks
}

/// HGNC gene symbols whose information score reaches the cutoff, best first.
/// Genes scoring below the cutoff are already well covered and are skipped.
pub fn gene_symbols(graph: &BelGraph, cutoff: f64) -> Vec<String> {
    select_symbols(&process_rank_genes(graph), cutoff)
}

/// The selection step of [`gene_symbols`] over precomputed ranks.
pub fn select_symbols(ranks: &[GeneRank], cutoff: f64) -> Vec<String> {
    ranks
        .iter()
        .filter(|r| r.is_hgnc() && r.score >= cutoff)
        .map(|r| r.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use belrich_kg::{BelEdge, BelNode, Citation, Relation};

    fn causal(pmid: &str) -> BelEdge {
        BelEdge::qualified(Relation::Increases, Citation::pubmed(pmid), "ev")
    }

    fn star_graph() -> BelGraph {
        // HUB touches three genes, LEAF1..3 touch only HUB, LONE touches nothing
        let mut graph = BelGraph::new();
        let hub = BelNode::gene("HGNC", "HUB");
        for (i, leaf) in ["LEAF1", "LEAF2", "LEAF3"].iter().enumerate() {
            graph.add_edge(hub.clone(), BelNode::gene("HGNC", *leaf), causal(&i.to_string()));
        }
        graph.add_node(BelNode::gene("HGNC", "LONE"));
        graph.add_node(BelNode::gene("MGI", "Mouse1"));
        graph
    }

    #[test]
    fn test_information_score_formula() {
        assert_eq!(information_score(0), 1.0);
        assert!((information_score(1) - 0.5).abs() < 1e-12);
        assert!((information_score(3) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_score_is_monotonically_decreasing() {
        let scores: Vec<f64> = (0..50).map(information_score).collect();
        assert!(scores.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_rank_genes_sorted_descending() {
        let ranks = rank_genes(&star_graph());
        assert_eq!(ranks.len(), 6);
        assert!(ranks.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(ranks[0].name, "LONE");
        assert_eq!(ranks.last().unwrap().name, "HUB");
        assert_eq!(ranks.last().unwrap().degree, 3);
    }

    #[test]
    fn test_non_gene_nodes_are_not_ranked() {
        let mut graph = BelGraph::new();
        graph.add_node(BelNode::abundance("CHEBI", "glucose"));
        assert!(rank_genes(&graph).is_empty());
    }

    #[test]
    fn test_select_symbols_applies_cutoff_and_namespace() {
        let ranks = rank_genes(&star_graph());
        assert_eq!(select_symbols(&ranks, 1.0), vec!["LONE".to_string()]);
        assert_eq!(select_symbols(&ranks, 0.5), vec!["LONE", "LEAF1", "LEAF2", "LEAF3"]);
        let all = select_symbols(&ranks, 0.0);
        assert_eq!(all.len(), 5);
        assert!(!all.contains(&"Mouse1".to_string()));
    }

    #[test]
    fn test_gene_symbols_runs_pipeline() {
        let mut graph = BelGraph::new();
        graph.add_edge(
            BelNode::protein("HGNC", "A"),
            BelNode::protein("HGNC", "B"),
            causal("1"),
        );
        graph.add_node(BelNode::protein("HGNC", "C"));
        assert_eq!(gene_symbols(&graph, 1.0), vec!["C".to_string()]);
        assert_eq!(gene_symbols(&graph, 0.5), vec!["C", "A", "B"]);
    }
}
