//! Preprocessing that strips a BEL graph down to the gene-level view used
//! for finding under-annotated nodes.
//!
//! Order matters: origins are enriched before proteins and RNAs collapse into
//! their genes, and variants collapse after that so they land on the gene.

use tracing::debug;

use crate::graph::BelGraph;
use crate::model::{Function, Relation};

/// Run the full preprocessing pipeline in place.
pub fn process_graph(graph: &mut BelGraph) {
    enrich_protein_and_rna_origins(graph);
    collapse_to_genes(graph);
    collapse_all_variants(graph);
    remove_associations(graph);
    remove_biological_processes(graph);
    remove_pathologies(graph);
    remove_abundances(graph);
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Preprocessing finished"
    );
}

/// A preprocessed copy, leaving the input untouched.
pub fn processed(graph: &BelGraph) -> BelGraph {
    let mut copy = graph.clone();
    process_graph(&mut copy);
    copy
}

/// Add the RNA each reference protein is translated from, and the gene each
/// reference RNA or miRNA is transcribed from.
pub fn enrich_protein_and_rna_origins(graph: &mut BelGraph) {
    let proteins: Vec<_> = graph
        .nodes()
        .filter(|n| n.function == Function::Protein && n.is_reference())
        .cloned()
        .collect();
    for protein in proteins {
        let rna = protein.with_function(Function::Rna);
        graph.add_unqualified(rna, protein, Relation::TranslatedTo);
    }

    let rnas: Vec<_> = graph
        .nodes()
        .filter(|n| matches!(n.function, Function::Rna | Function::MicroRna) && n.is_reference())
        .cloned()
        .collect();
    for rna in rnas {
        let gene = rna.with_function(Function::Gene);
        graph.add_unqualified(gene, rna, Relation::TranscribedTo);
    }
}

/// Merge proteins into their RNAs, then RNAs into their genes.
pub fn collapse_to_genes(graph: &mut BelGraph) {
    enrich_protein_and_rna_origins(graph);
    let mut merged = 0;
    for relation in [Relation::TranslatedTo, Relation::TranscribedTo] {
        for (survivor, victim) in graph.pairs_with_relation(relation) {
            if graph.collapse_pair(&survivor, &victim) {
                merged += 1;
            }
        }
    }
    debug!(merged, "Collapsed central dogma nodes to genes");
}

/// Merge every variant into the node that points at it with `hasVariant`.
pub fn collapse_all_variants(graph: &mut BelGraph) {
    let mut merged = 0;
    for (parent, variant) in graph.pairs_with_relation(Relation::HasVariant) {
        if graph.collapse_pair(&parent, &variant) {
            merged += 1;
        }
    }
    debug!(merged, "Collapsed variants");
}

pub fn remove_associations(graph: &mut BelGraph) {
    let removed = graph.remove_edges_by(|e| e.relation == Relation::Association);
    debug!(removed, "Removed association edges");
}

pub fn remove_biological_processes(graph: &mut BelGraph) {
    remove_function(graph, Function::BiologicalProcess);
}

pub fn remove_pathologies(graph: &mut BelGraph) {
    remove_function(graph, Function::Pathology);
}

pub fn remove_abundances(graph: &mut BelGraph) {
    remove_function(graph, Function::Abundance);
}

fn remove_function(graph: &mut BelGraph, function: Function) {
    let removed = graph.remove_nodes_by(|n| n.function == function);
    debug!(removed, %function, "Removed nodes");
}
