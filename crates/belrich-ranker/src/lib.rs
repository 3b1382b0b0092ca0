//! belrich-ranker: finds the genes a BEL graph says least about.
//!
//! Scoring runs on the preprocessed, gene-level view of the graph produced
//! by `belrich_kg::process_graph`.

pub mod report;
pub mod scorer;

pub use report::{format_rank, most_common};
pub use scorer::{
    gene_symbols, information_score, process_rank_genes, rank_genes, select_symbols, GeneRank,
    HGNC,
};
