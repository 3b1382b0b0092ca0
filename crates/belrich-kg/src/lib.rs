//! belrich-kg: BEL graph model, parsing, node-link I/O and the
//! preprocessing pipeline that reduces a graph to genes.

pub mod model;
pub mod parser;
pub mod graph;
pub mod nodelink;
pub mod pipeline;

pub use graph::{BelGraph, GraphWarning};
pub use model::{BelEdge, BelNode, BelTerm, Citation, Function, Modifier, Relation, Variant};
pub use parser::{parse_statement, parse_term, BelStatement};
pub use pipeline::{process_graph, processed};
