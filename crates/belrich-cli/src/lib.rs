//! The `bel-enrichment` command line: argument parsing and the
//! workflows that turn a BEL graph into curation sheets.

pub mod cli;
pub mod commands;
pub mod workflow;

pub use workflow::{export_separate, export_single, sheet_from_agents, sheet_from_pmids, ExportOptions, ExportReport};
