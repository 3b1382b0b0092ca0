//! INDRA statements. The REST client, statement filters,
//! assembly into BEL and the curation sheet writer.

pub mod assembler;
pub mod filter;
pub mod models;
pub mod rows;
pub mod sources;
pub mod writer;

pub use assembler::{assemble_statement, assemble_statements};
pub use filter::EvidenceFilter;
pub use models::{Agent, Evidence, Statement, StatementKind};
pub use rows::{curation_rows, CurationRow, RowOptions};
pub use sources::{IndraDbClient, MockStatementSource, StatementSource};
pub use writer::{write_rows, write_sheet, write_statements_json_file, SheetFormat};
