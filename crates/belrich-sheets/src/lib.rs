//! Reading curated sheets back, compiling them into a
//! BEL graph and summarizing what curators decided.

pub mod report;
pub mod repository;
pub mod summary;
pub mod table;

pub use report::{
    curation_report, curation_summary, error_types, CurationCategory, CurationReport,
    CurationSummary, EdgeFilter, ErrorTypes,
};
pub use repository::{process_row, SheetsRepository, CACHE_NAME};
pub use summary::count_indra_apis;
pub use table::{read_sheet, sheet_paths, Sheet, SheetRow, DEFAULT_SHEET_SUFFIX, REQUIRED_COLUMNS};
