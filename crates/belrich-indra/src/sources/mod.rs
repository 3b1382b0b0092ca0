//! Statement sources.

pub mod indra_db;
pub mod mock;

use async_trait::async_trait;
use belrich_common::Result;

use crate::models::Statement;

pub use indra_db::IndraDbClient;
pub use mock::MockStatementSource;

/// Common interface for services that serve INDRA statements.
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// Statements involving all of the given agents, e.g. HGNC gene symbols.
    async fn from_agents(&self, agents: &[String]) -> Result<Vec<Statement>>;

    /// Statements read from the given PubMed documents.
    async fn from_papers(&self, pmids: &[String]) -> Result<Vec<Statement>>;
}
