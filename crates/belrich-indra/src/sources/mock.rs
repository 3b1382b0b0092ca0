//! In-memory statement source for tests and offline runs.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use belrich_common::Result;

use super::StatementSource;
use crate::models::Statement;

// ── Mock Implementation for Testing ────────────────────────────────────────

/// Serves canned statements per agent set and per PMID, and remembers every
/// query it was asked. An agent query matches like the INDRA service: a
/// statement is returned only when it involves every queried agent.
#[derive(Default)]
pub struct MockStatementSource {
    by_agents: Vec<(BTreeSet<String>, Statement)>,
    by_pmid: HashMap<String, Vec<Statement>>,
    queries: Mutex<Vec<Vec<String>>>,
}

impl MockStatementSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements involving `agent`.
    pub fn with_agent(self, agent: &str, statements: Vec<Statement>) -> Self {
        self.with_agents(&[agent], statements)
    }

    /// Statements involving all of `agents`.
    pub fn with_agents(mut self, agents: &[&str], statements: Vec<Statement>) -> Self {
        let key: BTreeSet<String> = agents.iter().map(|a| a.to_string()).collect();
        self.by_agents
            .extend(statements.into_iter().map(|s| (key.clone(), s)));
        self
    }

    /// Statements returned whenever `pmid` is part of a query.
    pub fn with_paper(mut self, pmid: &str, statements: Vec<Statement>) -> Self {
        self.by_pmid.entry(pmid.to_string()).or_default().extend(statements);
        self
    }

    /// Every query received so far, in order.
    pub fn queries(&self) -> Vec<Vec<String>> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    fn record(&self, query: &[String]) {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_vec());
        }
    }
}

fn collect(index: &HashMap<String, Vec<Statement>>, keys: &[String]) -> Vec<Statement> {
    keys.iter()
        .filter_map(|k| index.get(k.trim()))
        .flatten()
        .cloned()
        .collect()
}

fn involving_all(index: &[(BTreeSet<String>, Statement)], agents: &[String]) -> Vec<Statement> {
    index
        .iter()
        .filter(|(involved, _)| agents.iter().all(|a| involved.contains(a.trim())))
        .map(|(_, statement)| statement.clone())
        .collect()
}

#[async_trait]
impl StatementSource for MockStatementSource {
    async fn from_agents(&self, agents: &[String]) -> Result<Vec<Statement>> {
        self.record(agents);
        Ok(involving_all(&self.by_agents, agents))
    }

    async fn from_papers(&self, pmids: &[String]) -> Result<Vec<Statement>> {
        self.record(pmids);
        Ok(collect(&self.by_pmid, pmids))
    }
}
