//! Statement and evidence filters applied before sheets are written.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::assembler::NO_EVIDENCE_TEXT;
use crate::models::{Evidence, Statement};

/// Placeholder text INDRA uses for assertions it rewrote.
pub const MODIFIED_ASSERTION: &str = "Modified assertion";

/// Evidence texts that say nothing a curator could check.
pub const TEXT_BLACKLIST: &[&str] = &[NO_EVIDENCE_TEXT, MODIFIED_ASSERTION];

/// Sources already curated as BEL or otherwise unsuitable for review.
pub const SOURCE_BLACKLIST: &[&str] = &["bel", "signor"];

/// Whether an evidence can be shown to a curator: it needs a PMID, real
/// text, and a source outside the blacklist.
pub fn keep_evidence(evidence: &Evidence) -> bool {
    let has_pmid = evidence.pmid.as_deref().is_some_and(|p| !p.is_empty());
    let has_text = evidence
        .text
        .as_deref()
        .is_some_and(|t| !t.is_empty() && !TEXT_BLACKLIST.contains(&t));
    let has_source = evidence
        .source_api
        .as_deref()
        .is_some_and(|s| !s.is_empty() && !SOURCE_BLACKLIST.contains(&s));
    has_pmid && has_text && has_source
}

/// Statements whose belief reaches the cutoff.
pub fn filter_belief(statements: Vec<Statement>, minimum_belief: f64) -> Vec<Statement> {
    let before = statements.len();
    let kept: Vec<Statement> = statements
        .into_iter()
        .filter(|s| s.belief >= minimum_belief)
        .collect();
    debug!(before, after = kept.len(), minimum_belief, "Filtered statements by belief");
    kept
}

/// Statements whose agents are all grounded beyond raw text.
pub fn filter_grounded_only(statements: Vec<Statement>) -> Vec<Statement> {
    let before = statements.len();
    let kept: Vec<Statement> = statements
        .into_iter()
        .filter(|s| s.agents().iter().all(|a| a.is_grounded()))
        .collect();
    debug!(before, after = kept.len(), "Filtered ungrounded statements");
    kept
}

/// Merge statements sharing a matches hash. The first occurrence is kept,
/// absorbs the other copies' evidences (deduplicated by source hash) and the
/// highest belief among them.
pub fn deduplicate(statements: Vec<Statement>) -> Vec<Statement> {
    let before = statements.len();
    let mut merged: Vec<Statement> = Vec::with_capacity(statements.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for statement in statements {
        match positions.get(statement.dedup_key()) {
            Some(&i) => {
                let target = &mut merged[i];
                target.belief = target.belief.max(statement.belief);
                let mut seen: HashSet<Option<String>> =
                    target.evidence.iter().map(|e| e.source_hash.clone()).collect();
                for evidence in statement.evidence {
                    if evidence.source_hash.is_none() || seen.insert(evidence.source_hash.clone()) {
                        target.evidence.push(evidence);
                    }
                }
            }
            None => {
                positions.insert(statement.dedup_key().to_string(), merged.len());
                merged.push(statement);
            }
        }
    }
    debug!(before, after = merged.len(), "Deduplicated statements");
    merged
}

/// Which evidences of a statement end up in the sheet.
#[derive(Debug, Clone, Default)]
pub struct EvidenceFilter {
    /// Keep every remaining evidence instead of only the first.
    pub allow_duplicates: bool,
    /// Only keep evidences from these documents.
    pub keep_only_pmids: Option<HashSet<String>>,
}

impl EvidenceFilter {
    pub fn new(allow_duplicates: bool) -> Self {
        Self {
            allow_duplicates,
            keep_only_pmids: None,
        }
    }

    pub fn with_pmids<I, S>(mut self, pmids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keep_only_pmids = Some(pmids.into_iter().map(|p| p.as_ref().trim().to_string()).collect());
        self
    }

    /// Filter the statement's evidences in place. Returns false when none remain.
    pub fn apply(&self, statement: &mut Statement) -> bool {
        statement.evidence.retain(keep_evidence);
        if let Some(pmids) = &self.keep_only_pmids {
            statement
                .evidence
                .retain(|e| e.pmid.as_ref().is_some_and(|p| pmids.contains(p)));
        }
        if !self.allow_duplicates {
            statement.evidence.truncate(1);
        }
        !statement.evidence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(uuid: &str, hash: &str, belief: f64, evidences: Vec<Evidence>) -> Statement {
        let mut s = Statement::new("Activation", uuid);
        s.matches_hash = Some(hash.into());
        s.belief = belief;
        s.evidence = evidences;
        s
    }

    #[test]
    fn test_keep_evidence_rules() {
        assert!(keep_evidence(&Evidence::new("reach", "1", "A binds B.")));
        assert!(!keep_evidence(&Evidence::new("reach", "", "A binds B.")));
        assert!(!keep_evidence(&Evidence::new("reach", "1", NO_EVIDENCE_TEXT)));
        assert!(!keep_evidence(&Evidence::new("reach", "1", MODIFIED_ASSERTION)));
        assert!(!keep_evidence(&Evidence::new("bel", "1", "A binds B.")));
        assert!(!keep_evidence(&Evidence::new("signor", "1", "A binds B.")));
    }

    #[test]
    fn test_filter_belief_is_inclusive() {
        let kept = filter_belief(
            vec![
                statement("a", "1", 0.29, vec![]),
                statement("b", "2", 0.3, vec![]),
                statement("c", "3", 0.9, vec![]),
            ],
            0.3,
        );
        let uuids: Vec<&str> = kept.iter().map(|s| s.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["b", "c"]);
    }

    #[test]
    fn test_deduplicate_merges_evidence() {
        let merged = deduplicate(vec![
            statement("a", "h", 0.4, vec![Evidence::new("reach", "1", "x").with_source_hash("e1")]),
            statement("b", "other", 0.5, vec![]),
            statement(
                "c",
                "h",
                0.7,
                vec![
                    Evidence::new("reach", "1", "x").with_source_hash("e1"),
                    Evidence::new("sparser", "2", "y").with_source_hash("e2"),
                ],
            ),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].uuid, "a");
        assert_eq!(merged[0].evidence.len(), 2);
        assert_eq!(merged[0].belief, 0.7);
    }

    #[test]
    fn test_evidence_filter_first_only() {
        let mut s = statement(
            "a",
            "h",
            1.0,
            vec![
                Evidence::new("bel", "1", "skipped"),
                Evidence::new("reach", "2", "first"),
                Evidence::new("reach", "3", "second"),
            ],
        );
        assert!(EvidenceFilter::new(false).apply(&mut s));
        assert_eq!(s.evidence.len(), 1);
        assert_eq!(s.evidence[0].pmid.as_deref(), Some("2"));
    }

    #[test]
    fn test_evidence_filter_query_pmids() {
        let mut s = statement(
            "a",
            "h",
            1.0,
            vec![Evidence::new("reach", "2", "first"), Evidence::new("reach", "3", "second")],
        );
        let filter = EvidenceFilter::new(true).with_pmids([" 3 "]);
        assert!(filter.apply(&mut s));
        assert_eq!(s.evidence.len(), 1);
        assert_eq!(s.evidence[0].pmid.as_deref(), Some("3"));

        let mut none = statement("b", "i", 1.0, vec![Evidence::new("reach", "4", "text")]);
        assert!(!filter.apply(&mut none));
    }
}
