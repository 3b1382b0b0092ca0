//! Curation rows: one line of a curation sheet per assembled BEL edge.

use belrich_kg::BelTerm;
use serde::Serialize;
use tracing::debug;

use crate::assembler::{
    assemble_statement, ANNOTATION_SOURCE_API, ANNOTATION_SOURCE_HASH, ANNOTATION_STATEMENT_HASH,
    ANNOTATION_UUID,
};
use crate::filter::{deduplicate, filter_belief, filter_grounded_only, EvidenceFilter};
use crate::models::Statement;

/// Rows mentioning these namespaces describe chemicals, which are out of
/// scope for gene curation.
pub const SUBSTRING_BLACKLIST: &[&str] = &["CHEBI", "PUBCHEM"];

pub const START_HEADER: &[&str] = &["PMID", "Evidence", "Subject", "Predicate", "Object"];
pub const END_HEADER: &[&str] = &["UUID", "Statement Hash", "Evidence Hash", "API", "Belief"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurationRow {
    pub uuid: String,
    pub statement_hash: String,
    pub evidence_hash: String,
    pub api: String,
    pub belief: f64,
    pub pmid: String,
    pub evidence: String,
    pub subject: String,
    pub relation: String,
    pub object: String,
}

impl CurationRow {
    /// Columns before any extra curation columns.
    pub fn start_fields(&self) -> [&str; 5] {
        [
            self.pmid.as_str(),
            self.evidence.as_str(),
            self.subject.as_str(),
            self.relation.as_str(),
            self.object.as_str(),
        ]
    }

    /// Columns after any extra curation columns.
    pub fn end_fields(&self) -> [String; 5] {
        [
            self.uuid.clone(),
            self.statement_hash.clone(),
            self.evidence_hash.clone(),
            self.api.clone(),
            format_belief(self.belief),
        ]
    }

    fn sort_key(&self) -> (&str, &str) {
        (&self.uuid, &self.pmid)
    }
}

/// Belief as written in sheets: rounded to two places, without trailing zeros.
pub fn format_belief(belief: f64) -> String {
    let rounded = round2(belief);
    let mut text = format!("{rounded:.2}");
    while text.ends_with('0') && !text.ends_with(".0") {
        text.pop();
    }
    text
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rows for one statement after its evidences pass the filter.
pub fn rows_from_statement(statement: &Statement, filter: &EvidenceFilter) -> Vec<CurationRow> {
    let mut statement = statement.clone();
    if !filter.apply(&mut statement) {
        return Vec::new();
    }

    let graph = assemble_statement(&statement);
    let mut rows = Vec::new();
    for (u, v, edge) in graph.edges() {
        if edge.relation.is_unqualified() {
            continue;
        }
        let subject = BelTerm::with_modifier(u.clone(), edge.subject_modifier.clone()).to_string();
        let relation = edge.relation.to_string();
        let object = BelTerm::with_modifier(v.clone(), edge.object_modifier.clone()).to_string();

        if [&subject, &relation, &object]
            .iter()
            .any(|part| SUBSTRING_BLACKLIST.iter().any(|s| part.contains(s)))
        {
            continue;
        }
        let Some(citation) = &edge.citation else {
            debug!(uuid = %statement.uuid, "Edge without citation skipped");
            continue;
        };

        let annotation = |key: &str| edge.annotation(key).unwrap_or_default().to_string();
        rows.push(CurationRow {
            uuid: annotation(ANNOTATION_UUID),
            statement_hash: annotation(ANNOTATION_STATEMENT_HASH),
            evidence_hash: annotation(ANNOTATION_SOURCE_HASH),
            api: annotation(ANNOTATION_SOURCE_API),
            belief: round2(statement.belief),
            pmid: citation.identifier.clone(),
            evidence: edge.evidence.clone().unwrap_or_default(),
            subject,
            relation,
            object,
        });
    }
    rows
}

pub fn rows_from_statements(statements: &[Statement], filter: &EvidenceFilter) -> Vec<CurationRow> {
    statements
        .iter()
        .flat_map(|s| rows_from_statement(s, filter))
        .collect()
}

/// Everything that decides which statements become rows.
#[derive(Debug, Clone, Default)]
pub struct RowOptions {
    pub evidence: EvidenceFilter,
    pub allow_ungrounded: bool,
    pub minimum_belief: Option<f64>,
    pub limit: Option<usize>,
}

impl RowOptions {
    pub fn new() -> Self {
        Self {
            allow_ungrounded: true,
            ..Self::default()
        }
    }
}

/// Deduplicate and filter statements, then build the sorted, limited rows.
pub fn curation_rows(statements: Vec<Statement>, options: &RowOptions) -> Vec<CurationRow> {
    let mut statements = deduplicate(statements);
    if !options.allow_ungrounded {
        statements = filter_grounded_only(statements);
    }
    if let Some(minimum) = options.minimum_belief {
        statements = filter_belief(statements, minimum);
    }

    let mut rows = rows_from_statements(&statements, &options.evidence);
    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    if let Some(limit) = options.limit {
        rows.truncate(limit);
    }
    rows
}
