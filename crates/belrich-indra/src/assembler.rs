//! Assembly of INDRA statements into BEL.
//!
//! Each statement becomes a small BEL graph holding one qualified edge per
//! evidence. Complexes, variants and bound conditions bring their implied
//! structural edges with them, which the sheet writer later skips.

use belrich_kg::{BelEdge, BelGraph, BelNode, Citation, Function, Modifier, Relation, Variant};
use tracing::debug;

use crate::models::{Agent, Evidence, Statement, StatementKind};

/// Text used for evidences that carry none.
pub const NO_EVIDENCE_TEXT: &str = "No evidence text.";

/// Edge annotation keys copied into curation rows.
pub const ANNOTATION_UUID: &str = "uuid";
pub const ANNOTATION_STATEMENT_HASH: &str = "stmt_hash";
pub const ANNOTATION_SOURCE_HASH: &str = "source_hash";
pub const ANNOTATION_SOURCE_API: &str = "source_api";
pub const ANNOTATION_BELIEF: &str = "belief";

/// Grounding namespaces in order of preference, with the BEL function they imply.
const GROUNDING_PRIORITY: &[(&str, Function)] = &[
    ("HGNC", Function::Protein),
    ("UP", Function::Protein),
    ("FPLX", Function::Protein),
    ("MIRBASE", Function::MicroRna),
    ("CHEBI", Function::Abundance),
    ("PUBCHEM", Function::Abundance),
    ("GO", Function::BiologicalProcess),
    ("MESH", Function::BiologicalProcess),
    ("TEXT", Function::Protein),
];

/// One side of an assembled edge.
struct Side {
    node: BelNode,
    modifier: Option<Modifier>,
}

/// Build the BEL graph for a single statement.
pub fn assemble_statement(statement: &Statement) -> BelGraph {
    let mut graph = BelGraph::new();
    let Some((subject, relation, object)) = causal_triple(statement) else {
        if statement.kind() == StatementKind::Complex {
            let members: Vec<BelNode> = statement.members.iter().filter_map(agent_node).collect();
            if members.len() > 1 {
                graph.add_node(BelNode::complex(members));
            }
        } else {
            debug!(kind = %statement.kind, uuid = %statement.uuid, "Statement type not assembled");
        }
        return graph;
    };

    graph.add_node(subject.node.clone());
    graph.add_node(object.node.clone());
    for evidence in &statement.evidence {
        let mut edge = evidence_edge(statement, evidence, relation);
        edge.subject_modifier = subject.modifier.clone();
        edge.object_modifier = object.modifier.clone();
        graph.add_edge(subject.node.clone(), object.node.clone(), edge);
    }
    graph
}

/// Build one graph holding all statements.
pub fn assemble_statements(statements: &[Statement]) -> BelGraph {
    let mut graph = BelGraph::new();
    for statement in statements {
        let part = assemble_statement(statement);
        for node in part.nodes() {
            graph.add_node(node.clone());
        }
        for (u, v, edge) in part.edges() {
            graph.add_edge(u.clone(), v.clone(), edge.clone());
        }
    }
    graph
}

fn causal_triple(statement: &Statement) -> Option<(Side, Relation, Side)> {
    match statement.kind() {
        kind @ (StatementKind::Activation | StatementKind::Inhibition) => {
            let subj = statement.subj.as_ref()?;
            let obj = statement.obj.as_ref()?;
            let relation = if kind == StatementKind::Activation {
                Relation::DirectlyIncreases
            } else {
                Relation::DirectlyDecreases
            };
            let activity = statement.obj_activity.as_deref().unwrap_or("activity");
            Some((
                agent_side(subj)?,
                relation,
                Side {
                    node: agent_node(obj)?,
                    modifier: Some(activity_modifier(activity)),
                },
            ))
        }
        kind @ (StatementKind::IncreaseAmount | StatementKind::DecreaseAmount) => {
            let subj = statement.subj.as_ref()?;
            let obj = statement.obj.as_ref()?;
            let relation = if kind == StatementKind::IncreaseAmount {
                Relation::Increases
            } else {
                Relation::Decreases
            };
            Some((agent_side(subj)?, relation, Side { node: agent_node(obj)?, modifier: None }))
        }
        StatementKind::Modification { code, removes } => {
            let enz = statement.enz.as_ref()?;
            let sub = statement.sub.as_ref()?;
            let relation = if removes {
                Relation::DirectlyDecreases
            } else {
                Relation::DirectlyIncreases
            };
            Some((agent_side(enz)?, relation, modified_side(statement, sub, code)?))
        }
        StatementKind::Autophosphorylation => {
            let enz = statement.enz.as_ref()?;
            Some((
                agent_side(enz)?,
                Relation::DirectlyIncreases,
                modified_side(statement, enz, "Ph")?,
            ))
        }
        kind @ (StatementKind::Gef | StatementKind::Gap) => {
            let (regulator, effect, relation) = if kind == StatementKind::Gef {
                (statement.gef.as_ref()?, "gef", Relation::DirectlyIncreases)
            } else {
                (statement.gap.as_ref()?, "gap", Relation::DirectlyDecreases)
            };
            let ras = statement.ras.as_ref()?;
            Some((
                Side {
                    node: agent_node(regulator)?,
                    modifier: Some(Modifier::activity(Some(effect))),
                },
                relation,
                Side {
                    node: agent_node(ras)?,
                    modifier: Some(Modifier::activity(Some("gtp"))),
                },
            ))
        }
        StatementKind::Complex | StatementKind::Other => None,
    }
}

fn modified_side(statement: &Statement, agent: &Agent, code: &str) -> Option<Side> {
    let residue = statement.residue.as_deref().map(residue_name);
    let position = residue.as_ref().and(statement.position.as_deref());
    let node = agent_node(agent)?;
    let mut variants = node.variants.clone();
    variants.push(Variant::pmod(code, residue.as_deref(), position));
    let node = match node.function {
        // Complexes carry no variants of their own.
        Function::Complex => node,
        _ => node.with_variants(variants),
    };
    Some(Side { node, modifier: None })
}

fn agent_side(agent: &Agent) -> Option<Side> {
    Some(Side {
        node: agent_node(agent)?,
        modifier: agent_activity(agent),
    })
}

fn agent_activity(agent: &Agent) -> Option<Modifier> {
    agent
        .activity
        .as_ref()
        .filter(|a| a.is_active)
        .map(|a| activity_modifier(&a.activity_type))
}

/// `act(x, ma(...))` for an INDRA activity type, plain `act(x)` for generic activity.
pub fn activity_modifier(activity_type: &str) -> Modifier {
    let effect = match activity_type {
        "activity" => return Modifier::activity(None),
        "kinase" => "kin",
        "phosphatase" => "phos",
        "catalytic" => "cat",
        "gtpbound" => "gtp",
        "transcription" => "tscript",
        "gef" => "gef",
        "gap" => "gap",
        "transport" => "tport",
        "peptidase" => "pep",
        other => other,
    };
    Modifier::activity(Some(effect))
}

/// The BEL node for an agent including its state: modifications and
/// mutations become variants, bound partners turn it into a complex.
pub fn agent_node(agent: &Agent) -> Option<BelNode> {
    let base = agent_reference(agent)?;

    let mut variants: Vec<Variant> = agent
        .mods
        .iter()
        .filter(|m| m.is_modified)
        .map(|m| {
            let code = crate::models::pmod_code(&m.mod_type).unwrap_or(m.mod_type.as_str());
            let residue = m.residue.as_deref().map(residue_name);
            let position = residue.as_ref().and(m.position.as_deref());
            Variant::pmod(code, residue.as_deref(), position)
        })
        .collect();
    if base.function == Function::Protein {
        variants.extend(agent.mutations.iter().filter_map(mutation_variant));
    }
    let node = if variants.is_empty() {
        base
    } else {
        base.with_variants(variants)
    };

    let bound: Vec<BelNode> = agent
        .bound_conditions
        .iter()
        .filter(|bc| bc.is_bound)
        .filter_map(|bc| agent_node(&bc.agent))
        .collect();
    if bound.is_empty() {
        return Some(node);
    }
    let mut members = vec![node];
    members.extend(bound);
    Some(BelNode::complex(members))
}

/// The bare reference node of an agent, grounded by namespace priority.
fn agent_reference(agent: &Agent) -> Option<BelNode> {
    for &(namespace, function) in GROUNDING_PRIORITY {
        let Some(identifier) = agent.db_ref(namespace) else {
            continue;
        };
        let node = match namespace {
            "HGNC" | "UP" => BelNode::new(function, namespace, &agent.name).with_identifier(identifier),
            "CHEBI" | "GO" => {
                let local = identifier
                    .strip_prefix(&format!("{namespace}:"))
                    .unwrap_or(&identifier)
                    .to_string();
                BelNode::new(function, namespace, &agent.name).with_identifier(local)
            }
            "TEXT" => BelNode::new(function, namespace, &agent.name),
            _ => BelNode::new(function, namespace, &agent.name).with_identifier(identifier),
        };
        return Some(node);
    }
    debug!(agent = %agent.name, "Agent has no usable grounding");
    None
}

fn mutation_variant(mutation: &crate::models::MutCondition) -> Option<Variant> {
    let from = residue_name(mutation.residue_from.as_deref()?);
    let position = mutation.position.as_deref()?;
    let to = match mutation.residue_to.as_deref() {
        Some(to) => residue_name(to),
        None => "=".to_string(),
    };
    Some(Variant::hgvs(&format!("p.{from}{position}{to}")))
}

/// Three-letter amino acid code for a one-letter residue.
pub fn residue_name(residue: &str) -> String {
    let three = match residue.to_ascii_uppercase().as_str() {
        "A" => "Ala",
        "R" => "Arg",
        "N" => "Asn",
        "D" => "Asp",
        "C" => "Cys",
        "E" => "Glu",
        "Q" => "Gln",
        "G" => "Gly",
        "H" => "His",
        "I" => "Ile",
        "L" => "Leu",
        "K" => "Lys",
        "M" => "Met",
        "F" => "Phe",
        "P" => "Pro",
        "S" => "Ser",
        "T" => "Thr",
        "W" => "Trp",
        "Y" => "Tyr",
        "V" => "Val",
        "*" => "Ter",
        _ => return residue.to_string(),
    };
    three.to_string()
}

fn evidence_edge(statement: &Statement, evidence: &Evidence, relation: Relation) -> BelEdge {
    let text = evidence.text.as_deref().unwrap_or(NO_EVIDENCE_TEXT);
    let mut edge = match &evidence.pmid {
        Some(pmid) => BelEdge::qualified(relation, Citation::pubmed(pmid), text),
        None => BelEdge {
            evidence: Some(text.to_string()),
            ..BelEdge::unqualified(relation)
        },
    };
    edge.annotate(ANNOTATION_UUID, statement.uuid.as_str());
    if let Some(hash) = &statement.matches_hash {
        edge.annotate(ANNOTATION_STATEMENT_HASH, hash.as_str());
    }
    if let Some(hash) = &evidence.source_hash {
        edge.annotate(ANNOTATION_SOURCE_HASH, hash.as_str());
    }
    if let Some(api) = &evidence.source_api {
        edge.annotate(ANNOTATION_SOURCE_API, api.as_str());
    }
    edge.annotate(ANNOTATION_BELIEF, format!("{:.2}", statement.belief));
    edge
}
