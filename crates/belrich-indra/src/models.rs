//! Data models for INDRA statements as served by the INDRA DB REST API.
//!
//! Only the fields the sheet generators read are typed; everything else is
//! kept in `extra` so a statement written back out is the one that came in.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Namespaces that only record the text an agent was read from.
pub const UNGROUNDED_NAMESPACES: &[&str] = &["TEXT", "TEXT_NORM"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "id", default)]
    pub uuid: String,
    #[serde(default, deserialize_with = "lenient_hash", skip_serializing_if = "Option::is_none")]
    pub matches_hash: Option<String>,
    #[serde(default = "default_belief")]
    pub belief: f64,
    #[serde(default)]
    pub evidence: Vec<Evidence>,

    // Role agents. Which ones are present depends on the statement type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subj: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enz: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gef: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ras: Option<Agent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Agent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residue: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj_activity: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_belief() -> f64 { 1.0 }

impl Statement {
    pub fn new(kind: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            uuid: uuid.into(),
            matches_hash: None,
            belief: default_belief(),
            evidence: Vec::new(),
            subj: None,
            obj: None,
            enz: None,
            sub: None,
            gef: None,
            gap: None,
            ras: None,
            members: Vec::new(),
            residue: None,
            position: None,
            obj_activity: None,
            extra: Map::new(),
        }
    }

    pub fn kind(&self) -> StatementKind {
        StatementKind::from_type(&self.kind)
    }

    /// All agents of the statement, in role order.
    pub fn agents(&self) -> Vec<&Agent> {
        [&self.subj, &self.obj, &self.enz, &self.sub, &self.gef, &self.gap, &self.ras]
            .into_iter()
            .flatten()
            .chain(self.members.iter())
            .collect()
    }

    /// Key under which duplicate statements are merged.
    pub fn dedup_key(&self) -> &str {
        self.matches_hash.as_deref().unwrap_or(&self.uuid)
    }
}

// ── Agents ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    #[serde(default)]
    pub db_refs: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mods: Vec<ModCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mutations: Vec<MutCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bound_conditions: Vec<BoundCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivityCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Agent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db_refs: BTreeMap::new(),
            mods: Vec::new(),
            mutations: Vec::new(),
            bound_conditions: Vec::new(),
            activity: None,
            location: None,
            extra: Map::new(),
        }
    }

    pub fn with_ref(mut self, namespace: &str, identifier: &str) -> Self {
        self.db_refs
            .insert(namespace.to_string(), Value::String(identifier.to_string()));
        self
    }

    /// Identifier in the given namespace. List-valued refs yield their first entry.
    pub fn db_ref(&self, namespace: &str) -> Option<String> {
        match self.db_refs.get(namespace)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) => items.first().and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            _ => None,
        }
    }

    /// True when the agent maps to anything beyond its raw text.
    pub fn is_grounded(&self) -> bool {
        self.db_refs
            .keys()
            .any(|ns| !UNGROUNDED_NAMESPACES.contains(&ns.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModCondition {
    pub mod_type: String,
    #[serde(default)]
    pub residue: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: Option<String>,
    #[serde(default = "bool_true")]
    pub is_modified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutCondition {
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: Option<String>,
    #[serde(default)]
    pub residue_from: Option<String>,
    #[serde(default)]
    pub residue_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundCondition {
    pub agent: Box<Agent>,
    #[serde(default = "bool_true")]
    pub is_bound: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCondition {
    pub activity_type: String,
    #[serde(default = "bool_true")]
    pub is_active: bool,
}

fn bool_true() -> bool { true }

// ── Evidence ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default)]
    pub source_api: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pmid: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_hash", skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Evidence {
    pub fn new(source_api: &str, pmid: &str, text: &str) -> Self {
        Self {
            source_api: Some(source_api.to_string()),
            pmid: Some(pmid.to_string()),
            text: Some(text.to_string()),
            source_hash: None,
            extra: Map::new(),
        }
    }

    pub fn with_source_hash(mut self, hash: impl Into<String>) -> Self {
        self.source_hash = Some(hash.into());
        self
    }
}

// ── Statement types ─────────────────────────────────────────────────────────

/// The statement types that assemble into BEL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Activation,
    Inhibition,
    IncreaseAmount,
    DecreaseAmount,
    /// Adding (`removes == false`) or removing a post-translational modification.
    Modification { code: &'static str, removes: bool },
    Autophosphorylation,
    Gef,
    Gap,
    Complex,
    Other,
}

/// INDRA modification statement names and their BEL `pmod` codes.
const MODIFICATIONS: &[(&str, &str)] = &[
    ("Phosphorylation", "Ph"),
    ("Ubiquitination", "Ub"),
    ("Sumoylation", "Sumo"),
    ("Acetylation", "Ac"),
    ("Hydroxylation", "Hy"),
    ("Glycosylation", "Glyco"),
    ("Methylation", "Me"),
    ("Farnesylation", "Farn"),
    ("Palmitoylation", "Palm"),
    ("Myristoylation", "Myr"),
    ("Geranylgeranylation", "Gerger"),
    ("Ribosylation", "ADPRib"),
];

impl StatementKind {
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "Activation" => Self::Activation,
            "Inhibition" => Self::Inhibition,
            "IncreaseAmount" => Self::IncreaseAmount,
            "DecreaseAmount" => Self::DecreaseAmount,
            "Autophosphorylation" => Self::Autophosphorylation,
            "Gef" => Self::Gef,
            "Gap" => Self::Gap,
            "Complex" => Self::Complex,
            other => {
                let (base, removes) = match other.strip_prefix("De") {
                    Some(rest) => (rest, true),
                    None => (other, false),
                };
                let base = capitalize(base);
                MODIFICATIONS
                    .iter()
                    .find(|(name, _)| *name == base)
                    .map_or(Self::Other, |&(_, code)| Self::Modification { code, removes })
            }
        }
    }
}

/// BEL `pmod` code for an agent modification type such as `phosphorylation`.
pub fn pmod_code(mod_type: &str) -> Option<&'static str> {
    let mod_type = capitalize(mod_type);
    MODIFICATIONS
        .iter()
        .find(|(name, _)| *name == mod_type)
        .map(|&(_, code)| code)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Deserialization helpers ─────────────────────────────────────────────────

/// Hashes arrive as JSON integers or strings; keep them as strings.
fn lenient_hash<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
