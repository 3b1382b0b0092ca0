//! BEL node and edge types.
//!
//! Nodes render to canonical BEL, e.g. `p(HGNC:391 ! AKT1, pmod(Ph, Ser, 473))`.
//! Node identity ignores the identifier so `p(HGNC:AKT1)` and
//! `p(HGNC:391 ! AKT1)` are the same node.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Function ────────────────────────────────────────────────────────────────

/// The BEL function of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Function {
    Abundance,
    Gene,
    Rna,
    MicroRna,
    Protein,
    Complex,
    Composite,
    BiologicalProcess,
    Pathology,
    Reaction,
}

impl Function {
    /// Name used in PyBEL's JSON exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Function::Abundance         => "Abundance",
            Function::Gene              => "Gene",
            Function::Rna               => "RNA",
            Function::MicroRna          => "miRNA",
            Function::Protein           => "Protein",
            Function::Complex           => "Complex",
            Function::Composite         => "Composite",
            Function::BiologicalProcess => "BiologicalProcess",
            Function::Pathology         => "Pathology",
            Function::Reaction          => "Reaction",
        }
    }

    /// Short BEL function name used when rendering.
    pub fn bel_short(&self) -> &'static str {
        match self {
            Function::Abundance         => "a",
            Function::Gene              => "g",
            Function::Rna               => "r",
            Function::MicroRna          => "m",
            Function::Protein           => "p",
            Function::Complex           => "complex",
            Function::Composite         => "composite",
            Function::BiologicalProcess => "bp",
            Function::Pathology         => "path",
            Function::Reaction          => "rxn",
        }
    }

    /// Accepts PyBEL names as well as long and short BEL function names.
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "Abundance" | "a" | "abundance" => Function::Abundance,
            "Gene" | "g" | "geneAbundance" => Function::Gene,
            "RNA" | "r" | "rnaAbundance" => Function::Rna,
            "miRNA" | "m" | "microRNAAbundance" => Function::MicroRna,
            "Protein" | "p" | "proteinAbundance" => Function::Protein,
            "Complex" | "complex" | "complexAbundance" => Function::Complex,
            "Composite" | "composite" | "compositeAbundance" => Function::Composite,
            "BiologicalProcess" | "bp" | "biologicalProcess" => Function::BiologicalProcess,
            "Pathology" | "path" | "pathology" => Function::Pathology,
            "Reaction" | "rxn" | "reaction" => Function::Reaction,
            _ => return None,
        };
        Some(f)
    }

    /// Gene, RNA, miRNA and protein nodes.
    pub fn is_central_dogma(&self) -> bool {
        matches!(self, Function::Gene | Function::Rna | Function::MicroRna | Function::Protein)
    }
}

impl From<Function> for &'static str {
    fn from(f: Function) -> Self {
        f.as_str()
    }
}

impl TryFrom<String> for Function {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Function::from_name(&value).ok_or_else(|| format!("unknown BEL function: {value}"))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Quoting ─────────────────────────────────────────────────────────────────

/// Quote a BEL name unless it is a plain word.
pub fn quote_if_needed(s: &str) -> Cow<'_, str> {
    let plain = !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")))
    }
}

// ── Variant ─────────────────────────────────────────────────────────────────

/// A node variant, stored as its rendered BEL, e.g. `pmod(Ph, Ser, 473)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(String);

impl Variant {
    pub fn raw(bel: impl Into<String>) -> Self {
        Variant(bel.into())
    }

    /// Protein modification, e.g. `pmod(Ph, Ser, 473)`.
    pub fn pmod(code: &str, residue: Option<&str>, position: Option<&str>) -> Self {
        let mut parts = vec![quote_if_needed(code).into_owned()];
        if let Some(residue) = residue {
            parts.push(quote_if_needed(residue).into_owned());
            if let Some(position) = position {
                parts.push(quote_if_needed(position).into_owned());
            }
        }
        Variant(format!("pmod({})", parts.join(", ")))
    }

    /// HGVS variant, e.g. `var("p.Val600Glu")`.
    pub fn hgvs(expression: &str) -> Self {
        Variant(format!("var(\"{}\")", expression.replace('"', "\\\"")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Node ────────────────────────────────────────────────────────────────────

/// A BEL node.
///
/// List abundances (complexes, composites) keep their members sorted by
/// their BEL rendering; reactions keep reactants in `members` and products
/// in `products`.
#[derive(Debug, Clone)]
pub struct BelNode {
    pub function: Function,
    pub namespace: Option<String>,
    pub name: Option<String>,
    pub identifier: Option<String>,
    pub variants: Vec<Variant>,
    pub members: Vec<BelNode>,
    pub products: Vec<BelNode>,
}

impl BelNode {
    pub fn new(function: Function, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            function,
            namespace: Some(namespace.into()),
            name: Some(name.into()),
            identifier: None,
            variants: Vec::new(),
            members: Vec::new(),
            products: Vec::new(),
        }
    }

    pub fn protein(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Function::Protein, namespace, name)
    }

    pub fn gene(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Function::Gene, namespace, name)
    }

    pub fn rna(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Function::Rna, namespace, name)
    }

    pub fn abundance(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Function::Abundance, namespace, name)
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_variants(mut self, mut variants: Vec<Variant>) -> Self {
        variants.sort();
        variants.dedup();
        self.variants = variants;
        self
    }

    /// A complex or composite built from its members.
    pub fn list(function: Function, mut members: Vec<BelNode>) -> Self {
        members.sort();
        members.dedup();
        Self {
            function,
            namespace: None,
            name: None,
            identifier: None,
            variants: Vec::new(),
            members,
            products: Vec::new(),
        }
    }

    pub fn complex(members: Vec<BelNode>) -> Self {
        Self::list(Function::Complex, members)
    }

    pub fn reaction(mut reactants: Vec<BelNode>, mut products: Vec<BelNode>) -> Self {
        reactants.sort();
        products.sort();
        Self {
            function: Function::Reaction,
            namespace: None,
            name: None,
            identifier: None,
            variants: Vec::new(),
            members: reactants,
            products,
        }
    }

    /// True for a plain named node: no variants and no members.
    pub fn is_reference(&self) -> bool {
        self.variants.is_empty()
            && self.members.is_empty()
            && self.products.is_empty()
            && self.namespace.is_some()
            && self.name.is_some()
    }

    /// The same concept without variants, if this node has any.
    pub fn parent(&self) -> Option<BelNode> {
        if self.variants.is_empty() {
            return None;
        }
        let mut parent = self.clone();
        parent.variants.clear();
        Some(parent)
    }

    /// The same concept under a different function, e.g. a protein's gene.
    pub fn with_function(&self, function: Function) -> BelNode {
        let mut node = self.clone();
        node.function = function;
        node
    }

    pub fn namespace_is(&self, namespace: &str) -> bool {
        self.namespace
            .as_deref()
            .is_some_and(|ns| ns.eq_ignore_ascii_case(namespace))
    }

    fn concept_bel(&self) -> Option<String> {
        let namespace = self.namespace.as_deref()?;
        let name = self.name.as_deref().or(self.identifier.as_deref())?;
        Some(match (&self.identifier, &self.name) {
            (Some(id), Some(name)) => format!(
                "{}:{} ! {}",
                namespace,
                quote_if_needed(id),
                quote_if_needed(name)
            ),
            _ => format!("{}:{}", namespace, quote_if_needed(name)),
        })
    }

    /// Canonical BEL rendering.
    pub fn as_bel(&self) -> String {
        self.to_string()
    }

    fn key(&self) -> (Function, Option<&str>, Option<&str>, &[Variant], &[BelNode], &[BelNode]) {
        (
            self.function,
            self.namespace.as_deref(),
            self.name.as_deref().or(self.identifier.as_deref()),
            &self.variants,
            &self.members,
            &self.products,
        )
    }
}

impl PartialEq for BelNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for BelNode {}

impl Hash for BelNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for BelNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BelNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for BelNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.function.bel_short();

        if self.function == Function::Reaction {
            let join = |nodes: &[BelNode]| {
                nodes.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            };
            return write!(
                f,
                "rxn(reactants({}), products({}))",
                join(&self.members),
                join(&self.products)
            );
        }

        if !self.members.is_empty() {
            let members: Vec<String> = self.members.iter().map(ToString::to_string).collect();
            return write!(f, "{}({})", short, members.join(", "));
        }

        let mut args: Vec<String> = Vec::with_capacity(1 + self.variants.len());
        if let Some(concept) = self.concept_bel() {
            args.push(concept);
        }
        args.extend(self.variants.iter().map(ToString::to_string));
        write!(f, "{}({})", short, args.join(", "))
    }
}

// ── Modifiers ───────────────────────────────────────────────────────────────

/// A subject/object modifier on an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// `act(x)` or `act(x, ma(effect))`.
    Activity(Option<String>),
    Degradation,
    Translocation { from: String, to: String },
    Secretion,
    SurfaceExpression,
}

impl Modifier {
    pub fn activity(effect: Option<&str>) -> Self {
        Modifier::Activity(effect.map(String::from))
    }

    /// Wrap a node's BEL in this modifier.
    pub fn wrap(&self, inner: &str) -> String {
        match self {
            Modifier::Activity(None) => format!("act({inner})"),
            Modifier::Activity(Some(effect)) => format!("act({inner}, ma({effect}))"),
            Modifier::Degradation => format!("deg({inner})"),
            Modifier::Translocation { from, to } => {
                format!("tloc({inner}, fromLoc({from}), toLoc({to}))")
            }
            Modifier::Secretion => format!("sec({inner})"),
            Modifier::SurfaceExpression => format!("surf({inner})"),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Modifier::Activity(_) => "Activity",
            Modifier::Degradation => "Degradation",
            Modifier::Translocation { .. } => "Translocation",
            Modifier::Secretion => "Secretion",
            Modifier::SurfaceExpression => "CellSurfaceExpression",
        }
    }

    /// Read a modifier from PyBEL-style JSON. Unrecognised shapes yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let kind = value.get("modifier")?.as_str()?;
        match kind {
            "Activity" => Some(Modifier::Activity(value.get("effect").and_then(concept_text))),
            "Degradation" => Some(Modifier::Degradation),
            "Translocation" => {
                let effect = value.get("effect")?;
                let from = effect.get("fromLoc").and_then(concept_text)?;
                let to = effect.get("toLoc").and_then(concept_text)?;
                Some(Modifier::Translocation { from, to })
            }
            "Secretion" => Some(Modifier::Secretion),
            "CellSurfaceExpression" => Some(Modifier::SurfaceExpression),
            _ => None,
        }
    }
}

/// Render a JSON concept (string or `{namespace, name}`) the way BEL writes it.
fn concept_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            let name = map.get("name").and_then(Value::as_str)?;
            match map.get("namespace").and_then(Value::as_str) {
                Some(ns) if !ns.eq_ignore_ascii_case("bel") => {
                    Some(format!("{}:{}", ns, quote_if_needed(name)))
                }
                _ => Some(name.to_string()),
            }
        }
        _ => None,
    }
}

impl Serialize for Modifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("modifier", self.kind())?;
        match self {
            Modifier::Activity(Some(effect)) => map.serialize_entry("effect", effect)?,
            Modifier::Translocation { from, to } => {
                let mut effect = BTreeMap::new();
                effect.insert("fromLoc", from);
                effect.insert("toLoc", to);
                map.serialize_entry("effect", &effect)?;
            }
            _ => {}
        }
        map.end()
    }
}

fn lenient_modifier<'de, D>(deserializer: D) -> Result<Option<Modifier>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Modifier::from_value))
}

/// A node together with an optional modifier, i.e. one side of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BelTerm {
    pub node: BelNode,
    pub modifier: Option<Modifier>,
}

impl BelTerm {
    pub fn new(node: BelNode) -> Self {
        Self { node, modifier: None }
    }

    pub fn with_modifier(node: BelNode, modifier: Option<Modifier>) -> Self {
        Self { node, modifier }
    }
}

impl From<BelNode> for BelTerm {
    fn from(node: BelNode) -> Self {
        BelTerm::new(node)
    }
}

impl fmt::Display for BelTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.to_string();
        match &self.modifier {
            Some(modifier) => f.write_str(&modifier.wrap(&node)),
            None => f.write_str(&node),
        }
    }
}

// ── Relation ────────────────────────────────────────────────────────────────

/// A BEL relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Relation {
    Increases,
    DirectlyIncreases,
    Decreases,
    DirectlyDecreases,
    CausesNoChange,
    Regulates,
    DirectlyRegulates,
    Binds,
    Association,
    PositiveCorrelation,
    NegativeCorrelation,
    Correlation,
    NoCorrelation,
    RateLimitingStepOf,
    SubProcessOf,
    BiomarkerFor,
    PrognosticBiomarkerFor,
    AnalogousTo,
    Orthologous,
    TranscribedTo,
    TranslatedTo,
    HasVariant,
    HasMember,
    HasComponent,
    HasReactant,
    HasProduct,
    IsA,
    PartOf,
    EquivalentTo,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Increases              => "increases",
            Relation::DirectlyIncreases      => "directlyIncreases",
            Relation::Decreases              => "decreases",
            Relation::DirectlyDecreases      => "directlyDecreases",
            Relation::CausesNoChange         => "causesNoChange",
            Relation::Regulates              => "regulates",
            Relation::DirectlyRegulates      => "directlyRegulates",
            Relation::Binds                  => "binds",
            Relation::Association            => "association",
            Relation::PositiveCorrelation    => "positiveCorrelation",
            Relation::NegativeCorrelation    => "negativeCorrelation",
            Relation::Correlation            => "correlation",
            Relation::NoCorrelation          => "noCorrelation",
            Relation::RateLimitingStepOf     => "rateLimitingStepOf",
            Relation::SubProcessOf           => "subProcessOf",
            Relation::BiomarkerFor           => "biomarkerFor",
            Relation::PrognosticBiomarkerFor => "prognosticBiomarkerFor",
            Relation::AnalogousTo            => "analogousTo",
            Relation::Orthologous            => "orthologous",
            Relation::TranscribedTo          => "transcribedTo",
            Relation::TranslatedTo           => "translatedTo",
            Relation::HasVariant             => "hasVariant",
            Relation::HasMember              => "hasMember",
            Relation::HasComponent           => "hasComponent",
            Relation::HasReactant            => "hasReactant",
            Relation::HasProduct             => "hasProduct",
            Relation::IsA                    => "isA",
            Relation::PartOf                 => "partOf",
            Relation::EquivalentTo           => "equivalentTo",
        }
    }

    /// Parse a long or short BEL relation.
    pub fn parse(s: &str) -> Option<Self> {
        let r = match s {
            "increases" | "->" => Relation::Increases,
            "directlyIncreases" | "=>" => Relation::DirectlyIncreases,
            "decreases" | "-|" => Relation::Decreases,
            "directlyDecreases" | "=|" => Relation::DirectlyDecreases,
            "causesNoChange" | "cnc" => Relation::CausesNoChange,
            "regulates" | "reg" => Relation::Regulates,
            "directlyRegulates" => Relation::DirectlyRegulates,
            "binds" => Relation::Binds,
            "association" | "--" => Relation::Association,
            "positiveCorrelation" | "pos" => Relation::PositiveCorrelation,
            "negativeCorrelation" | "neg" => Relation::NegativeCorrelation,
            "correlation" | "cor" => Relation::Correlation,
            "noCorrelation" => Relation::NoCorrelation,
            "rateLimitingStepOf" => Relation::RateLimitingStepOf,
            "subProcessOf" => Relation::SubProcessOf,
            "biomarkerFor" => Relation::BiomarkerFor,
            "prognosticBiomarkerFor" => Relation::PrognosticBiomarkerFor,
            "analogousTo" => Relation::AnalogousTo,
            "orthologous" => Relation::Orthologous,
            "transcribedTo" | ":>" => Relation::TranscribedTo,
            "translatedTo" | ">>" => Relation::TranslatedTo,
            "hasVariant" => Relation::HasVariant,
            "hasMember" => Relation::HasMember,
            "hasComponent" => Relation::HasComponent,
            "hasReactant" => Relation::HasReactant,
            "hasProduct" => Relation::HasProduct,
            "isA" => Relation::IsA,
            "partOf" => Relation::PartOf,
            "equivalentTo" => Relation::EquivalentTo,
            _ => return None,
        };
        Some(r)
    }

    /// Structural relations that carry no citation or evidence.
    pub fn is_unqualified(&self) -> bool {
        matches!(
            self,
            Relation::TranscribedTo
                | Relation::TranslatedTo
                | Relation::HasVariant
                | Relation::HasMember
                | Relation::HasComponent
                | Relation::HasReactant
                | Relation::HasProduct
                | Relation::IsA
                | Relation::PartOf
                | Relation::EquivalentTo
                | Relation::Orthologous
        )
    }

    pub fn is_causal_increase(&self) -> bool {
        matches!(self, Relation::Increases | Relation::DirectlyIncreases)
    }

    pub fn is_causal_decrease(&self) -> bool {
        matches!(self, Relation::Decreases | Relation::DirectlyDecreases)
    }
}

impl From<Relation> for &'static str {
    fn from(r: Relation) -> Self {
        r.as_str()
    }
}

impl TryFrom<String> for Relation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Relation::parse(&value).ok_or_else(|| format!("unknown BEL relation: {value}"))
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Edge ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    #[serde(alias = "type", alias = "db")]
    pub namespace: String,
    #[serde(alias = "reference", alias = "db_id")]
    pub identifier: String,
}

impl Citation {
    pub fn pubmed(identifier: impl Into<String>) -> Self {
        Self {
            namespace: "pubmed".to_string(),
            identifier: identifier.into(),
        }
    }
}

/// Edge data. Unqualified edges only carry a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BelEdge {
    pub relation: Relation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<Citation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_annotations",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub annotations: BTreeMap<String, Vec<String>>,
    #[serde(
        default,
        rename = "subject",
        alias = "source_modifier",
        deserialize_with = "lenient_modifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub subject_modifier: Option<Modifier>,
    #[serde(
        default,
        rename = "object",
        alias = "target_modifier",
        deserialize_with = "lenient_modifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub object_modifier: Option<Modifier>,
}

impl BelEdge {
    pub fn unqualified(relation: Relation) -> Self {
        Self {
            relation,
            citation: None,
            evidence: None,
            annotations: BTreeMap::new(),
            subject_modifier: None,
            object_modifier: None,
        }
    }

    pub fn qualified(relation: Relation, citation: Citation, evidence: impl Into<String>) -> Self {
        Self {
            citation: Some(citation),
            evidence: Some(evidence.into()),
            ..Self::unqualified(relation)
        }
    }

    pub fn annotate(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let values = self.annotations.entry(key.into()).or_default();
        let value = value.into();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// First value of an annotation, if present.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).and_then(|v| v.first()).map(String::as_str)
    }
}

/// Accepts `{key: {value: true}}` (PyBEL), `{key: [values]}` and `{key: value}`.
fn deserialize_annotations<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let mut annotations = BTreeMap::new();
    let Some(Value::Object(map)) = value else {
        return Ok(annotations);
    };

    for (key, entry) in map {
        let values: Vec<String> = match entry {
            Value::Object(inner) => inner
                .into_iter()
                .filter(|(_, flag)| flag.as_bool().unwrap_or(true))
                .map(|(v, _)| v)
                .collect(),
            Value::Array(items) => items.iter().filter_map(annotation_value).collect(),
            other => annotation_value(&other).into_iter().collect(),
        };
        if !values.is_empty() {
            annotations.insert(key, values);
        }
    }
    Ok(annotations)
}

fn annotation_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("identifier"))
            .and_then(Value::as_str)
            .map(String::from),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_protein_with_identifier_and_pmod() {
        let node = BelNode::protein("HGNC", "AKT1")
            .with_identifier("391")
            .with_variants(vec![Variant::pmod("Ph", Some("Ser"), Some("473"))]);
        assert_eq!(node.to_string(), "p(HGNC:391 ! AKT1, pmod(Ph, Ser, 473))");
    }

    #[test]
    fn test_identity_ignores_identifier() {
        let a = BelNode::protein("HGNC", "AKT1");
        let b = BelNode::protein("HGNC", "AKT1").with_identifier("391");
        assert_eq!(a, b);
    }

    #[test]
    fn test_quotes_names_with_punctuation() {
        let node = BelNode::new(Function::BiologicalProcess, "GO", "cell death");
        assert_eq!(node.to_string(), "bp(GO:\"cell death\")");
    }

    #[test]
    fn test_complex_members_are_sorted() {
        let a = BelNode::complex(vec![BelNode::protein("HGNC", "B"), BelNode::protein("HGNC", "A")]);
        let b = BelNode::complex(vec![BelNode::protein("HGNC", "A"), BelNode::protein("HGNC", "B")]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "complex(p(HGNC:A), p(HGNC:B))");
    }

    #[test]
    fn test_activity_modifier_rendering() {
        let term = BelTerm::with_modifier(
            BelNode::protein("HGNC", "MAPK1"),
            Some(Modifier::activity(Some("kin"))),
        );
        assert_eq!(term.to_string(), "act(p(HGNC:MAPK1), ma(kin))");
    }

    #[test]
    fn test_relation_short_forms() {
        assert_eq!(Relation::parse("->"), Some(Relation::Increases));
        assert_eq!(Relation::parse("=|"), Some(Relation::DirectlyDecreases));
        assert_eq!(Relation::parse("binds"), None);
        assert!(Relation::HasComponent.is_unqualified());
        assert!(!Relation::Association.is_unqualified());
    }

    #[test]
    fn test_edge_reads_pybel_annotations() {
        let edge: BelEdge = serde_json::from_value(serde_json::json!({
            "relation": "increases",
            "citation": {"type": "PubMed", "reference": "12345"},
            "evidence": "text",
            "annotations": {"Species": {"9606": true}, "INDRA_API": ["reach", "sparser"]},
            "object": {"modifier": "Activity", "effect": {"namespace": "bel", "name": "kin"}}
        }))
        .unwrap();
        assert_eq!(edge.citation.as_ref().unwrap().identifier, "12345");
        assert_eq!(edge.annotation("Species"), Some("9606"));
        assert_eq!(edge.annotations["INDRA_API"].len(), 2);
        assert_eq!(edge.object_modifier, Some(Modifier::activity(Some("kin"))));
    }
}
