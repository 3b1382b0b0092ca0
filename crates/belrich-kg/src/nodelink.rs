//! Node-link JSON import/export, compatible with PyBEL's `to_nodelink` output.
//!
//! ```json
//! {"directed": true, "multigraph": true, "graph": {"name": "..."},
//!  "nodes": [{"function": "Protein", "namespace": "HGNC", "name": "AKT1"}],
//!  "links": [{"source": 0, "target": 1, "relation": "increases", ...}]}
//! ```
//!
//! Nodes may carry their concept flat or nested under `concept`; variants may
//! be BEL strings or PyBEL variant objects. Links reference nodes by list
//! index, or by the node's `id` when nodes have one.
//!
//! Nodes this model cannot represent (fusions, nodes without a namespaced
//! concept) and links with an unknown relation are skipped with a warning,
//! together with every link touching a skipped node.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use belrich_common::{BelrichError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::graph::{BelGraph, GraphWarning};
use crate::model::{BelEdge, BelNode, Function, Relation, Variant};

#[derive(Debug, Deserialize)]
struct NodeLinkDocument {
    #[serde(default)]
    graph: Map<String, Value>,
    nodes: Vec<Value>,
    #[serde(default, alias = "edges")]
    links: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct LinkRecord {
    source: Value,
    target: Value,
    #[serde(flatten)]
    edge: BelEdge,
}

#[derive(Debug, Serialize)]
struct LinkOut<'a> {
    source: usize,
    target: usize,
    key: usize,
    #[serde(flatten)]
    edge: &'a BelEdge,
}

/// Read a graph from node-link JSON text.
pub fn from_json_str(text: &str) -> Result<BelGraph> {
    let doc: NodeLinkDocument = serde_json::from_str(text)?;

    let mut graph = BelGraph::new();
    graph.name = doc.graph.get("name").and_then(Value::as_str).map(String::from);
    graph.version = doc.graph.get("version").and_then(Value::as_str).map(String::from);
    if let Some(warnings) = doc.graph.get("warnings") {
        let warnings: Vec<GraphWarning> = serde_json::from_value(warnings.clone())?;
        for w in warnings {
            graph.add_warning(w);
        }
    }

    let mut nodes = Vec::with_capacity(doc.nodes.len());
    let mut ids: HashMap<String, usize> = HashMap::new();
    for (i, value) in doc.nodes.iter().enumerate() {
        nodes.push(node_from_value(value)?);
        if let Some(id) = value.get("id") {
            ids.insert(id_key(id), i);
        }
    }

    let resolve = |v: &Value| -> Result<usize> {
        let idx = match v {
            Value::Number(n) if ids.is_empty() => n.as_u64().map(|n| n as usize),
            other => ids.get(&id_key(other)).copied().or_else(|| other.as_u64().map(|n| n as usize)),
        };
        idx.filter(|&i| i < nodes.len())
            .ok_or_else(|| BelrichError::Graph(format!("link references unknown node {v}")))
    };

    let mut unknown_relations = BTreeSet::new();
    let mut skipped_links = 0usize;
    for link in doc.links {
        let relation = link.get("relation").and_then(Value::as_str).unwrap_or_default();
        if Relation::parse(relation).is_none() {
            unknown_relations.insert(relation.to_string());
            skipped_links += 1;
            continue;
        }
        let link: LinkRecord = serde_json::from_value(link)?;
        let (u, v) = (resolve(&link.source)?, resolve(&link.target)?);
        let (Some(source), Some(target)) = (&nodes[u], &nodes[v]) else {
            skipped_links += 1;
            continue;
        };
        let u = graph.add_node_raw(source.clone());
        let v = graph.add_node_raw(target.clone());
        graph.insert_edge(u, v, link.edge);
    }

    // Isolated nodes still count.
    let total_nodes = nodes.len();
    let mut kept_nodes = 0usize;
    for node in nodes.into_iter().flatten() {
        graph.add_node_raw(node);
        kept_nodes += 1;
    }

    if kept_nodes < total_nodes || skipped_links > 0 {
        warn!(
            skipped_nodes = total_nodes - kept_nodes,
            skipped_links,
            unknown_relations = ?unknown_relations,
            "Skipped graph elements that cannot be represented"
        );
    }

    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "Loaded node-link graph");
    Ok(graph)
}

/// Read a graph from a node-link JSON file.
pub fn from_path(path: &Path) -> Result<BelGraph> {
    info!(path = %path.display(), "Loading BEL graph");
    let text = fs::read_to_string(path)?;
    from_json_str(&text)
}

/// Serialize a graph to node-link JSON.
pub fn to_json_value(graph: &BelGraph) -> Result<Value> {
    let mut positions: HashMap<&BelNode, usize> = HashMap::new();
    let mut nodes = Vec::with_capacity(graph.node_count());
    for (i, node) in graph.nodes().enumerate() {
        positions.insert(node, i);
        nodes.push(node_to_value(node));
    }

    let mut links = Vec::with_capacity(graph.edge_count());
    for (key, (u, v, edge)) in graph.edges().enumerate() {
        let link = LinkOut {
            source: positions[u],
            target: positions[v],
            key,
            edge,
        };
        links.push(serde_json::to_value(link)?);
    }

    let mut meta = Map::new();
    if let Some(name) = &graph.name {
        meta.insert("name".into(), Value::String(name.clone()));
    }
    if let Some(version) = &graph.version {
        meta.insert("version".into(), Value::String(version.clone()));
    }
    if !graph.warnings().is_empty() {
        meta.insert("warnings".into(), serde_json::to_value(graph.warnings())?);
    }

    Ok(json!({
        "directed": true,
        "multigraph": true,
        "graph": meta,
        "nodes": nodes,
        "links": links,
    }))
}

pub fn to_json_string(graph: &BelGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_json_value(graph)?)?)
}

pub fn to_path(graph: &BelGraph, path: &Path) -> Result<()> {
    fs::write(path, to_json_string(graph)?)?;
    info!(path = %path.display(), nodes = graph.node_count(), "Wrote BEL graph");
    Ok(())
}

fn id_key(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Node conversion ─────────────────────────────────────────────────────────

/// Convert one node-link node. `Ok(None)` marks a node shape this model
/// does not represent.
fn node_from_value(value: &Value) -> Result<Option<BelNode>> {
    let function_name = value
        .get("function")
        .and_then(Value::as_str)
        .ok_or_else(|| BelrichError::Graph(format!("node without function: {value}")))?;
    let function = Function::from_name(function_name)
        .ok_or_else(|| BelrichError::Graph(format!("unknown node function `{function_name}`")))?;

    if value.get("fusion").is_some() {
        debug!(node = %value, "Skipping fusion node");
        return Ok(None);
    }

    let list = |key: &str| -> Result<Option<Vec<BelNode>>> {
        let Some(items) = value.get(key).and_then(Value::as_array) else {
            return Ok(Some(Vec::new()));
        };
        let members = items.iter().map(node_from_value).collect::<Result<Vec<_>>>()?;
        Ok(members.into_iter().collect())
    };

    match function {
        Function::Reaction => {
            let (Some(reactants), Some(products)) = (list("reactants")?, list("products")?) else {
                return Ok(None);
            };
            return Ok(Some(BelNode::reaction(reactants, products)));
        }
        Function::Complex | Function::Composite => match list("members")? {
            None => return Ok(None),
            Some(members) if !members.is_empty() => {
                return Ok(Some(BelNode::list(function, members)));
            }
            Some(_) => {}
        },
        _ => {}
    }

    let concept = value.get("concept").unwrap_or(value);
    let text = |key: &str| concept.get(key).and_then(scalar_text);
    let identifier = text("identifier");
    let (Some(namespace), Some(name)) = (text("namespace"), text("name").or_else(|| identifier.clone()))
    else {
        debug!(node = %value, "Skipping node without a namespaced concept");
        return Ok(None);
    };

    let mut node = BelNode::new(function, namespace, name);
    node.identifier = identifier;

    let variants = value
        .get("variants")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(variant_from_value).collect())
        .unwrap_or_default();
    Ok(Some(node.with_variants(variants)))
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn variant_from_value(value: &Value) -> Option<Variant> {
    if let Some(bel) = value.as_str() {
        return Some(Variant::raw(bel));
    }
    let kind = value.get("kind").and_then(Value::as_str)?;
    let field = |key: &str| value.get(key).and_then(scalar_text);
    match kind {
        "pmod" => {
            let concept = value.get("concept").or_else(|| value.get("identifier"))?;
            let code = concept.get("name").and_then(Value::as_str)?;
            let residue = field("code");
            let position = field("pos");
            Some(Variant::pmod(code, residue.as_deref(), position.as_deref()))
        }
        "gmod" => {
            let concept = value.get("concept").or_else(|| value.get("identifier"))?;
            let code = concept.get("name").and_then(Value::as_str)?;
            Some(Variant::raw(format!("gmod({code})")))
        }
        "hgvs" => field("variant")
            .or_else(|| field("hgvs"))
            .map(|hgvs| Variant::hgvs(&hgvs)),
        "frag" => {
            let range = match (field("start"), field("stop")) {
                (Some(start), Some(stop)) => format!("{start}_{stop}"),
                _ => "?".to_string(),
            };
            Some(Variant::raw(format!("frag(\"{range}\")")))
        }
        other => {
            debug!(kind = other, "Skipping unsupported variant kind");
            None
        }
    }
}

fn node_to_value(node: &BelNode) -> Value {
    let mut map = Map::new();
    map.insert("function".into(), Value::String(node.function.as_str().into()));
    if let Some(ns) = &node.namespace {
        map.insert("namespace".into(), Value::String(ns.clone()));
    }
    if let Some(name) = &node.name {
        map.insert("name".into(), Value::String(name.clone()));
    }
    if let Some(id) = &node.identifier {
        map.insert("identifier".into(), Value::String(id.clone()));
    }
    if !node.variants.is_empty() {
        let variants = node.variants.iter().map(|v| Value::String(v.to_string())).collect();
        map.insert("variants".into(), Value::Array(variants));
    }
    if node.function == Function::Reaction {
        map.insert("reactants".into(), node.members.iter().map(node_to_value).collect());
        map.insert("products".into(), node.products.iter().map(node_to_value).collect());
    } else if !node.members.is_empty() {
        map.insert("members".into(), node.members.iter().map(node_to_value).collect());
    }
    map.insert("bel".into(), Value::String(node.to_string()));
    Value::Object(map)
}
