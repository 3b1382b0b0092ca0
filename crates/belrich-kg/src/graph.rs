//! In-memory BEL multigraph.
//!
//! Backed by a petgraph `StableDiGraph` so nodes can be removed and merged
//! without invalidating the remaining indices. Identical parallel edges are
//! stored once.

use std::collections::HashMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::model::{BelEdge, BelNode, Function, Relation};

/// A problem found while building the graph, e.g. an unparsable sheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphWarning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub line_number: usize,
    pub line: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct BelGraph {
    pub name: Option<String>,
    pub version: Option<String>,
    graph: StableDiGraph<BelNode, BelEdge>,
    index: HashMap<BelNode, NodeIndex>,
    warnings: Vec<GraphWarning>,
}

impl BelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, node: &BelNode) -> bool {
        self.index.contains_key(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &BelNode> {
        self.graph.node_indices().map(move |i| &self.graph[i])
    }

    pub fn edges(&self) -> impl Iterator<Item = (&BelNode, &BelNode, &BelEdge)> {
        self.graph
            .edge_references()
            .map(move |e| (&self.graph[e.source()], &self.graph[e.target()], e.weight()))
    }

    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    pub fn add_warning(&mut self, warning: GraphWarning) {
        self.warnings.push(warning);
    }

    /// Insert a node without its implied structural edges.
    pub fn add_node_raw(&mut self, node: BelNode) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node) {
            // Keep an identifier if the first insertion lacked one.
            if self.graph[idx].identifier.is_none() && node.identifier.is_some() {
                self.graph[idx].identifier = node.identifier;
            }
            return idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.index.insert(node, idx);
        idx
    }

    /// Insert a node together with the edges BEL implies for it: variants
    /// hang off their parent via `hasVariant`, list abundances point at their
    /// members via `hasComponent`, reactions at reactants and products.
    pub fn add_node(&mut self, node: BelNode) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }

        let parent = node.parent();
        let members = node.members.clone();
        let products = node.products.clone();
        let function = node.function;
        let idx = self.add_node_raw(node);

        if let Some(parent) = parent {
            let parent_idx = self.add_node(parent);
            self.insert_edge(parent_idx, idx, BelEdge::unqualified(Relation::HasVariant));
        }

        let member_relation = if function == Function::Reaction {
            Relation::HasReactant
        } else {
            Relation::HasComponent
        };
        for member in members {
            let member_idx = self.add_node(member);
            self.insert_edge(idx, member_idx, BelEdge::unqualified(member_relation));
        }
        for product in products {
            let product_idx = self.add_node(product);
            self.insert_edge(idx, product_idx, BelEdge::unqualified(Relation::HasProduct));
        }

        idx
    }

    /// Add an edge between two nodes, inserting the nodes as needed.
    /// Returns false when an identical edge already exists.
    pub fn add_edge(&mut self, source: BelNode, target: BelNode, edge: BelEdge) -> bool {
        let u = self.add_node(source);
        let v = self.add_node(target);
        self.insert_edge(u, v, edge)
    }

    pub fn add_unqualified(&mut self, source: BelNode, target: BelNode, relation: Relation) -> bool {
        self.add_edge(source, target, BelEdge::unqualified(relation))
    }

    pub(crate) fn insert_edge(&mut self, u: NodeIndex, v: NodeIndex, edge: BelEdge) -> bool {
        let exists = self
            .graph
            .edges_directed(u, Direction::Outgoing)
            .any(|e| e.target() == v && e.weight() == &edge);
        if exists {
            return false;
        }
        self.graph.add_edge(u, v, edge);
        true
    }

    /// Number of in- plus out-edges. Self-loops count twice.
    pub fn degree(&self, node: &BelNode) -> usize {
        self.index.get(node).map_or(0, |&idx| self.degree_of(idx))
    }

    fn degree_of(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
            + self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// Every node with its degree.
    pub fn degrees(&self) -> Vec<(&BelNode, usize)> {
        self.graph
            .node_indices()
            .map(|idx| (&self.graph[idx], self.degree_of(idx)))
            .collect()
    }

    pub fn remove_node(&mut self, node: &BelNode) -> bool {
        match self.index.remove(node) {
            Some(idx) => {
                self.graph.remove_node(idx);
                true
            }
            None => false,
        }
    }

    /// Remove all nodes matching the predicate. Returns how many went.
    pub fn remove_nodes_by<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&BelNode) -> bool,
    {
        let doomed: Vec<BelNode> = self.nodes().filter(|n| predicate(n)).cloned().collect();
        for node in &doomed {
            self.remove_node(node);
        }
        doomed.len()
    }

    /// Remove all edges matching the predicate. Returns how many went.
    pub fn remove_edges_by<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&BelEdge) -> bool,
    {
        let doomed: Vec<EdgeIndex> = self
            .graph
            .edge_references()
            .filter(|e| predicate(e.weight()))
            .map(|e| e.id())
            .collect();
        for edge in &doomed {
            self.graph.remove_edge(*edge);
        }
        doomed.len()
    }

    /// Endpoints of every edge with the given relation.
    pub fn pairs_with_relation(&self, relation: Relation) -> Vec<(BelNode, BelNode)> {
        self.graph
            .edge_references()
            .filter(|e| e.weight().relation == relation)
            .map(|e| (self.graph[e.source()].clone(), self.graph[e.target()].clone()))
            .collect()
    }

    /// Merge `victim` into `survivor`: every edge of the victim is rewired to
    /// the survivor, edges between the two are dropped, then the victim is
    /// removed.
    pub fn collapse_pair(&mut self, survivor: &BelNode, victim: &BelNode) -> bool {
        let (Some(&s), Some(&v)) = (self.index.get(survivor), self.index.get(victim)) else {
            return false;
        };
        if s == v {
            return false;
        }

        let outgoing: Vec<(NodeIndex, BelEdge)> = self
            .graph
            .edges_directed(v, Direction::Outgoing)
            .filter(|e| e.target() != s)
            .map(|e| (e.target(), e.weight().clone()))
            .collect();
        let incoming: Vec<(NodeIndex, BelEdge)> = self
            .graph
            .edges_directed(v, Direction::Incoming)
            .filter(|e| e.source() != s)
            .map(|e| (e.source(), e.weight().clone()))
            .collect();

        for (target, edge) in outgoing {
            let target = if target == v { s } else { target };
            self.insert_edge(s, target, edge);
        }
        for (source, edge) in incoming {
            // Self-loops were already carried over with the outgoing edges.
            if source == v {
                continue;
            }
            self.insert_edge(source, s, edge);
        }

        self.remove_node(victim);
        true
    }
}
