//! Read-only subgraph views.
//!
//! A [`Subgraph`] is two sorted index sets plus a borrow of its parent.
//! It copies no record or property data; everything is re-resolved through
//! the parent when asked for.

use std::collections::HashSet;

use crate::graph::{EdgeIndex, Graph, NodeIndex};
use crate::record::{EdgeKey, EdgeRecord, NodeRecord};

#[derive(Debug, Clone)]
pub struct Subgraph<'g> {
    graph: &'g Graph,
    nodes: Vec<NodeIndex>,
    edges: Vec<EdgeIndex>,
}

impl<'g> Subgraph<'g> {
    /// Normalizes both sets: out-of-range indices dropped, sorted, deduplicated.
    pub(crate) fn from_parts(
        graph: &'g Graph,
        nodes: impl IntoIterator<Item = NodeIndex>,
        edges: impl IntoIterator<Item = EdgeIndex>,
    ) -> Self {
        let mut nodes: Vec<NodeIndex> = nodes
            .into_iter()
            .filter(|&n| (n as usize) < graph.node_count())
            .collect();
        nodes.sort_unstable();
        nodes.dedup();

        let mut edges: Vec<EdgeIndex> = edges
            .into_iter()
            .filter(|&e| e < graph.edge_count())
            .collect();
        edges.sort_unstable();
        edges.dedup();

        Self {
            graph,
            nodes,
            edges,
        }
    }

    pub fn empty(graph: &'g Graph) -> Self {
        Self {
            graph,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// The whole parent graph as a view.
    pub fn full(graph: &'g Graph) -> Self {
        Self {
            graph,
            nodes: graph.node_indices().collect(),
            edges: (0..graph.edge_count()).collect(),
        }
    }

    /// Node-induced view: the given nodes and every edge between them.
    pub fn induced(graph: &'g Graph, nodes: impl IntoIterator<Item = NodeIndex>) -> Self {
        let mut sub = Self::from_parts(graph, nodes, std::iter::empty());

        // Outgoing-only iteration emits each edge exactly once.
        let mut edges = Vec::new();
        for &node in &sub.nodes {
            for edge in graph.neighbors_out(node) {
                if sub.contains_node(edge.target) {
                    edges.push(edge.id);
                }
            }
        }
        edges.sort_unstable();
        sub.edges = edges;
        sub
    }

    /// Edge-induced view: the given edges and exactly their endpoints.
    pub fn from_edges(graph: &'g Graph, edges: impl IntoIterator<Item = EdgeIndex>) -> Self {
        let mut sub = Self::from_parts(graph, std::iter::empty(), edges);
        let mut nodes: Vec<NodeIndex> = sub
            .edges
            .iter()
            .filter_map(|&e| graph.edge_endpoints(e))
            .flat_map(|(s, t)| [s, t])
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        sub.nodes = nodes;
        sub
    }

    /// The graph this view was derived from.
    pub fn parent(&self) -> &'g Graph {
        self.graph
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Member node indices, ascending.
    pub fn node_indices(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// Member edge indices, ascending.
    pub fn edge_indices(&self) -> &[EdgeIndex] {
        &self.edges
    }

    pub fn contains_node(&self, index: NodeIndex) -> bool {
        self.nodes.binary_search(&index).is_ok()
    }

    pub fn contains_edge(&self, id: EdgeIndex) -> bool {
        self.edges.binary_search(&id).is_ok()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.graph
            .index_of(id)
            .is_some_and(|i| self.contains_node(i))
    }

    /// Member Identifiers in parent insertion order.
    pub fn identifiers(&self) -> impl Iterator<Item = &'g str> + '_ {
        let graph = self.graph;
        self.nodes.iter().filter_map(move |&i| graph.identifier(i))
    }

    /// Triples of the member edges.
    fn edge_keys(&self) -> HashSet<EdgeKey<'g>> {
        let graph = self.graph;
        self.edges
            .iter()
            .filter_map(|&e| graph.edge(e))
            .map(EdgeRecord::key)
            .collect()
    }

    /// Parent node records whose Identifier is a member, in insertion order.
    pub fn node_records(&self) -> Vec<&'g NodeRecord> {
        self.project_nodes(self.graph.nodes())
    }

    /// Parent edge records whose `(source_id, target_id, type)` matches a
    /// member edge, in insertion order. Properties are not compared, so
    /// every record sharing a member's triple is returned.
    pub fn edge_records(&self) -> Vec<&'g EdgeRecord> {
        self.project_edges(self.graph.edges())
    }

    /// Filter any record slice down to this view's nodes by Identifier.
    pub fn project_nodes<'r>(&self, records: &'r [NodeRecord]) -> Vec<&'r NodeRecord> {
        records
            .iter()
            .filter(|r| self.contains_id(&r.id))
            .collect()
    }

    /// Filter any record slice down to this view's edges by triple.
    pub fn project_edges<'r>(&self, records: &'r [EdgeRecord]) -> Vec<&'r EdgeRecord> {
        let keys = self.edge_keys();
        records
            .iter()
            .filter(|r| keys.contains(&r.key()))
            .collect()
    }
}
