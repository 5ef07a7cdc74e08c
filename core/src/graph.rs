use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeTable, TableKind};
use crate::error::{ConfigError, GraphError, Result};
use crate::record::{EdgeRecord, Identifier, NodeRecord};

/// Dense, build-order node position. Only meaningful inside one Graph.
pub type NodeIndex = u32;

/// Dense, build-order edge position.
pub type EdgeIndex = usize;

/// Interned relationship type index (avoids storing duplicate strings per edge).
pub type RelTypeId = u32;

/// Which stored edges a traversal may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalDirection {
    #[serde(alias = "out")]
    Outgoing,
    #[serde(alias = "in")]
    Incoming,
    Both,
}

impl TraversalDirection {
    pub fn follows_outgoing(self) -> bool {
        matches!(self, Self::Outgoing | Self::Both)
    }

    pub fn follows_incoming(self) -> bool {
        matches!(self, Self::Incoming | Self::Both)
    }

    /// The direction that walks the same paths backwards.
    pub fn reversed(self) -> Self {
        match self {
            Self::Outgoing => Self::Incoming,
            Self::Incoming => Self::Outgoing,
            Self::Both => Self::Both,
        }
    }
}

impl std::str::FromStr for TraversalDirection {
    type Err = ConfigError;

    /// Accepts "outgoing"/"out", "incoming"/"in", "both" (case-insensitive).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "outgoing" | "out" => Ok(Self::Outgoing),
            "incoming" | "in" => Ok(Self::Incoming),
            "both" => Ok(Self::Both),
            _ => Err(ConfigError::InvalidDirection(s.to_string())),
        }
    }
}

/// An adjacency entry: the node at the other end and the edge that leads there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: NodeIndex,
    pub id: EdgeIndex,
}

#[derive(Debug, Clone, Copy)]
struct Ends {
    source: NodeIndex,
    target: NodeIndex,
    rel_type: RelTypeId,
}

/// Immutable, directed multigraph assembled from node and edge records.
///
/// Nodes are addressed by their external Identifier and by a dense internal
/// index. The two maps (`index_of`, `identifiers`) are kept explicitly so no
/// caller has to treat build order as identity. Edges are stored
/// bidirectionally: `outgoing[a]` lists edges leaving a, `incoming[b]` edges
/// entering b.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    index_of: HashMap<Identifier, NodeIndex>,
    identifiers: Vec<Identifier>,
    ends: Vec<Ends>,
    outgoing: Vec<Vec<Edge>>,
    incoming: Vec<Vec<Edge>>,
    node_attributes: AttributeTable,
    edge_attributes: AttributeTable,
    rel_types: Vec<String>,
    rel_type_map: HashMap<String, RelTypeId>,
}

impl Graph {
    /// Pre-allocate for a known graph size.
    pub(crate) fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            edges: Vec::with_capacity(edge_count),
            index_of: HashMap::with_capacity(node_count),
            identifiers: Vec::with_capacity(node_count),
            ends: Vec::with_capacity(edge_count),
            outgoing: Vec::with_capacity(node_count),
            incoming: Vec::with_capacity(node_count),
            node_attributes: AttributeTable::new(TableKind::Node),
            edge_attributes: AttributeTable::new(TableKind::Edge),
            rel_types: Vec::new(),
            rel_type_map: HashMap::new(),
        }
    }

    /// Intern a relationship type string, returning its compact ID.
    fn intern_rel_type(&mut self, rel_type: &str) -> RelTypeId {
        if let Some(&id) = self.rel_type_map.get(rel_type) {
            return id;
        }
        let id = self.rel_types.len() as RelTypeId;
        self.rel_types.push(rel_type.to_string());
        self.rel_type_map.insert(rel_type.to_string(), id);
        id
    }

    /// Append a node, assigning the next dense index.
    pub(crate) fn push_node(&mut self, record: NodeRecord, position: usize) -> Result<NodeIndex> {
        if let Some(&first) = self.index_of.get(&record.id) {
            return Err(GraphError::DuplicateIdentifier {
                id: record.id,
                first: first as usize,
                position,
            });
        }

        let index = self.nodes.len() as NodeIndex;
        self.node_attributes
            .push(Some(&record.id), &record.node_type, &record.properties);
        self.index_of.insert(record.id.clone(), index);
        self.identifiers.push(record.id.clone());
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        self.nodes.push(record);
        Ok(index)
    }

    /// Append an edge between two already-resolved endpoints.
    pub(crate) fn push_edge(&mut self, record: EdgeRecord, source: NodeIndex, target: NodeIndex) -> EdgeIndex {
        let id = self.edges.len();
        let rel_type = self.intern_rel_type(&record.edge_type);
        self.edge_attributes
            .push(None, &record.edge_type, &record.properties);
        self.ends.push(Ends {
            source,
            target,
            rel_type,
        });
        self.outgoing[source as usize].push(Edge { target, id });
        self.incoming[target as usize].push(Edge { target: source, id });
        self.edges.push(record);
        id
    }

    /// Look up the internal index of an Identifier.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index_of.get(id).copied()
    }

    /// Like [`Graph::index_of`], but an unknown Identifier is an error.
    pub fn resolve(&self, id: &str) -> Result<NodeIndex> {
        self.index_of(id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }

    /// The Identifier behind an internal index.
    pub fn identifier(&self, index: NodeIndex) -> Option<&str> {
        self.identifiers.get(index as usize).map(String::as_str)
    }

    pub fn node(&self, index: NodeIndex) -> Option<&NodeRecord> {
        self.nodes.get(index as usize)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&NodeRecord> {
        self.index_of(id).and_then(|i| self.node(i))
    }

    pub fn edge(&self, id: EdgeIndex) -> Option<&EdgeRecord> {
        self.edges.get(id)
    }

    /// `(source, target)` indices of a stored edge.
    pub fn edge_endpoints(&self, id: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.ends.get(id).map(|e| (e.source, e.target))
    }

    /// Relationship type name of a stored edge.
    pub fn edge_type(&self, id: EdgeIndex) -> Option<&str> {
        self.ends
            .get(id)
            .and_then(|e| self.rel_type_name(e.rel_type))
    }

    /// All node records in insertion order.
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    /// All edge records in insertion order.
    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn node_indices(&self) -> Range<NodeIndex> {
        0..self.nodes.len() as NodeIndex
    }

    pub fn node_attributes(&self) -> &AttributeTable {
        &self.node_attributes
    }

    pub fn edge_attributes(&self) -> &AttributeTable {
        &self.edge_attributes
    }

    /// Resolve a RelTypeId back to its string name.
    pub fn rel_type_name(&self, id: RelTypeId) -> Option<&str> {
        self.rel_types.get(id as usize).map(String::as_str)
    }

    pub fn rel_type_count(&self) -> usize {
        self.rel_types.len()
    }

    /// Get outgoing edges for a node.
    pub fn neighbors_out(&self, index: NodeIndex) -> &[Edge] {
        self.outgoing
            .get(index as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get incoming edges for a node. `Edge::target` is the source node.
    pub fn neighbors_in(&self, index: NodeIndex) -> &[Edge] {
        self.incoming
            .get(index as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get both outgoing and incoming edges (undirected traversal).
    pub fn neighbors_all(&self, index: NodeIndex) -> impl Iterator<Item = &Edge> {
        self.neighbors_out(index)
            .iter()
            .chain(self.neighbors_in(index).iter())
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

    /// Approximate memory usage of the index structures in bytes.
    /// Property payloads are not counted.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let id_bytes: usize = self.identifiers.iter().map(|s| s.len()).sum();
        let nodes_mem = self.nodes.len() * (size_of::<NodeRecord>() + size_of::<NodeIndex>() + 40)
            + 2 * id_bytes;
        let edges_mem = self.edges.len() * (size_of::<EdgeRecord>() + size_of::<Ends>());
        let adjacency: usize = self
            .outgoing
            .iter()
            .chain(self.incoming.iter())
            .map(|v| v.len() * size_of::<Edge>())
            .sum();

        nodes_mem + edges_mem + adjacency
    }
}
