//! Record-level boundary for external writers (CSV, GraphML) and viewers.
//!
//! Writers never see internal indices. They get records, counts, and flat
//! rows whose property bag is already serialized to compact JSON.

use serde::Serialize;

use crate::graph::Graph;
use crate::record::{EdgeRecord, NodeRecord};
use crate::subgraph::Subgraph;

/// Column headers of a node row.
pub const NODE_HEADERS: [&str; 3] = ["id", "type", "properties"];

/// Column headers of an edge row.
pub const EDGE_HEADERS: [&str; 4] = ["source_id", "target_id", "type", "properties"];

/// Anything that can enumerate node and edge records: the full graph or a
/// view of it.
pub trait RecordSource {
    /// Node records in original insertion order.
    fn node_records(&self) -> Vec<&NodeRecord>;

    /// Edge records in original insertion order.
    fn edge_records(&self) -> Vec<&EdgeRecord>;

    /// Node count used for naming and reporting.
    fn node_count(&self) -> usize;

    /// Edge count used for naming and reporting.
    fn edge_count(&self) -> usize;

    fn node_rows(&self) -> Vec<NodeRow> {
        self.node_records().into_iter().map(NodeRow::from).collect()
    }

    fn edge_rows(&self) -> Vec<EdgeRow> {
        self.edge_records().into_iter().map(EdgeRow::from).collect()
    }
}

impl RecordSource for Graph {
    fn node_records(&self) -> Vec<&NodeRecord> {
        self.nodes().iter().collect()
    }

    fn edge_records(&self) -> Vec<&EdgeRecord> {
        self.edges().iter().collect()
    }

    fn node_count(&self) -> usize {
        Graph::node_count(self)
    }

    fn edge_count(&self) -> usize {
        Graph::edge_count(self)
    }
}

impl RecordSource for Subgraph<'_> {
    fn node_records(&self) -> Vec<&NodeRecord> {
        Subgraph::node_records(self)
    }

    fn edge_records(&self) -> Vec<&EdgeRecord> {
        Subgraph::edge_records(self)
    }

    fn node_count(&self) -> usize {
        Subgraph::node_count(self)
    }

    fn edge_count(&self) -> usize {
        Subgraph::edge_count(self)
    }
}

/// Flat node row: `id, type, properties-as-JSON`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRow {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub properties: String,
}

impl From<&NodeRecord> for NodeRow {
    fn from(record: &NodeRecord) -> Self {
        Self {
            id: record.id.clone(),
            node_type: record.node_type.clone(),
            properties: properties_json(&record.properties),
        }
    }
}

impl NodeRow {
    pub fn fields(&self) -> [&str; 3] {
        [&self.id, &self.node_type, &self.properties]
    }
}

/// Flat edge row: `source_id, target_id, type, properties-as-JSON`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeRow {
    pub source_id: String,
    pub target_id: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub properties: String,
}

impl From<&EdgeRecord> for EdgeRow {
    fn from(record: &EdgeRecord) -> Self {
        Self {
            source_id: record.source_id.clone(),
            target_id: record.target_id.clone(),
            edge_type: record.edge_type.clone(),
            properties: properties_json(&record.properties),
        }
    }
}

impl EdgeRow {
    pub fn fields(&self) -> [&str; 4] {
        [
            &self.source_id,
            &self.target_id,
            &self.edge_type,
            &self.properties,
        ]
    }
}

/// A string-keyed map of JSON values always serializes; the fallback is
/// unreachable in practice but keeps this infallible for writers.
fn properties_json(properties: &crate::record::Properties) -> String {
    serde_json::to_string(properties).unwrap_or_else(|_| "{}".to_string())
}

/// `{basename}_nodes_n{N}.csv`
pub fn nodes_file_name(basename: &str, source: &impl RecordSource) -> String {
    format!("{}_nodes_n{}.csv", basename, source.node_count())
}

/// `{basename}_edges_e{M}.csv`
pub fn edges_file_name(basename: &str, source: &impl RecordSource) -> String {
    format!("{}_edges_e{}.csv", basename, source.edge_count())
}

/// `{basename}_graph_n{N}_e{M}.graphml`
pub fn graphml_file_name(basename: &str, source: &impl RecordSource) -> String {
    format!(
        "{}_graph_n{}_e{}.graphml",
        basename,
        source.node_count(),
        source.edge_count()
    )
}
