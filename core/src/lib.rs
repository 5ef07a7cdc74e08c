//! graph-assembly-core: in-memory knowledge graph assembly and extraction.
//!
//! Takes flat node and edge records with heterogeneous property bags,
//! reconciles them into dense attribute tables, and builds a directed
//! multigraph over them. On top of that graph it extracts egocentric
//! neighborhoods and shortest-path unions as read-only views, runs
//! substring searches, and hands records to export and visualization
//! layers. No file, database or renderer access happens here.
//!
//! Construction is two-phase (all nodes, then all edges) and the graph is
//! immutable afterwards, so it can be shared freely across threads.

mod attributes;
mod builder;
mod config;
mod error;
mod export;
mod graph;
mod query;
mod record;
mod report;
mod session;
mod stats;
mod subgraph;
mod traversal;
mod visual;

pub use attributes::{AttributeTable, Cell, TableKind, NAME_COLUMN, TYPE_COLUMN};
pub use builder::{BuildSummary, DanglingEdgePolicy, GraphBuilder};
pub use config::{AssemblyConfig, GAP_LIMIT, RADIUS_LIMIT};
pub use error::{ConfigError, GraphError, Result};
pub use export::{
    edges_file_name, graphml_file_name, nodes_file_name, EdgeRow, NodeRow, RecordSource,
    EDGE_HEADERS, NODE_HEADERS,
};
pub use graph::{Edge, EdgeIndex, Graph, NodeIndex, RelTypeId, TraversalDirection};
pub use query::{
    matching_subgraph, probe, render_value, search, search_subgraph, CellText, SearchHit,
    SearchReport,
};
pub use record::{EdgeKey, EdgeRecord, Identifier, NodeRecord, Properties};
pub use report::{Sequence, TableLayout, DEFAULT_COLUMN_GAP};
pub use session::{AssemblySession, SessionStatus};
pub use stats::GraphStats;
pub use subgraph::Subgraph;
pub use traversal::{
    bfs_distances, egocentric_neighborhood, neighborhood, shortest_path_union, DEFAULT_RADIUS,
};
pub use visual::{shorten, VisualEdge, VisualGraph, VisualNode, VisualOptions};
