use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AssemblyConfig;
use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::record::{EdgeRecord, NodeRecord};

/// What to do with an edge whose endpoint is not in the node set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingEdgePolicy {
    /// Abort the whole build with [`GraphError::DanglingReference`].
    #[default]
    Reject,
    /// Drop the edge, log a warning and continue.
    Skip,
}

/// Counts reported by a completed build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub nodes: usize,
    pub edges: usize,
    pub skipped_edges: usize,
}

/// Two-phase graph construction: all nodes, then all edges.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    dangling: DanglingEdgePolicy,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AssemblyConfig) -> Self {
        Self {
            dangling: config.dangling_edges,
        }
    }

    pub fn dangling_edges(mut self, policy: DanglingEdgePolicy) -> Self {
        self.dangling = policy;
        self
    }

    pub fn build<N, E>(&self, nodes: N, edges: E) -> Result<Graph>
    where
        N: IntoIterator<Item = NodeRecord>,
        E: IntoIterator<Item = EdgeRecord>,
    {
        self.build_with_summary(nodes, edges).map(|(graph, _)| graph)
    }

    /// Build and report how many records made it in.
    ///
    /// A duplicate node Identifier aborts before any edge is looked at.
    pub fn build_with_summary<N, E>(&self, nodes: N, edges: E) -> Result<(Graph, BuildSummary)>
    where
        N: IntoIterator<Item = NodeRecord>,
        E: IntoIterator<Item = EdgeRecord>,
    {
        let nodes = nodes.into_iter();
        let edges = edges.into_iter();
        let mut graph = Graph::with_capacity(nodes.size_hint().0, edges.size_hint().0);

        // Phase 1: nodes, dense index in insertion order
        for (position, record) in nodes.enumerate() {
            graph.push_node(record, position)?;
        }
        debug!(
            nodes = graph.node_count(),
            columns = graph.node_attributes().column_count(),
            "node phase complete"
        );

        // Phase 2: edges, both endpoints must already exist
        let mut skipped = 0;
        for (position, record) in edges.enumerate() {
            let source = graph.index_of(&record.source_id);
            let target = graph.index_of(&record.target_id);

            let (Some(source), Some(target)) = (source, target) else {
                let missing = if source.is_none() {
                    record.source_id.clone()
                } else {
                    record.target_id.clone()
                };
                match self.dangling {
                    DanglingEdgePolicy::Reject => {
                        return Err(GraphError::DanglingReference {
                            position,
                            source_id: record.source_id,
                            target_id: record.target_id,
                            edge_type: record.edge_type,
                            missing,
                        });
                    }
                    DanglingEdgePolicy::Skip => {
                        warn!(
                            position,
                            source_id = %record.source_id,
                            target_id = %record.target_id,
                            missing = %missing,
                            "skipping edge with unknown endpoint"
                        );
                        skipped += 1;
                        continue;
                    }
                }
            };

            graph.push_edge(record, source, target);
        }

        let summary = BuildSummary {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            skipped_edges: skipped,
        };
        info!(
            nodes = summary.nodes,
            edges = summary.edges,
            skipped_edges = summary.skipped_edges,
            rel_types = graph.rel_type_count(),
            "graph built"
        );

        Ok((graph, summary))
    }
}

impl Graph {
    /// Build with the default (strict) policy.
    pub fn build<N, E>(nodes: N, edges: E) -> Result<Graph>
    where
        N: IntoIterator<Item = NodeRecord>,
        E: IntoIterator<Item = EdgeRecord>,
    {
        GraphBuilder::new().build(nodes, edges)
    }
}
