use std::collections::HashSet;
use std::fmt;

use crate::graph::{EdgeIndex, Graph, NodeIndex};
use crate::subgraph::Subgraph;

/// Summary numbers for a graph or a view of one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// `m / n²`: self-loops count as possible edges.
    pub density: f64,
    pub directed: bool,
    /// At least two edges share the same ordered endpoints.
    pub multigraph: bool,
}

impl GraphStats {
    pub fn of(graph: &Graph) -> Self {
        Self::compute(graph, graph.node_count(), 0..graph.edge_count())
    }

    pub fn of_subgraph(sub: &Subgraph<'_>) -> Self {
        Self::compute(
            sub.parent(),
            sub.node_count(),
            sub.edge_indices().iter().copied(),
        )
    }

    fn compute(graph: &Graph, node_count: usize, edges: impl Iterator<Item = EdgeIndex>) -> Self {
        let mut seen: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        let mut edge_count = 0;
        let mut multigraph = false;
        for pair in edges.filter_map(|e| graph.edge_endpoints(e)) {
            edge_count += 1;
            if !seen.insert(pair) {
                multigraph = true;
            }
        }

        let density = if node_count == 0 {
            0.0
        } else {
            edge_count as f64 / (node_count as f64 * node_count as f64)
        };

        Self {
            node_count,
            edge_count,
            density,
            directed: true,
            multigraph,
        }
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}graph with {} nodes, {} edges and a density of {:.4}.",
            if self.directed { "Directed" } else { "Undirected" },
            if self.multigraph { "multi" } else { "" },
            self.node_count,
            self.edge_count,
            self.density
        )
    }
}
