use std::fmt;
use std::time::Instant;

use tracing::info;

use crate::builder::{BuildSummary, GraphBuilder};
use crate::config::AssemblyConfig;
use crate::error::Result;
use crate::graph::Graph;
use crate::query::{search, SearchReport};
use crate::record::{EdgeRecord, NodeRecord};
use crate::stats::GraphStats;
use crate::subgraph::Subgraph;
use crate::traversal::{egocentric_neighborhood, shortest_path_union};

/// A loaded graph plus the settings its queries run with.
///
/// Extraction defaults (radius, directions, report gap) come from the
/// config, so callers only pass what they want to override.
#[derive(Debug)]
pub struct AssemblySession {
    graph: Graph,
    config: AssemblyConfig,
    summary: BuildSummary,
    load_time_ms: f64,
    loaded_at: Instant,
}

impl AssemblySession {
    /// Validate `config`, then build under its dangling-edge policy.
    pub fn load<N, E>(nodes: N, edges: E, config: AssemblyConfig) -> Result<Self>
    where
        N: IntoIterator<Item = NodeRecord>,
        E: IntoIterator<Item = EdgeRecord>,
    {
        config.validate()?;

        let start = Instant::now();
        let (graph, summary) = GraphBuilder::from_config(&config).build_with_summary(nodes, edges)?;
        let load_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        info!(
            nodes = summary.nodes,
            edges = summary.edges,
            load_time_ms,
            "session loaded"
        );

        Ok(Self {
            graph,
            config,
            summary,
            load_time_ms,
            loaded_at: start,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    pub fn summary(&self) -> BuildSummary {
        self.summary
    }

    /// Neighborhood of `id` in the configured direction. `radius` defaults
    /// to the configured radius and is capped at `max_radius`.
    pub fn neighborhood(&self, id: &str, radius: Option<u32>) -> Result<Subgraph<'_>> {
        egocentric_neighborhood(
            &self.graph,
            id,
            self.config.effective_radius(radius),
            self.config.neighborhood_direction,
        )
    }

    pub fn path_union(&self, source: &str, target: &str) -> Result<Subgraph<'_>> {
        shortest_path_union(&self.graph, source, target, self.config.path_direction)
    }

    pub fn search(&self, substring: &str, property: Option<&str>) -> SearchReport {
        search(&self.graph, substring, property).with_gap(self.config.report_column_gap)
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats::of(&self.graph)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            skipped_edges: self.summary.skipped_edges,
            memory_bytes: self.graph.memory_usage(),
            rel_type_count: self.graph.rel_type_count(),
            load_time_ms: self.load_time_ms,
            age_secs: self.loaded_at.elapsed().as_secs_f64(),
        }
    }
}

/// Point-in-time snapshot of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStatus {
    pub node_count: usize,
    pub edge_count: usize,
    pub skipped_edges: usize,
    pub memory_bytes: usize,
    pub rel_type_count: usize,
    pub load_time_ms: f64,
    pub age_secs: f64,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} edges ({} skipped), {} relationship types, {:.1} MB, loaded in {:.1} ms",
            self.node_count,
            self.edge_count,
            self.skipped_edges,
            self.rel_type_count,
            self.memory_bytes as f64 / (1024.0 * 1024.0),
            self.load_time_ms
        )
    }
}
