use std::collections::VecDeque;
use std::time::Instant;

use graph_assembly_core::{
    search, AssemblyConfig, AssemblySession, EdgeRecord, GraphStats, NodeRecord, RecordSource,
    TraversalDirection, VisualGraph, VisualOptions,
};
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graph_assembly_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(200_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: graph-assembly-bench [mode] [node_count] [config.toml]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  lsystem     Branching ontology tree (deep paths)");
        println!("  scalefree   Preferential attachment via edge sampling (hub-and-spoke)");
        println!("  smallworld  Ring lattice + shortcuts");
        println!("  barbell     Two dense clusters joined by a thin bridge");
        println!("  dla         Frontier growth with occasional shortcuts");
        println!();
        println!("Default node_count: 200000");
        return;
    }

    let config = match args.get(3) {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Cannot use config {}: {}", path, e);
                return;
            }
        },
        None => AssemblyConfig::default(),
    };
    tracing::info!(?config, "bench configuration");

    println!("graph-assembly-bench");
    println!("====================");
    println!();

    let generators: Vec<(&str, fn(u64) -> Dataset)> = match mode {
        "lsystem" => vec![("Ontology tree", gen_lsystem)],
        "scalefree" => vec![("Scale-free (edge sampling)", gen_scale_free)],
        "smallworld" => vec![("Small-world ring", gen_small_world)],
        "barbell" => vec![("Barbell (cluster-bridge-cluster)", gen_barbell)],
        "dla" => vec![("Frontier growth", gen_dla)],
        "all" => vec![
            ("Ontology tree", gen_lsystem as fn(u64) -> Dataset),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Small-world ring", gen_small_world),
            ("Barbell (cluster-bridge-cluster)", gen_barbell),
            ("Frontier growth", gen_dla),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count, &config);
    }
}

fn load_config(path: &str) -> Result<AssemblyConfig, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let config = AssemblyConfig::from_toml(&text).map_err(|e| e.to_string())?;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn ms(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

fn run_benchmark(name: &str, generator: fn(u64) -> Dataset, node_count: u64, config: &AssemblyConfig) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let data = generator(node_count.max(16));
    println!(
        "Generated {} node records, {} edge records in {:.2}s",
        data.nodes.len(),
        data.edges.len(),
        t.elapsed().as_secs_f64()
    );

    let first = data.nodes.first().map(|n| n.id.clone()).unwrap_or_default();
    let last = data.nodes.last().map(|n| n.id.clone()).unwrap_or_default();

    let session = match AssemblySession::load(data.nodes, data.edges, config.clone()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Build failed: {}", e);
            return;
        }
    };
    let graph = session.graph();
    println!("Built: {}", session.status());
    println!(
        "Node columns: {}, edge columns: {}",
        graph.node_attributes().column_count(),
        graph.edge_attributes().column_count()
    );
    println!("{}", GraphStats::of(graph));

    // Neighborhoods around the first node (typically a root or hub)
    println!();
    println!("{:>8} {:>12} {:>12} {:>10}", "radius", "nodes", "edges", "time");
    println!("{:->8} {:->12} {:->12} {:->10}", "", "", "", "");

    for radius in [0, 1, 2, 3, 5, 10] {
        let t = Instant::now();
        let Ok(sub) = session.neighborhood(&first, Some(radius)) else {
            break;
        };
        let elapsed = ms(t);
        println!(
            "{:>8} {:>12} {:>12} {:>8.1}ms",
            radius,
            sub.node_count(),
            sub.edge_count(),
            elapsed
        );
        if sub.node_count() >= graph.node_count() {
            println!("{:>8} (entire graph reached)", "");
            break;
        }
    }

    // Shortest-path union: first node to last node, both ways of walking
    println!();
    for direction in [TraversalDirection::Outgoing, TraversalDirection::Both] {
        let t = Instant::now();
        match graph_assembly_core::shortest_path_union(graph, &first, &last, direction) {
            Ok(sub) if sub.is_empty() => println!(
                "Path union {} -> {} ({:?}): no path ({:.1}ms)",
                first,
                last,
                direction,
                ms(t)
            ),
            Ok(sub) => println!(
                "Path union {} -> {} ({:?}): {} nodes, {} edges in {:.1}ms",
                first,
                last,
                direction,
                sub.node_count(),
                sub.edge_count(),
                ms(t)
            ),
            Err(e) => println!("Path union failed: {}", e),
        }
    }

    // Substring search over a sparse property column
    let t = Instant::now();
    let report = search(graph, "kinase", Some("label"));
    println!(
        "Search 'kinase' in label: {} hits, {} without label, {:.1}ms",
        report.len(),
        report.absent_count(),
        ms(t)
    );

    // Export and viewer boundaries on a small neighborhood
    if let Ok(sub) = session.neighborhood(&first, Some(2)) {
        let t = Instant::now();
        let rows = sub.node_rows().len() + sub.edge_rows().len();
        let options = VisualOptions::default()
            .color("Gene", "#1f77b4")
            .color("Disease", "#d62728")
            .endpoints(Some(first.as_str()), None);
        let visual = VisualGraph::from_source(&sub, &options);
        let payload = serde_json::to_string(&visual).map(|s| s.len()).unwrap_or(0);
        println!(
            "Radius-2 export: {} rows, viewer payload {} bytes in {:.1}ms",
            rows,
            payload,
            ms(t)
        );
    }
    println!();
}

// ---------------------------------------------------------------------------
// Generators: O(n) or O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

const NODE_TYPES: [&str; 5] = ["Gene", "Protein", "Disease", "Drug", "Pathway"];

const REL_TYPES: [&str; 5] = [
    "interacts_with",
    "associated_with",
    "treats",
    "participates_in",
    "encodes",
];

const LABEL_WORDS: [&str; 6] = ["kinase", "receptor", "syndrome", "inhibitor", "factor", "channel"];

/// Records in build order.
struct Dataset {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

impl Dataset {
    fn with_capacity(nodes: u64, edges: u64) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes as usize),
            edges: Vec::with_capacity(edges as usize),
        }
    }

    /// Node `i` with a type-dependent, deliberately uneven property set.
    fn add_node(&mut self, i: u64, rng: &mut FastRng) {
        let node_type = NODE_TYPES[(i % NODE_TYPES.len() as u64) as usize];
        let mut record = NodeRecord::new(node_id(i), node_type);

        if rng.next(4) != 0 {
            let word = LABEL_WORDS[rng.next(LABEL_WORDS.len() as u64) as usize];
            record = record.with_property("label", format!("{} {}", word, i));
        }
        match node_type {
            "Gene" => {
                record = record
                    .with_property("symbol", format!("G{}", i))
                    .with_property("chromosome", rng.next(23) + 1);
            }
            "Disease" => {
                record = record.with_property("synonyms", json!([format!("D{}", i)]));
            }
            "Drug" => {
                record = record.with_property("approved", rng.next(2) == 0);
            }
            _ => {}
        }
        if rng.next(50) == 0 {
            // Colliding key: reconciles to an aliased column.
            record = record.with_property("type", "legacy");
        }
        self.nodes.push(record);
    }

    fn add_edge(&mut self, from: u64, to: u64, rng: &mut FastRng) {
        let rel = REL_TYPES[rng.next(REL_TYPES.len() as u64) as usize];
        let mut record = EdgeRecord::new(node_id(from), node_id(to), rel);
        if rng.next(3) == 0 {
            record = record.with_property("score", rng.next_f64());
        }
        self.edges.push(record);
    }
}

fn node_id(i: u64) -> String {
    format!("N:{:07}", i)
}

/// Branching ontology tree: every node has three children.
///
/// Produces deep paths (log depth) with exponential width. Tests wide
/// neighborhoods and long path unions.
fn gen_lsystem(node_count: u64) -> Dataset {
    let mut data = Dataset::with_capacity(node_count, node_count);
    let mut rng = FastRng::new(42);

    let branching = 3u64;
    data.add_node(0, &mut rng);
    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                data.add_node(child, &mut rng);
                data.add_edge(parent, child, &mut rng);
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    data
}

/// Scale-free via edge-list sampling.
///
/// A random existing edge endpoint is picked as the attachment target, so
/// nodes with more edges are more likely to gain another.
fn gen_scale_free(node_count: u64) -> Dataset {
    let edges_per_node = 5u64;
    let mut data = Dataset::with_capacity(node_count, node_count * edges_per_node);
    let mut rng = FastRng::new(12345);
    let mut endpoints: Vec<u64> = Vec::with_capacity((node_count * edges_per_node * 2) as usize);

    // Seed: small clique
    let seed = 5u64;
    for i in 0..seed {
        data.add_node(i, &mut rng);
    }
    for i in 0..seed {
        for j in (i + 1)..seed {
            data.add_edge(i, j, &mut rng);
            endpoints.push(i);
            endpoints.push(j);
        }
    }

    for new_node in seed..node_count {
        data.add_node(new_node, &mut rng);
        for _ in 0..edges_per_node.min(new_node) {
            let target = endpoints[rng.next(endpoints.len() as u64) as usize];
            if target != new_node {
                data.add_edge(new_node, target, &mut rng);
                endpoints.push(new_node);
                endpoints.push(target);
            }
        }
    }

    data
}

/// Ring lattice with a small share of edges rewired to random targets.
fn gen_small_world(node_count: u64) -> Dataset {
    let k = 5u64;
    let p = 0.05f64;
    let mut data = Dataset::with_capacity(node_count, node_count * k);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        data.add_node(i, &mut rng);
    }
    for i in 0..node_count {
        for j in 1..=k {
            let mut target = (i + j) % node_count;
            if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                if rewired != i {
                    target = rewired;
                }
            }
            data.add_edge(i, target, &mut rng);
        }
    }

    data
}

/// Two dense clusters joined by a chain of ten bridge nodes.
///
/// The path union from the first cluster to the last node must squeeze
/// through the bridge.
fn gen_barbell(node_count: u64) -> Dataset {
    let bridge_len = 10u64;
    let cluster = (node_count - bridge_len) / 2;
    let mut data = Dataset::with_capacity(node_count, cluster * 20 + bridge_len);
    let mut rng = FastRng::new(99999);

    let b_start = cluster + bridge_len;
    for i in 0..(b_start + cluster) {
        data.add_node(i, &mut rng);
    }

    for offset in [0, b_start] {
        for i in 0..cluster {
            for _ in 0..10u64.min(cluster - 1) {
                let target = rng.next(cluster);
                if target != i {
                    data.add_edge(offset + i, offset + target, &mut rng);
                }
            }
        }
    }

    // Bridge chain: last of A, bridge nodes, first of B
    for id in cluster..=b_start {
        data.add_edge(id - 1, id, &mut rng);
    }
    // Reach the tail of cluster B from its entry node
    data.add_edge(b_start, b_start + cluster - 1, &mut rng);

    data
}

/// Frontier growth: each new node attaches to a recent node, with a 10%
/// chance of a second, long-range edge.
fn gen_dla(node_count: u64) -> Dataset {
    let mut data = Dataset::with_capacity(node_count, node_count * 2);
    let mut rng = FastRng::new(77777);

    data.add_node(0, &mut rng);
    let surface_max = 10_000usize;
    let mut surface: VecDeque<u64> = VecDeque::with_capacity(surface_max + 1);
    surface.push_back(0);

    for new_node in 1..node_count {
        data.add_node(new_node, &mut rng);

        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        data.add_edge(attach_to, new_node, &mut rng);

        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            if other != attach_to {
                data.add_edge(other, new_node, &mut rng);
            }
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    data
}
