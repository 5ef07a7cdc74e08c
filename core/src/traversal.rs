use std::collections::VecDeque;

use crate::error::Result;
use crate::graph::{Edge, EdgeIndex, Graph, NodeIndex, TraversalDirection};
use crate::subgraph::Subgraph;

/// Default hop radius of an egocentric neighborhood.
pub const DEFAULT_RADIUS: u32 = 1;

/// Iterate neighbors according to a traversal direction filter.
///
/// Uses boolean flags to avoid Box/dyn dispatch; the compiler turns this
/// into direct slice iteration.
fn iter_neighbors<'a>(
    graph: &'a Graph,
    node: NodeIndex,
    dir: TraversalDirection,
) -> impl Iterator<Item = &'a Edge> {
    let use_out = dir.follows_outgoing();
    let use_inc = dir.follows_incoming();

    let out_iter = graph
        .neighbors_out(node)
        .iter()
        .filter(move |_| use_out);

    let in_iter = graph
        .neighbors_in(node)
        .iter()
        .filter(move |_| use_inc);

    out_iter.chain(in_iter)
}

/// Hop distance from `start` to every node, indexed by NodeIndex.
///
/// `None` marks nodes not reached within `max_depth` (unbounded when
/// `max_depth` is None). Each node is visited at most once, at its minimum
/// distance, so cycles and parallel edges cost nothing extra.
pub fn bfs_distances(
    graph: &Graph,
    start: NodeIndex,
    max_depth: Option<u32>,
    direction: TraversalDirection,
) -> Vec<Option<u32>> {
    let mut distance: Vec<Option<u32>> = vec![None; graph.node_count()];
    if start as usize >= distance.len() {
        return distance;
    }
    distance[start as usize] = Some(0);

    let mut queue: VecDeque<(NodeIndex, u32)> = VecDeque::new();
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if max_depth.is_some_and(|max| depth >= max) {
            continue;
        }

        for edge in iter_neighbors(graph, current, direction) {
            let seen = &mut distance[edge.target as usize];
            if seen.is_none() {
                *seen = Some(depth + 1);
                queue.push_back((edge.target, depth + 1));
            }
        }
    }

    distance
}

/// Closed neighborhood of `id` up to `radius` hops, with every edge whose
/// endpoints both fall inside.
///
/// `TraversalDirection::Both` measures distance as if the graph were
/// undirected. `Outgoing`/`Incoming` only count hops along (or against) the
/// stored edge orientation; the induced edge set is the same rule either way.
pub fn egocentric_neighborhood<'g>(
    graph: &'g Graph,
    id: &str,
    radius: u32,
    direction: TraversalDirection,
) -> Result<Subgraph<'g>> {
    let start = graph.resolve(id)?;
    let distance = bfs_distances(graph, start, Some(radius), direction);
    let members = distance
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_some())
        .map(|(i, _)| i as NodeIndex);
    Ok(Subgraph::induced(graph, members))
}

/// One-hop undirected neighborhood.
pub fn neighborhood<'g>(graph: &'g Graph, id: &str) -> Result<Subgraph<'g>> {
    egocentric_neighborhood(graph, id, DEFAULT_RADIUS, TraversalDirection::Both)
}

/// Union of the edges on every minimum-length path from `source` to `target`.
///
/// Nodes are exactly the endpoints of those edges. An unreachable target
/// yields an empty subgraph; `source == target` yields that single node.
/// When several parallel edges join two consecutive path nodes, all of them
/// are included.
///
/// An edge traversed u→v lies on a shortest path iff
/// `d(source, u) + 1 + d(v, target) == d(source, target)`, so two BFS passes
/// (forward from the source, reversed from the target) classify every edge
/// without enumerating paths.
pub fn shortest_path_union<'g>(
    graph: &'g Graph,
    source: &str,
    target: &str,
    direction: TraversalDirection,
) -> Result<Subgraph<'g>> {
    let start = graph.resolve(source)?;
    let goal = graph.resolve(target)?;

    if start == goal {
        return Ok(Subgraph::from_parts(graph, [start], std::iter::empty()));
    }

    let from_start = bfs_distances(graph, start, None, direction);
    let Some(total) = from_start[goal as usize] else {
        return Ok(Subgraph::empty(graph));
    };
    let to_goal = bfs_distances(graph, goal, None, direction.reversed());

    let on_path = |u: NodeIndex, v: NodeIndex| {
        matches!(
            (from_start[u as usize], to_goal[v as usize]),
            (Some(du), Some(dv)) if du + 1 + dv == total
        )
    };

    let edges: Vec<EdgeIndex> = (0..graph.edge_count())
        .filter(|&e| {
            let Some((a, b)) = graph.edge_endpoints(e) else {
                return false;
            };
            (direction.follows_outgoing() && on_path(a, b))
                || (direction.follows_incoming() && on_path(b, a))
        })
        .collect();

    Ok(Subgraph::from_edges(graph, edges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::record::{EdgeRecord, NodeRecord};

    fn build(nodes: &[&str], edges: &[(&str, &str, &str)]) -> Graph {
        Graph::build(
            nodes.iter().map(|id| NodeRecord::new(*id, "Node")),
            edges.iter().map(|(s, t, r)| EdgeRecord::new(*s, *t, *r)),
        )
        .unwrap()
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("n{}", i)).collect()
    }

    fn make_chain(n: usize) -> Graph {
        let ids = names(n);
        Graph::build(
            ids.iter().map(|id| NodeRecord::new(id.as_str(), "Node")),
            (0..n - 1).map(|i| EdgeRecord::new(ids[i].as_str(), ids[i + 1].as_str(), "NEXT")),
        )
        .unwrap()
    }

    fn make_star(leaves: usize) -> Graph {
        let ids = names(leaves + 1);
        Graph::build(
            ids.iter().map(|id| NodeRecord::new(id.as_str(), "Node")),
            (1..=leaves).map(|i| EdgeRecord::new("n0", ids[i].as_str(), "HAS")),
        )
        .unwrap()
    }

    fn make_cycle(n: usize) -> Graph {
        let ids = names(n);
        Graph::build(
            ids.iter().map(|id| NodeRecord::new(id.as_str(), "Node")),
            (0..n).map(|i| EdgeRecord::new(ids[i].as_str(), ids[(i + 1) % n].as_str(), "NEXT")),
        )
        .unwrap()
    }

    fn ids<'a>(sub: &'a Subgraph<'_>) -> Vec<&'a str> {
        sub.identifiers().collect()
    }

    // --- BFS tests ---

    #[test]
    fn test_bfs_chain() {
        let g = make_chain(6);
        let d = bfs_distances(&g, 0, None, TraversalDirection::Both);
        assert!(d.iter().all(|x| x.is_some()));
        assert_eq!(d[5], Some(5));
    }

    #[test]
    fn test_bfs_depth_limited() {
        let g = make_chain(10);
        let d = bfs_distances(&g, 0, Some(3), TraversalDirection::Both);
        assert_eq!(d.iter().filter(|x| x.is_some()).count(), 4);
        assert_eq!(d[4], None);
    }

    #[test]
    fn test_bfs_depth_zero() {
        let g = make_chain(5);
        let d = bfs_distances(&g, 2, Some(0), TraversalDirection::Both);
        assert_eq!(d.iter().filter(|x| x.is_some()).count(), 1);
        assert_eq!(d[2], Some(0));
    }

    #[test]
    fn test_bfs_cycle_no_infinite_loop() {
        let g = make_cycle(5);
        let d = bfs_distances(&g, 0, None, TraversalDirection::Both);
        assert_eq!(d, vec![Some(0), Some(1), Some(2), Some(2), Some(1)]);
    }

    #[test]
    fn test_bfs_outgoing_only() {
        let g = make_chain(3);
        let d = bfs_distances(&g, 2, None, TraversalDirection::Outgoing);
        assert_eq!(d, vec![None, None, Some(0)]);
        let d = bfs_distances(&g, 2, None, TraversalDirection::Incoming);
        assert_eq!(d, vec![Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn test_bfs_start_out_of_range() {
        let g = make_chain(3);
        let d = bfs_distances(&g, 99, None, TraversalDirection::Both);
        assert!(d.iter().all(|x| x.is_none()));
    }

    // --- Neighborhood tests ---

    #[test]
    fn test_neighborhood_example() {
        let g = build(
            &["A", "B", "C"],
            &[("A", "B", "interacts"), ("B", "C", "causes")],
        );
        let sub = neighborhood(&g, "B").unwrap();
        assert_eq!(ids(&sub), vec!["A", "B", "C"]);
        assert_eq!(sub.edge_count(), 2);
    }

    #[test]
    fn test_neighborhood_includes_self() {
        let g = build(&["lonely", "other"], &[]);
        let sub = neighborhood(&g, "lonely").unwrap();
        assert_eq!(ids(&sub), vec!["lonely"]);
        assert_eq!(sub.edge_count(), 0);
    }

    #[test]
    fn test_neighborhood_star() {
        let g = make_star(10);
        let sub = neighborhood(&g, "n0").unwrap();
        assert_eq!(sub.node_count(), 11);
        assert_eq!(sub.edge_count(), 10);
    }

    #[test]
    fn test_neighborhood_leaf_radius_two() {
        // Leaf -> hub -> all other leaves
        let g = make_star(10);
        let one = egocentric_neighborhood(&g, "n3", 1, TraversalDirection::Both).unwrap();
        let two = egocentric_neighborhood(&g, "n3", 2, TraversalDirection::Both).unwrap();
        assert_eq!(one.node_count(), 2);
        assert_eq!(two.node_count(), 11);
    }

    #[test]
    fn test_neighborhood_direction_changes_size() {
        // a -> b -> c, from b: undirected sees a and c, outgoing only c.
        let g = build(&["a", "b", "c"], &[("a", "b", "r"), ("b", "c", "r")]);
        let both = egocentric_neighborhood(&g, "b", 1, TraversalDirection::Both).unwrap();
        let out = egocentric_neighborhood(&g, "b", 1, TraversalDirection::Outgoing).unwrap();
        let inc = egocentric_neighborhood(&g, "b", 1, TraversalDirection::Incoming).unwrap();
        assert_eq!(ids(&both), vec!["a", "b", "c"]);
        assert_eq!(ids(&out), vec!["b", "c"]);
        assert_eq!(ids(&inc), vec!["a", "b"]);
    }

    #[test]
    fn test_neighborhood_induces_back_edges() {
        // Outgoing reach from a is {a, b}; the b -> a edge is still induced.
        let g = build(&["a", "b"], &[("a", "b", "r"), ("b", "a", "s")]);
        let sub = egocentric_neighborhood(&g, "a", 1, TraversalDirection::Outgoing).unwrap();
        assert_eq!(sub.edge_count(), 2);
    }

    #[test]
    fn test_neighborhood_cycle_edges_not_duplicated() {
        let g = make_cycle(5);
        let sub = egocentric_neighborhood(&g, "n0", 10, TraversalDirection::Both).unwrap();
        assert_eq!(sub.node_count(), 5);
        assert_eq!(sub.edge_count(), 5);
    }

    #[test]
    fn test_neighborhood_unknown_node() {
        let g = make_chain(3);
        let err = neighborhood(&g, "missing").unwrap_err();
        assert_eq!(err, GraphError::UnknownNode("missing".into()));
    }

    #[test]
    fn test_neighborhood_radius_zero() {
        let g = make_chain(3);
        let sub = egocentric_neighborhood(&g, "n1", 0, TraversalDirection::Both).unwrap();
        assert_eq!(ids(&sub), vec!["n1"]);
    }

    #[test]
    fn test_neighborhood_self_loop_induced() {
        let g = build(&["a", "b"], &[("a", "a", "self"), ("a", "b", "r")]);
        let sub = egocentric_neighborhood(&g, "a", 0, TraversalDirection::Both).unwrap();
        assert_eq!(sub.node_count(), 1);
        assert_eq!(sub.edge_count(), 1);
    }

    // --- Shortest-path union tests ---

    #[test]
    fn test_path_union_example() {
        let g = build(
            &["A", "B", "C"],
            &[("A", "B", "interacts"), ("B", "C", "causes")],
        );
        let sub = shortest_path_union(&g, "A", "C", TraversalDirection::Outgoing).unwrap();
        assert_eq!(ids(&sub), vec!["A", "B", "C"]);
        assert_eq!(sub.edge_indices(), &[0, 1]);
    }

    #[test]
    fn test_path_union_diamond_keeps_all_ties() {
        // s -> a -> t and s -> b -> t are both shortest; s -> c -> d -> t is not.
        let g = build(
            &["s", "a", "b", "c", "d", "t"],
            &[
                ("s", "a", "r"),
                ("a", "t", "r"),
                ("s", "b", "r"),
                ("b", "t", "r"),
                ("s", "c", "r"),
                ("c", "d", "r"),
                ("d", "t", "r"),
            ],
        );
        let sub = shortest_path_union(&g, "s", "t", TraversalDirection::Outgoing).unwrap();
        assert_eq!(ids(&sub), vec!["s", "a", "b", "t"]);
        assert_eq!(sub.edge_indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_path_union_parallel_edges_included() {
        let g = build(&["a", "b"], &[("a", "b", "x"), ("a", "b", "y"), ("b", "a", "z")]);
        let sub = shortest_path_union(&g, "a", "b", TraversalDirection::Outgoing).unwrap();
        assert_eq!(sub.edge_indices(), &[0, 1]);
    }

    #[test]
    fn test_path_union_disconnected_is_empty() {
        let g = build(&["a", "b", "c"], &[("a", "b", "r")]);
        let sub = shortest_path_union(&g, "a", "c", TraversalDirection::Both).unwrap();
        assert_eq!(sub.node_count(), 0);
        assert_eq!(sub.edge_count(), 0);
    }

    #[test]
    fn test_path_union_same_node() {
        let g = make_chain(3);
        let sub = shortest_path_union(&g, "n1", "n1", TraversalDirection::Outgoing).unwrap();
        assert_eq!(ids(&sub), vec!["n1"]);
        assert_eq!(sub.edge_count(), 0);
    }

    #[test]
    fn test_path_union_directed_vs_undirected() {
        // a -> b <- c: no directed path from a to c, one undirected.
        let g = build(&["a", "b", "c"], &[("a", "b", "r"), ("c", "b", "r")]);
        let directed = shortest_path_union(&g, "a", "c", TraversalDirection::Outgoing).unwrap();
        assert_eq!(directed.node_count(), 0);

        let undirected = shortest_path_union(&g, "a", "c", TraversalDirection::Both).unwrap();
        assert_eq!(ids(&undirected), vec!["a", "b", "c"]);
        assert_eq!(undirected.edge_count(), 2);
    }

    #[test]
    fn test_path_union_reverse_direction() {
        let g = make_chain(4);
        let sub = shortest_path_union(&g, "n3", "n0", TraversalDirection::Incoming).unwrap();
        assert_eq!(sub.node_count(), 4);
        assert_eq!(sub.edge_count(), 3);
        let none = shortest_path_union(&g, "n3", "n0", TraversalDirection::Outgoing).unwrap();
        assert_eq!(none.edge_count(), 0);
    }

    #[test]
    fn test_path_union_cycle_picks_short_side() {
        let g = make_cycle(6);
        let sub = shortest_path_union(&g, "n0", "n2", TraversalDirection::Both).unwrap();
        assert_eq!(ids(&sub), vec!["n0", "n1", "n2"]);
        // Opposite node: both sides of the ring tie.
        let sub = shortest_path_union(&g, "n0", "n3", TraversalDirection::Both).unwrap();
        assert_eq!(sub.node_count(), 6);
        assert_eq!(sub.edge_count(), 6);
    }

    #[test]
    fn test_path_union_ignores_self_loops() {
        let g = build(&["a", "b"], &[("a", "a", "self"), ("a", "b", "r")]);
        let sub = shortest_path_union(&g, "a", "b", TraversalDirection::Both).unwrap();
        assert_eq!(sub.edge_indices(), &[1]);
    }

    #[test]
    fn test_path_union_unknown_endpoint() {
        let g = make_chain(3);
        assert!(matches!(
            shortest_path_union(&g, "n0", "zz", TraversalDirection::Both),
            Err(GraphError::UnknownNode(id)) if id == "zz"
        ));
    }
}
