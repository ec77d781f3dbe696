use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::atomic::{self, AtomicBool};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ReachError, Result};
use crate::graph::{NetworkGraph, NetworkNode};
use crate::index::GraphIndex;

/// Query parameters: where to start and how much cost may be spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachabilityOptions {
    pub origin_id: String,
    /// Inclusive upper bound on accumulated edge weight.
    pub max_cost: f64,
}

impl ReachabilityOptions {
    pub fn new(origin_id: impl Into<String>, max_cost: f64) -> Self {
        Self {
            origin_id: origin_id.into(),
            max_cost,
        }
    }
}

/// A node within budget, with its minimum cost and the path achieving it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachableNode<'g> {
    pub node: &'g NetworkNode,
    pub cost: f64,
    /// Node ids from the origin to this node, both inclusive.
    pub path: Vec<&'g str>,
}

/// Counters collected while draining the frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReachStats {
    pub nodes_settled: usize,
    /// Frontier entries popped after their node was already settled.
    pub stale_entries_skipped: usize,
    pub frontier_peak: usize,
}

/// Result of a reachability search.
#[derive(Debug)]
pub struct ReachOutcome<'g> {
    /// Reachable nodes in the order they were settled; the origin is first.
    pub nodes: Vec<ReachableNode<'g>>,
    pub stats: ReachStats,
}

/// Frontier entry ordered for a min-heap on (cost, insertion sequence).
///
/// The sequence number makes equal-cost entries pop first-in first-out, the
/// same order a sorted-insert list that inserts after its equal-cost run
/// would produce.
struct FrontierEntry<'g> {
    cost: f64,
    seq: u64,
    node: &'g NetworkNode,
}

impl PartialEq for FrontierEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry<'_> {}

impl PartialOrd for FrontierEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Find every node whose minimum cost from `options.origin_id` is within
/// `options.max_cost`.
///
/// Builds a fresh [`GraphIndex`] for the call; nothing is cached between
/// queries. Fails with [`ReachError::NodeNotFound`] when the origin is not
/// in the graph.
pub fn compute_reachable_nodes<'g>(
    graph: &'g NetworkGraph,
    options: &ReachabilityOptions,
) -> Result<Vec<ReachableNode<'g>>> {
    let index = GraphIndex::build(graph);
    reachable_from_index(&index, options, None).map(|outcome| outcome.nodes)
}

/// Cost-bounded uniform-cost search over a prebuilt index.
///
/// `cancel` is polled between frontier extractions; once it reads true the
/// search stops with [`ReachError::Cancelled`].
///
/// Neighbors whose tentative cost exceeds the budget are never enqueued, so
/// the frontier only ever holds in-budget entries. A negative or NaN budget
/// yields an empty result.
pub fn reachable_from_index<'g>(
    index: &GraphIndex<'g>,
    options: &ReachabilityOptions,
    cancel: Option<&AtomicBool>,
) -> Result<ReachOutcome<'g>> {
    let origin = index
        .node(&options.origin_id)
        .ok_or_else(|| ReachError::NodeNotFound(options.origin_id.clone()))?;
    let max_cost = options.max_cost;

    let mut stats = ReachStats::default();
    let mut reachable: Vec<ReachableNode<'g>> = Vec::new();

    if max_cost.is_nan() || max_cost < 0.0 {
        debug!(origin = %origin.id, max_cost, "budget excludes the origin, nothing reachable");
        return Ok(ReachOutcome { nodes: reachable, stats });
    }

    // best-known cost and predecessor per node; the origin has no predecessor
    let mut costs: HashMap<&'g str, f64> = HashMap::new();
    let mut previous: HashMap<&'g str, &'g str> = HashMap::new();
    let mut visited: HashSet<&'g str> = HashSet::new();
    let mut frontier: BinaryHeap<FrontierEntry<'g>> = BinaryHeap::new();
    let mut seq: u64 = 0;

    costs.insert(origin.id.as_str(), 0.0);
    frontier.push(FrontierEntry { cost: 0.0, seq, node: origin });
    stats.frontier_peak = 1;

    while let Some(FrontierEntry { cost, node, .. }) = frontier.pop() {
        if cancel.is_some_and(|flag| flag.load(atomic::Ordering::Relaxed)) {
            debug!(origin = %origin.id, settled = reachable.len(), "reachability search cancelled");
            return Err(ReachError::Cancelled);
        }

        let id = node.id.as_str();
        if !visited.insert(id) {
            stats.stale_entries_skipped += 1;
            continue;
        }
        if cost > max_cost {
            continue;
        }

        let path = reconstruct_path(&previous, id);
        trace!(node = id, cost, hops = path.len() - 1, "settled");
        reachable.push(ReachableNode { node, cost, path });

        for neighbor in index.neighbors(id) {
            let candidate = cost + neighbor.weight;
            if candidate > max_cost {
                continue;
            }
            let target = neighbor.node.id.as_str();
            if costs.get(target).is_some_and(|&best| candidate >= best) {
                continue;
            }
            costs.insert(target, candidate);
            previous.insert(target, id);
            seq += 1;
            frontier.push(FrontierEntry {
                cost: candidate,
                seq,
                node: neighbor.node,
            });
        }
        stats.frontier_peak = stats.frontier_peak.max(frontier.len());
    }

    stats.nodes_settled = reachable.len();
    debug!(
        origin = %origin.id,
        max_cost,
        settled = stats.nodes_settled,
        stale = stats.stale_entries_skipped,
        frontier_peak = stats.frontier_peak,
        "reachability search complete"
    );

    Ok(ReachOutcome { nodes: reachable, stats })
}

/// Walk predecessor pointers from `node` back to the origin, then reverse.
fn reconstruct_path<'g>(previous: &HashMap<&'g str, &'g str>, node: &'g str) -> Vec<&'g str> {
    let mut path = vec![node];
    let mut current = node;
    while let Some(&parent) = previous.get(current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NetworkEdge;

    fn node(id: &str, x: f64, y: f64) -> NetworkNode {
        NetworkNode::new(id, [x, y])
    }

    fn edge(from: &str, to: &str, weight: f64) -> NetworkEdge {
        NetworkEdge::new(format!("{}-{}", from, to), from, to, weight)
    }

    /// A(0,0) - B(1,0) - C(2,0), both edges weight 2.
    fn make_line() -> NetworkGraph {
        NetworkGraph::new(
            vec![node("A", 0.0, 0.0), node("B", 1.0, 0.0), node("C", 2.0, 0.0)],
            vec![edge("A", "B", 2.0), edge("B", "C", 2.0)],
        )
    }

    fn summary(result: &[ReachableNode<'_>]) -> Vec<(String, f64)> {
        result
            .iter()
            .map(|r| (r.node.id.clone(), r.cost))
            .collect()
    }

    // --- Reference scenarios ---

    #[test]
    fn test_threshold_excludes_far_node() {
        let g = make_line();
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 3.0)).unwrap();
        assert_eq!(summary(&result), vec![("A".into(), 0.0), ("B".into(), 2.0)]);
    }

    #[test]
    fn test_zero_threshold_returns_origin_only() {
        let g = make_line();
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 0.0)).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].node.id, "A");
        assert_eq!(result[0].cost, 0.0);
        assert_eq!(result[0].path, vec!["A"]);
    }

    #[test]
    fn test_large_threshold_reaches_all() {
        let g = make_line();
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 10.0)).unwrap();
        assert_eq!(
            summary(&result),
            vec![("A".into(), 0.0), ("B".into(), 2.0), ("C".into(), 4.0)]
        );
        assert_eq!(result[2].path, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_origin_is_not_found() {
        let g = make_line();
        let err = compute_reachable_nodes(&g, &ReachabilityOptions::new("Z", 10.0)).unwrap_err();
        assert!(matches!(err, ReachError::NodeNotFound(ref id) if id == "Z"));
    }

    // --- Cost semantics ---

    #[test]
    fn test_threshold_is_inclusive() {
        let g = make_line();
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 4.0)).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_edges_traversed_in_reverse() {
        let g = make_line();
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("C", 10.0)).unwrap();
        assert_eq!(
            summary(&result),
            vec![("C".into(), 0.0), ("B".into(), 2.0), ("A".into(), 4.0)]
        );
    }

    #[test]
    fn test_cheaper_multi_hop_path_wins() {
        // O-A direct costs 5, O-B-A costs 2
        let g = NetworkGraph::new(
            vec![node("O", 0.0, 0.0), node("A", 1.0, 0.0), node("B", 0.5, 1.0)],
            vec![edge("O", "A", 5.0), edge("O", "B", 1.0), edge("B", "A", 1.0)],
        );
        let index = GraphIndex::build(&g);
        let outcome = reachable_from_index(&index, &ReachabilityOptions::new("O", 10.0), None).unwrap();
        let a = outcome.nodes.iter().find(|r| r.node.id == "A").unwrap();
        assert_eq!(a.cost, 2.0);
        assert_eq!(a.path, vec!["O", "B", "A"]);
        assert_eq!(outcome.stats.stale_entries_skipped, 1);
        assert_eq!(outcome.stats.nodes_settled, 3);
        assert_eq!(outcome.stats.frontier_peak, 2);
    }

    #[test]
    fn test_zero_weight_edges() {
        let g = NetworkGraph::new(
            vec![node("A", 0.0, 0.0), node("B", 0.0, 0.0), node("C", 1.0, 0.0)],
            vec![edge("A", "B", 0.0), edge("B", "C", 1.0)],
        );
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 0.0)).unwrap();
        assert_eq!(summary(&result), vec![("A".into(), 0.0), ("B".into(), 0.0)]);
        assert_eq!(result[1].path, vec!["A", "B"]);
    }

    #[test]
    fn test_negative_threshold_is_empty() {
        let g = make_line();
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", -1.0)).unwrap();
        assert!(result.is_empty());
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", f64::NAN)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_negative_threshold_still_checks_origin() {
        let g = make_line();
        let err = compute_reachable_nodes(&g, &ReachabilityOptions::new("Z", -1.0)).unwrap_err();
        assert!(matches!(err, ReachError::NodeNotFound(_)));
    }

    #[test]
    fn test_disconnected_component_unreached() {
        let g = NetworkGraph::new(
            vec![node("A", 0.0, 0.0), node("B", 1.0, 0.0), node("X", 9.0, 9.0), node("Y", 9.5, 9.0)],
            vec![edge("A", "B", 1.0), edge("X", "Y", 1.0)],
        );
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 100.0)).unwrap();
        let ids: Vec<&str> = result.iter().map(|r| r.node.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_isolated_origin() {
        let g = NetworkGraph::new(vec![node("solo", 3.0, 4.0)], vec![]);
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("solo", 5.0)).unwrap();
        assert_eq!(summary(&result), vec![("solo".into(), 0.0)]);
    }

    #[test]
    fn test_dangling_edges_ignored() {
        let g = NetworkGraph::new(
            vec![node("A", 0.0, 0.0), node("B", 1.0, 0.0)],
            vec![edge("A", "ghost", 0.5), edge("A", "B", 1.0)],
        );
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 5.0)).unwrap();
        assert_eq!(summary(&result), vec![("A".into(), 0.0), ("B".into(), 1.0)]);
    }

    // --- Ordering ---

    #[test]
    fn test_equal_costs_settle_in_discovery_order() {
        let g = NetworkGraph::new(
            vec![node("O", 0.0, 0.0), node("a", 1.0, 0.0), node("b", 2.0, 0.0), node("c", 3.0, 0.0)],
            vec![edge("O", "c", 1.0), edge("O", "a", 1.0), edge("b", "O", 1.0)],
        );
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("O", 1.0)).unwrap();
        let ids: Vec<&str> = result.iter().map(|r| r.node.id.as_str()).collect();
        assert_eq!(ids, vec!["O", "c", "a", "b"]);
    }

    #[test]
    fn test_settle_order_is_non_decreasing_cost() {
        let g = NetworkGraph::new(
            (0..6).map(|i| node(&format!("n{}", i), i as f64, 0.0)).collect(),
            vec![
                edge("n0", "n1", 4.0),
                edge("n0", "n2", 1.0),
                edge("n2", "n1", 1.0),
                edge("n1", "n3", 0.5),
                edge("n2", "n4", 7.0),
                edge("n3", "n4", 1.0),
                edge("n4", "n5", 2.0),
            ],
        );
        let result = compute_reachable_nodes(&g, &ReachabilityOptions::new("n0", 100.0)).unwrap();
        assert_eq!(result.len(), 6);
        assert!(result.windows(2).all(|w| w[0].cost <= w[1].cost));
        let n5 = result.iter().find(|r| r.node.id == "n5").unwrap();
        assert_eq!(n5.cost, 5.5);
        assert_eq!(n5.path, vec!["n0", "n2", "n1", "n3", "n4", "n5"]);
    }

    #[test]
    fn test_repeated_queries_identical() {
        let g = make_line();
        let opts = ReachabilityOptions::new("B", 2.0);
        let first = compute_reachable_nodes(&g, &opts).unwrap();
        let second = compute_reachable_nodes(&g, &opts).unwrap();
        assert_eq!(first, second);
    }

    // --- Cancellation ---

    #[test]
    fn test_cancelled_search() {
        let g = make_line();
        let index = GraphIndex::build(&g);
        let flag = AtomicBool::new(true);
        let err = reachable_from_index(&index, &ReachabilityOptions::new("A", 10.0), Some(&flag))
            .unwrap_err();
        assert!(matches!(err, ReachError::Cancelled));
    }

    #[test]
    fn test_unset_cancel_flag_completes() {
        let g = make_line();
        let index = GraphIndex::build(&g);
        let flag = AtomicBool::new(false);
        let outcome =
            reachable_from_index(&index, &ReachabilityOptions::new("A", 10.0), Some(&flag)).unwrap();
        assert_eq!(outcome.nodes.len(), 3);
    }

    #[test]
    fn test_options_use_camel_case_json() {
        let opts: ReachabilityOptions =
            serde_json::from_str(r#"{ "originId": "A", "maxCost": 3 }"#).unwrap();
        assert_eq!(opts, ReachabilityOptions::new("A", 3.0));
    }
}
