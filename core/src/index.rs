use std::collections::HashMap;

use tracing::{debug, warn};

use crate::graph::{NetworkGraph, NetworkNode};

/// One directed adjacency entry: the node on the other end and the edge cost.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'g> {
    pub node: &'g NetworkNode,
    pub weight: f64,
}

/// Lookup structure derived from a [`NetworkGraph`] for a single query.
///
/// Borrows the graph rather than copying it. Each undirected edge is stored
/// twice: `adjacency[from]` gets `to`, `adjacency[to]` gets `from`. Entries
/// keep edge document order, which makes traversal deterministic.
pub struct GraphIndex<'g> {
    nodes_by_id: HashMap<&'g str, &'g NetworkNode>,
    adjacency: HashMap<&'g str, Vec<Neighbor<'g>>>,
    edge_count: usize,
    dropped_edges: usize,
    duplicate_nodes: usize,
}

impl<'g> GraphIndex<'g> {
    /// Build the index. Never fails.
    ///
    /// Duplicate node ids resolve last-write-wins. Edges are dropped when an
    /// endpoint is missing or the weight is negative or not finite.
    pub fn build(graph: &'g NetworkGraph) -> Self {
        let mut nodes_by_id: HashMap<&'g str, &'g NetworkNode> =
            HashMap::with_capacity(graph.nodes.len());
        let mut duplicate_nodes = 0;

        for node in &graph.nodes {
            if nodes_by_id.insert(node.id.as_str(), node).is_some() {
                warn!(node_id = %node.id, "duplicate node id, keeping the later definition");
                duplicate_nodes += 1;
            }
        }

        let mut adjacency: HashMap<&'g str, Vec<Neighbor<'g>>> =
            HashMap::with_capacity(nodes_by_id.len());
        let mut edge_count = 0;
        let mut dropped_edges = 0;

        for edge in &graph.edges {
            let (from, to) = match (
                nodes_by_id.get(edge.from.as_str()),
                nodes_by_id.get(edge.to.as_str()),
            ) {
                (Some(&from), Some(&to)) if edge.has_valid_weight() => (from, to),
                _ => {
                    debug!(
                        edge_id = %edge.id,
                        from = %edge.from,
                        to = %edge.to,
                        "edge excluded from index"
                    );
                    dropped_edges += 1;
                    continue;
                }
            };

            adjacency
                .entry(from.id.as_str())
                .or_default()
                .push(Neighbor { node: to, weight: edge.weight });
            adjacency
                .entry(to.id.as_str())
                .or_default()
                .push(Neighbor { node: from, weight: edge.weight });
            edge_count += 1;
        }

        debug!(
            nodes = nodes_by_id.len(),
            edges = edge_count,
            dropped_edges,
            duplicate_nodes,
            "graph index built"
        );

        Self {
            nodes_by_id,
            adjacency,
            edge_count,
            dropped_edges,
            duplicate_nodes,
        }
    }

    pub fn node(&self, id: &str) -> Option<&'g NetworkNode> {
        self.nodes_by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes_by_id.contains_key(id)
    }

    /// Neighbors of `id` in edge order. Empty for isolated or unknown nodes.
    pub fn neighbors(&self, id: &str) -> &[Neighbor<'g>] {
        self.adjacency.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes_by_id.len()
    }

    /// Undirected edges that made it into the index.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn dropped_edges(&self) -> usize {
        self.dropped_edges
    }

    pub fn duplicate_nodes(&self) -> usize {
        self.duplicate_nodes
    }
}
