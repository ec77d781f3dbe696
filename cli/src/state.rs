use std::path::PathBuf;

use netreach_core::{resolve_origin, NetworkGraph, NetworkNode, OriginLocation};

/// A loaded network plus what is known about where it came from.
///
/// Read-only once built; every query builds its own index from `graph`.
#[derive(Debug)]
pub struct NetworkState {
    pub graph: NetworkGraph,
    pub origins: Vec<OriginLocation>,
    pub source: PathBuf,
    pub load_time_ms: f64,
}

impl NetworkState {
    /// Map an origin key onto a graph node id: the key itself when it names a
    /// node, otherwise the origin list. Unknown keys pass through unchanged so the solver reports
    /// them as not found.
    pub fn origin_node_id<'a>(&'a self, key: &'a str) -> &'a str {
        resolve_origin(&self.graph, &self.origins, key).unwrap_or(key)
    }

    pub fn origin_node(&self, key: &str) -> Option<&NetworkNode> {
        self.graph.node(self.origin_node_id(key))
    }
}
