use serde::Serialize;

use crate::geometry::{
    build_reachability_geojson, build_reachable_edges, compute_bounds, origin_feature, Bounds,
    FeatureCollection,
};
use crate::graph::{NetworkGraph, NetworkNode};
use crate::reach::ReachableNode;

/// Everything a map surface needs for one coverage update: three
/// independent layers and the envelope to focus the view on.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageLayers {
    pub nodes: FeatureCollection,
    pub edges: FeatureCollection,
    pub origin: FeatureCollection,
    /// Envelope of the reachable nodes; None leaves the view where it is.
    pub bounds: Option<Bounds>,
}

impl CoverageLayers {
    pub fn project(
        graph: &NetworkGraph,
        reachable: &[ReachableNode<'_>],
        origin: Option<&NetworkNode>,
    ) -> Self {
        Self {
            nodes: build_reachability_geojson(reachable),
            edges: build_reachable_edges(graph, reachable),
            origin: origin_feature(origin),
            bounds: compute_bounds(reachable.iter().map(|r| r.node)),
        }
    }
}

/// Coverage snapshot shown alongside the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageMetrics {
    pub reachable_count: usize,
    pub total_nodes: usize,
    /// Whole percent, rounded; 0 for an empty graph.
    pub coverage_percent: u32,
    pub threshold: f64,
}

impl CoverageMetrics {
    pub fn new(reachable_count: usize, total_nodes: usize, threshold: f64) -> Self {
        let coverage_percent = if total_nodes > 0 {
            (reachable_count as f64 / total_nodes as f64 * 100.0).round() as u32
        } else {
            0
        };
        Self {
            reachable_count,
            total_nodes,
            coverage_percent,
            threshold,
        }
    }
}
