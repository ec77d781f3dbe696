//! netreach-core: cost-bounded reachability over geographic network graphs.
//!
//! A pure Rust library that indexes a weighted undirected graph of
//! geographic nodes, finds every node reachable from an origin within a
//! cost budget, and projects the result into GeoJSON feature collections
//! and a bounding envelope for map rendering.
//!
//! No I/O happens here. Hosts (the `netreach` CLI, the benchmark binary)
//! load documents and hand a [`NetworkGraph`] to the engine per query.

mod coverage;
mod error;
mod geometry;
mod graph;
mod index;
mod reach;

pub use coverage::{CoverageLayers, CoverageMetrics};
pub use error::{ReachError, Result};
pub use geometry::{
    build_reachability_geojson, build_reachable_edges, compute_bounds, origin_feature, Bounds,
    Feature, FeatureCollection, Geometry,
};
pub use graph::{
    resolve_origin, Coordinates, Metadata, NetworkEdge, NetworkGraph, NetworkNode, OriginLocation,
};
pub use index::{GraphIndex, Neighbor};
pub use reach::{
    compute_reachable_nodes, reachable_from_index, ReachOutcome, ReachStats, ReachabilityOptions,
    ReachableNode,
};
