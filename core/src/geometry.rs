//! GeoJSON projection of reachability results.
//!
//! Everything here is a pure transformation. Empty input gives an empty
//! collection (or `None` for bounds), never an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::graph::{Coordinates, Metadata, NetworkGraph, NetworkNode};
use crate::reach::ReachableNode;

/// GeoJSON geometry subset used by the coverage layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Coordinates },
    LineString { coordinates: Vec<Coordinates> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: Metadata,
}

impl Feature {
    pub fn point(coordinates: Coordinates, properties: Metadata) -> Self {
        Self {
            geometry: Geometry::Point { coordinates },
            properties,
        }
    }

    pub fn line(from: Coordinates, to: Coordinates, properties: Metadata) -> Self {
        Self {
            geometry: Geometry::LineString {
                coordinates: vec![from, to],
            },
            properties,
        }
    }

    /// Property lookup, mostly for consumers matching features back to nodes.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Axis-aligned envelope; serializes as `[[min_lon, min_lat], [max_lon, max_lat]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[Coordinates; 2]")]
pub struct Bounds {
    pub min: Coordinates,
    pub max: Coordinates,
}

impl Bounds {
    pub fn contains(&self, point: Coordinates) -> bool {
        (self.min[0]..=self.max[0]).contains(&point[0])
            && (self.min[1]..=self.max[1]).contains(&point[1])
    }
}

impl From<Bounds> for [Coordinates; 2] {
    fn from(bounds: Bounds) -> Self {
        [bounds.min, bounds.max]
    }
}

fn properties(value: serde_json::Value) -> Metadata {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Metadata::new(),
    }
}

/// One point per reachable node with `id`, `name` and `cost` properties.
///
/// This is also the exported coverage document.
pub fn build_reachability_geojson(reachable: &[ReachableNode<'_>]) -> FeatureCollection {
    FeatureCollection::new(
        reachable
            .iter()
            .map(|r| {
                Feature::point(
                    r.node.coordinates,
                    properties(json!({
                        "id": r.node.id,
                        "name": r.node.display_name(),
                        "cost": r.cost,
                    })),
                )
            })
            .collect(),
    )
}

/// Line features for the graph edges whose endpoints are both reachable,
/// with `id` and `weight` properties.
///
/// Endpoint coordinates come from the reachable records, so an edge is
/// included exactly when both endpoints resolve; anything else is dropped
/// rather than drawn to a placeholder coordinate. Edges with an invalid
/// weight are skipped, as the index never traverses them.
pub fn build_reachable_edges(
    graph: &NetworkGraph,
    reachable: &[ReachableNode<'_>],
) -> FeatureCollection {
    let positions: HashMap<&str, Coordinates> = reachable
        .iter()
        .map(|r| (r.node.id.as_str(), r.node.coordinates))
        .collect();

    let features: Vec<Feature> = graph
        .edges
        .iter()
        .filter(|edge| edge.has_valid_weight())
        .filter_map(|edge| {
            let from = positions.get(edge.from.as_str())?;
            let to = positions.get(edge.to.as_str())?;
            Some(Feature::line(
                *from,
                *to,
                properties(json!({ "id": edge.id, "weight": edge.weight })),
            ))
        })
        .collect();

    debug!(edges = features.len(), reachable = reachable.len(), "projected reachable edges");
    FeatureCollection::new(features)
}

/// Minimum enclosing rectangle of the nodes' coordinates, or None when empty.
pub fn compute_bounds<'a, I>(nodes: I) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a NetworkNode>,
{
    nodes.into_iter().fold(None, |acc: Option<Bounds>, node| {
        let [lon, lat] = node.coordinates;
        Some(match acc {
            None => Bounds {
                min: [lon, lat],
                max: [lon, lat],
            },
            Some(b) => Bounds {
                min: [b.min[0].min(lon), b.min[1].min(lat)],
                max: [b.max[0].max(lon), b.max[1].max(lat)],
            },
        })
    })
}

/// Single-point collection marking the origin; empty when there is none.
pub fn origin_feature(origin: Option<&NetworkNode>) -> FeatureCollection {
    FeatureCollection::new(
        origin
            .map(|node| {
                Feature::point(
                    node.coordinates,
                    properties(json!({ "id": node.id, "name": node.display_name() })),
                )
            })
            .into_iter()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NetworkEdge;
    use crate::reach::{compute_reachable_nodes, ReachabilityOptions};

    fn make_line() -> NetworkGraph {
        NetworkGraph::new(
            vec![
                NetworkNode::new("A", [0.0, 0.0]).with_name("Alpha"),
                NetworkNode::new("B", [1.0, 0.0]),
                NetworkNode::new("C", [2.0, 0.0]),
            ],
            vec![
                NetworkEdge::new("A-B", "A", "B", 2.0),
                NetworkEdge::new("B-C", "B", "C", 2.0),
            ],
        )
    }

    #[test]
    fn test_point_features() {
        let g = make_line();
        let reachable = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 3.0)).unwrap();
        let fc = build_reachability_geojson(&reachable);
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[0].geometry, Geometry::Point { coordinates: [0.0, 0.0] });
        assert_eq!(fc.features[0].property("name").unwrap(), "Alpha");
        assert_eq!(fc.features[1].property("name").unwrap(), "B");
        assert_eq!(fc.features[1].property("cost").unwrap(), 2.0);
    }

    #[test]
    fn test_geojson_document_shape() {
        let g = make_line();
        let reachable = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 0.0)).unwrap();
        let value = serde_json::to_value(build_reachability_geojson(&reachable)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
                    "properties": { "id": "A", "name": "Alpha", "cost": 0.0 }
                }]
            })
        );
    }

    #[test]
    fn test_edges_require_both_endpoints() {
        let g = make_line();
        let reachable = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 3.0)).unwrap();
        let fc = build_reachable_edges(&g, &reachable);
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].property("id").unwrap(), "A-B");
        assert_eq!(
            fc.features[0].geometry,
            Geometry::LineString {
                coordinates: vec![[0.0, 0.0], [1.0, 0.0]]
            }
        );
    }

    #[test]
    fn test_all_edges_when_all_reachable() {
        let g = make_line();
        let reachable = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 10.0)).unwrap();
        let fc = build_reachable_edges(&g, &reachable);
        let ids: Vec<_> = fc.features.iter().map(|f| f.property("id").unwrap().clone()).collect();
        assert_eq!(ids, vec![json!("A-B"), json!("B-C")]);
        assert_eq!(fc.features[1].property("weight").unwrap(), 2.0);
    }

    #[test]
    fn test_edges_with_invalid_weight_not_drawn() {
        let g = NetworkGraph::new(
            vec![NetworkNode::new("A", [0.0, 0.0]), NetworkNode::new("B", [1.0, 0.0])],
            vec![
                NetworkEdge::new("ok", "A", "B", 1.0),
                NetworkEdge::new("neg", "A", "B", -5.0),
                NetworkEdge::new("nan", "B", "A", f64::NAN),
            ],
        );
        let reachable = compute_reachable_nodes(&g, &ReachabilityOptions::new("A", 10.0)).unwrap();
        let fc = build_reachable_edges(&g, &reachable);
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].property("id").unwrap(), "ok");
    }

    #[test]
    fn test_edges_for_empty_set() {
        let g = make_line();
        assert!(build_reachable_edges(&g, &[]).is_empty());
        assert!(build_reachability_geojson(&[]).is_empty());
    }

    #[test]
    fn test_bounds() {
        let nodes = vec![
            NetworkNode::new("a", [-122.5, 37.7]),
            NetworkNode::new("b", [-122.3, 37.9]),
            NetworkNode::new("c", [-122.4, 37.6]),
        ];
        let b = compute_bounds(&nodes).unwrap();
        assert_eq!(b.min, [-122.5, 37.6]);
        assert_eq!(b.max, [-122.3, 37.9]);
        assert!(nodes.iter().all(|n| b.contains(n.coordinates)));
        assert_eq!(
            serde_json::to_value(b).unwrap(),
            json!([[-122.5, 37.6], [-122.3, 37.9]])
        );
    }

    #[test]
    fn test_bounds_single_and_empty() {
        let single = [NetworkNode::new("a", [3.0, 4.0])];
        let b = compute_bounds(&single).unwrap();
        assert_eq!(b.min, b.max);
        assert!(compute_bounds(&[] as &[NetworkNode]).is_none());
    }

    #[test]
    fn test_origin_feature() {
        let node = NetworkNode::new("O", [1.0, 2.0]);
        let fc = origin_feature(Some(&node));
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].property("name").unwrap(), "O");
        assert!(fc.features[0].property("cost").is_none());
        assert!(origin_feature(None).is_empty());
    }

    #[test]
    fn test_parse_feature_collection() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]},"properties":{}}
        ]}"#;
        let fc: FeatureCollection = serde_json::from_str(text).unwrap();
        assert_eq!(fc.len(), 1);
        assert_eq!(
            fc.features[0].geometry,
            Geometry::LineString {
                coordinates: vec![[0.0, 0.0], [1.0, 1.0]]
            }
        );
    }
}
