use serde::{Deserialize, Serialize};

use crate::error::Result;

/// `[longitude, latitude]` in decimal degrees.
pub type Coordinates = [f64; 2];

/// Opaque per-record metadata carried through from the source document.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A geographic network node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl NetworkNode {
    pub fn new(id: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            id: id.into(),
            name: None,
            coordinates,
            metadata: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name shown to users; falls back to the node id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// An undirected, weighted connection between two nodes.
///
/// `from`/`to` only record how the edge was written in the source document;
/// traversal uses the same weight in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl NetworkEdge {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            weight,
            metadata: None,
        }
    }

    /// Weights must be finite and non-negative for the search to be sound.
    pub fn has_valid_weight(&self) -> bool {
        self.weight.is_finite() && self.weight >= 0.0
    }
}

/// A network as loaded from its source document.
///
/// Node order carries no meaning but is preserved so that index construction
/// and traversal are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkGraph {
    #[serde(default)]
    pub nodes: Vec<NetworkNode>,
    #[serde(default)]
    pub edges: Vec<NetworkEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl NetworkGraph {
    pub fn new(nodes: Vec<NetworkNode>, edges: Vec<NetworkEdge>) -> Self {
        Self {
            nodes,
            edges,
            metadata: None,
        }
    }

    /// Parse a graph document (`{ "nodes": [...], "edges": [...] }`).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Node with the given id. With duplicate ids the last definition wins,
    /// matching [`GraphIndex`](crate::GraphIndex).
    pub fn node(&self, id: &str) -> Option<&NetworkNode> {
        self.nodes.iter().rev().find(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// A named starting point offered to users, mapped onto a graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginLocation {
    pub id: String,
    pub name: String,
    pub node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OriginLocation {
    /// Parse an origin list document (`[{ "id", "name", "nodeId" }, ...]`).
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Resolve an origin key to a graph node id: a key naming a node in the
/// graph is taken as is, otherwise it is looked up in the origin list.
///
/// Returns None when neither matches; the solver reports that case as
/// not-found.
pub fn resolve_origin<'a>(
    graph: &'a NetworkGraph,
    origins: &'a [OriginLocation],
    key: &'a str,
) -> Option<&'a str> {
    graph.node(key).map(|n| n.id.as_str()).or_else(|| {
        origins
            .iter()
            .find(|o| o.id == key)
            .map(|o| o.node_id.as_str())
    })
}
