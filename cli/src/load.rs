use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use netreach_core::{NetworkGraph, OriginLocation};
use tracing::info;

use crate::settings::Settings;
use crate::state::NetworkState;

/// Load the graph (and origin list, when configured) named by the settings.
pub fn load_network(settings: &Settings) -> Result<NetworkState> {
    let start = Instant::now();

    let source = settings.graph_path()?;
    let graph = read_graph(source)?;
    let origins = match settings.origins.as_deref() {
        Some(path) => read_origins(path)?,
        None => Vec::new(),
    };

    let load_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        source = %source.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        origins = origins.len(),
        load_time_ms,
        "network loaded"
    );

    Ok(NetworkState {
        graph,
        origins,
        source: source.to_path_buf(),
        load_time_ms,
    })
}

fn read_graph(path: &Path) -> Result<NetworkGraph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading graph document {}", path.display()))?;
    NetworkGraph::from_json(&text)
        .with_context(|| format!("parsing graph document {}", path.display()))
}

fn read_origins(path: &Path) -> Result<Vec<OriginLocation>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading origin list {}", path.display()))?;
    OriginLocation::list_from_json(&text)
        .with_context(|| format!("parsing origin list {}", path.display()))
}
