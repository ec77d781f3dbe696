use std::path::PathBuf;

use anyhow::{Context, Result};
use netreach_core::{
    build_reachability_geojson, reachable_from_index, CoverageLayers, CoverageMetrics, GraphIndex,
    ReachOutcome, ReachabilityOptions,
};
use tracing::info;

use crate::settings::Settings;
use crate::state::NetworkState;
use crate::util::{format_cost, format_path};

/// Run the reachability query described by the settings.
fn run_query<'g>(state: &'g NetworkState, settings: &Settings) -> Result<ReachOutcome<'g>> {
    let key = settings.origin()?;
    let options = ReachabilityOptions::new(state.origin_node_id(key), settings.threshold);

    let index = GraphIndex::build(&state.graph);
    let outcome = reachable_from_index(&index, &options, None)
        .with_context(|| format!("computing coverage from '{}'", key))?;

    info!(
        origin = %options.origin_id,
        threshold = options.max_cost,
        reachable = outcome.nodes.len(),
        total = index.node_count(),
        "coverage computed"
    );
    Ok(outcome)
}

pub fn cmd_reach(state: &NetworkState, settings: &Settings, json: bool) -> Result<()> {
    let outcome = run_query(state, settings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.nodes)?);
        return Ok(());
    }

    println!("{:>5} {:<16} {:<24} {:>10}  path", "#", "node", "name", "cost");
    println!("{:->5} {:-<16} {:-<24} {:->10}  {:-<4}", "", "", "", "", "");
    for (i, r) in outcome.nodes.iter().enumerate() {
        println!(
            "{:>5} {:<16} {:<24} {:>10}  {}",
            i,
            r.node.id,
            r.node.display_name(),
            format_cost(r.cost),
            format_path(&r.path)
        );
    }
    println!();
    println!(
        "{} reachable within {} of {}",
        outcome.nodes.len(),
        format_cost(settings.threshold),
        settings.origin()?
    );
    Ok(())
}

pub fn cmd_export(
    state: &NetworkState,
    settings: &Settings,
    output: Option<PathBuf>,
) -> Result<()> {
    let outcome = run_query(state, settings)?;
    let path = output.unwrap_or_else(|| settings.export_path.clone());

    let document = build_reachability_geojson(&outcome.nodes);
    let text = serde_json::to_string_pretty(&document)?;
    std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;

    info!(path = %path.display(), features = document.len(), "coverage exported");
    println!("Wrote {} features to {}", document.len(), path.display());
    Ok(())
}

pub fn cmd_layers(state: &NetworkState, settings: &Settings, compact: bool) -> Result<()> {
    let outcome = run_query(state, settings)?;
    let origin = state.origin_node(settings.origin()?);
    let layers = CoverageLayers::project(&state.graph, &outcome.nodes, origin);

    let text = if compact {
        serde_json::to_string(&layers)?
    } else {
        serde_json::to_string_pretty(&layers)?
    };
    println!("{}", text);
    Ok(())
}

pub fn cmd_metrics(state: &NetworkState, settings: &Settings, json: bool) -> Result<()> {
    let outcome = run_query(state, settings)?;
    let metrics = CoverageMetrics::new(
        outcome.nodes.len(),
        state.graph.node_count(),
        settings.threshold,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    println!("Coverage snapshot");
    println!("  Reachable nodes  {}", metrics.reachable_count);
    println!("  Total nodes      {}", metrics.total_nodes);
    println!("  Coverage         {}%", metrics.coverage_percent);
    println!("  Threshold        {}", format_cost(metrics.threshold));
    Ok(())
}
