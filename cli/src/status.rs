use anyhow::Result;
use netreach_core::GraphIndex;

use crate::settings::Settings;
use crate::state::NetworkState;
use crate::util::format_cost;

pub fn cmd_status(state: &NetworkState, settings: &Settings) -> Result<()> {
    let index = GraphIndex::build(&state.graph);

    println!("source            {}", state.source.display());
    println!("load_time_ms      {:.1}", state.load_time_ms);
    println!("nodes             {}", state.graph.node_count());
    println!("edges             {}", state.graph.edge_count());
    println!("indexed_nodes     {}", index.node_count());
    println!("indexed_edges     {}", index.edge_count());
    println!("dropped_edges     {}", index.dropped_edges());
    println!("duplicate_nodes   {}", index.duplicate_nodes());
    println!("origins           {}", state.origins.len());
    println!(
        "selected_origin   {}",
        settings.selected_origin_id.as_deref().unwrap_or("(none)")
    );
    println!("threshold         {}", format_cost(settings.threshold));
    Ok(())
}

pub fn cmd_origins(state: &NetworkState) -> Result<()> {
    if state.origins.is_empty() {
        println!("No origin list loaded; pass graph node ids to --origin.");
        return Ok(());
    }

    println!("{:<16} {:<24} {:<16} {:<8} description", "id", "name", "node", "status");
    println!("{:-<16} {:-<24} {:-<16} {:-<8} {:-<11}", "", "", "", "", "");
    for origin in &state.origins {
        let status = if state.graph.node(&origin.node_id).is_some() {
            "ok"
        } else {
            "missing"
        };
        println!(
            "{:<16} {:<24} {:<16} {:<8} {}",
            origin.id,
            origin.name,
            origin.node_id,
            status,
            origin.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
