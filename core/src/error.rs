//! Error types for netreach-core.

use thiserror::Error;

/// Failures raised by the reachability engine.
///
/// Structural irregularities in the graph (dangling edges, missing names,
/// absent metadata) are never errors; they are normalized where they occur.
#[derive(Error, Debug)]
pub enum ReachError {
    /// The origin id is not present in the graph index.
    #[error("Origin node {0} not found in graph")]
    NodeNotFound(String),

    /// The search was stopped through its cancellation flag.
    #[error("Reachability search cancelled")]
    Cancelled,

    /// A graph or origin document could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, ReachError>;
