//! Error types for graph mutations.
//!
//! Only genuinely invalid input is an error. Empty query results are normal:
//! "no other waypoint exists" is `Ok(None)`, and connecting an
//! already-linked pair is an `Ok(false)` no-op.

use thiserror::Error;

use crate::graph::WaypointId;

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors surfaced at the host boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// An operation referenced a waypoint that is not registered in the graph.
    #[error("unknown waypoint: {id}")]
    UnknownWaypoint { id: WaypointId },
}
