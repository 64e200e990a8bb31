//! Waypoint graph data structures and operations.
//!
//! This module provides the core connectivity graph using petgraph's
//! StableGraph for stable waypoint indices, with Structure of Arrays (SoA)
//! layout for positions to keep host-facing draw buffers cheap to produce.

mod engine;
mod node;
mod snapshot;

pub use engine::WaypointGraph;
pub use node::{WaypointId, WaypointState};
pub use snapshot::{GraphSnapshot, LinkRecord, WaypointRecord};
