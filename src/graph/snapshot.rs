//! Serializable graph snapshots.
//!
//! The host editor owns undo/redo; the graph only exposes atomic mutations
//! plus a way to capture and restore its full state. Snapshots cross the
//! wasm boundary as plain data, so they use raw u32 ids and flat floats.

use serde::{Deserialize, Serialize};

/// One waypoint with its stable id and scene position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaypointRecord {
    /// Stable waypoint id.
    pub id: u32,
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

/// One undirected link between two waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// One endpoint's waypoint id.
    pub a: u32,
    /// The other endpoint's waypoint id.
    pub b: u32,
}

/// Complete graph state: all waypoints and all links.
///
/// Restoring a snapshot preserves waypoint ids and advances the id counter
/// past the highest restored id, so later additions never collide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// All waypoints in the graph.
    pub waypoints: Vec<WaypointRecord>,
    /// All undirected links, one record per edge.
    pub links: Vec<LinkRecord>,
}
