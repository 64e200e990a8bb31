//! Waypoint Graph - WASM Module
//!
//! This module provides the waypoint connectivity graph and gizmo geometry
//! for scene-authoring tools. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen. The host editor owns node
//! discovery, rendering, selection UI, and undo history; this crate owns
//! graph state and geometry math.
//!
//! # Architecture
//!
//! - `graph`: Undirected waypoint graph using petgraph's StableGraph
//! - `spatial`: R-tree spatial indexing for O(log n) scene picking
//! - `gizmo`: Line-segment geometry for scene-view wireframes
//! - `error`: Boundary error types

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod gizmo;
pub mod graph;
pub mod spatial;

pub use error::{GraphError, GraphResult};

use gizmo::LightCone;
use graph::{GraphSnapshot, WaypointGraph, WaypointId};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Main entry point for the waypoint graph.
///
/// This struct wraps the internal WaypointGraph and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct WaypointGraphWasm {
    graph: WaypointGraph,
}

#[wasm_bindgen]
impl WaypointGraphWasm {
    /// Create a new empty waypoint graph.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            graph: WaypointGraph::new(),
        }
    }

    /// Create a waypoint graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `waypoint_capacity` - Expected number of waypoints
    /// * `link_capacity` - Expected number of links
    #[wasm_bindgen(js_name = withCapacity)]
    pub fn with_capacity(waypoint_capacity: usize, link_capacity: usize) -> Self {
        Self {
            graph: WaypointGraph::with_capacity(waypoint_capacity, link_capacity),
        }
    }

    // =========================================================================
    // Waypoint Operations
    // =========================================================================

    /// Add a waypoint at the specified scene position.
    ///
    /// Returns the stable waypoint ID.
    #[wasm_bindgen(js_name = addWaypoint)]
    pub fn add_waypoint(&mut self, x: f32, y: f32, z: f32) -> u32 {
        self.graph.add_waypoint(x, y, z).0
    }

    /// Add multiple waypoints from a Float32Array of positions.
    ///
    /// The positions array should be [x0, y0, z0, x1, ...]. This is the bulk
    /// registration path used after the host enumerates the scene.
    /// Returns the number of waypoints added.
    #[wasm_bindgen(js_name = addWaypointsFromPositions)]
    pub fn add_waypoints_from_positions(&mut self, positions: &[f32]) -> u32 {
        self.graph.add_waypoints_from_positions(positions)
    }

    /// Remove a waypoint by ID, dropping all its links.
    ///
    /// Returns true if the waypoint existed and was removed.
    #[wasm_bindgen(js_name = removeWaypoint)]
    pub fn remove_waypoint(&mut self, waypoint_id: u32) -> bool {
        self.graph.remove_waypoint(WaypointId(waypoint_id))
    }

    /// Get the number of waypoints in the graph.
    #[wasm_bindgen(js_name = waypointCount)]
    pub fn waypoint_count(&self) -> u32 {
        self.graph.waypoint_count()
    }

    /// Get the upper bound on waypoint indices (max index + 1).
    /// May be larger than waypointCount if waypoints have been removed.
    #[wasm_bindgen(js_name = nodeBound)]
    pub fn node_bound(&self) -> u32 {
        self.graph.node_bound()
    }

    /// Get a waypoint's X position.
    #[wasm_bindgen(js_name = getWaypointX)]
    pub fn get_waypoint_x(&self, waypoint_id: u32) -> Option<f32> {
        self.graph.position(WaypointId(waypoint_id)).map(|(x, _, _)| x)
    }

    /// Get a waypoint's Y position.
    #[wasm_bindgen(js_name = getWaypointY)]
    pub fn get_waypoint_y(&self, waypoint_id: u32) -> Option<f32> {
        self.graph.position(WaypointId(waypoint_id)).map(|(_, y, _)| y)
    }

    /// Get a waypoint's Z position.
    #[wasm_bindgen(js_name = getWaypointZ)]
    pub fn get_waypoint_z(&self, waypoint_id: u32) -> Option<f32> {
        self.graph.position(WaypointId(waypoint_id)).map(|(_, _, z)| z)
    }

    /// Set a waypoint's scene position.
    #[wasm_bindgen(js_name = setWaypointPosition)]
    pub fn set_waypoint_position(&mut self, waypoint_id: u32, x: f32, y: f32, z: f32) {
        self.graph.set_position(WaypointId(waypoint_id), x, y, z);
    }

    /// Mark a waypoint selected in the editor.
    #[wasm_bindgen(js_name = setSelected)]
    pub fn set_selected(&mut self, waypoint_id: u32, selected: bool) {
        self.graph.set_selected(WaypointId(waypoint_id), selected);
    }

    /// Check if a waypoint is selected.
    #[wasm_bindgen(js_name = isSelected)]
    pub fn is_selected(&self, waypoint_id: u32) -> bool {
        self.graph.is_selected(WaypointId(waypoint_id))
    }

    /// Mark a waypoint hovered.
    #[wasm_bindgen(js_name = setHovered)]
    pub fn set_hovered(&mut self, waypoint_id: u32, hovered: bool) {
        self.graph.set_hovered(WaypointId(waypoint_id), hovered);
    }

    /// Check if a waypoint is hovered.
    #[wasm_bindgen(js_name = isHovered)]
    pub fn is_hovered(&self, waypoint_id: u32) -> bool {
        self.graph.is_hovered(WaypointId(waypoint_id))
    }

    /// Hide a waypoint from the scene view.
    #[wasm_bindgen(js_name = setHidden)]
    pub fn set_hidden(&mut self, waypoint_id: u32, hidden: bool) {
        self.graph.set_hidden(WaypointId(waypoint_id), hidden);
    }

    /// Check if a waypoint is hidden.
    #[wasm_bindgen(js_name = isHidden)]
    pub fn is_hidden(&self, waypoint_id: u32) -> bool {
        self.graph.is_hidden(WaypointId(waypoint_id))
    }

    // =========================================================================
    // Link Operations
    // =========================================================================

    /// Connect two waypoints with an undirected link.
    ///
    /// Idempotent: returns true if a link was created, false if the pair
    /// was already connected or the ids are equal. Throws on unknown ids.
    pub fn connect(&mut self, a: u32, b: u32) -> Result<bool, JsError> {
        Ok(self.graph.connect(WaypointId(a), WaypointId(b))?)
    }

    /// Remove the link between two waypoints.
    ///
    /// Returns true if a link existed. Throws on unknown ids.
    pub fn disconnect(&mut self, a: u32, b: u32) -> Result<bool, JsError> {
        Ok(self.graph.disconnect(WaypointId(a), WaypointId(b))?)
    }

    /// Check whether two waypoints are directly linked.
    #[wasm_bindgen(js_name = isConnected)]
    pub fn is_connected(&self, a: u32, b: u32) -> bool {
        self.graph.is_connected(WaypointId(a), WaypointId(b))
    }

    /// Get the number of links in the graph.
    #[wasm_bindgen(js_name = linkCount)]
    pub fn link_count(&self) -> u32 {
        self.graph.link_count()
    }

    /// Get neighbors of a waypoint.
    ///
    /// Returns a Uint32Array of neighbor waypoint IDs.
    #[wasm_bindgen(js_name = getNeighbors)]
    pub fn get_neighbors(&self, waypoint_id: u32) -> Vec<u32> {
        self.graph.neighbors(WaypointId(waypoint_id))
    }

    /// Find the nearest other waypoint to `source` by straight-line distance.
    ///
    /// Returns undefined when no other waypoint exists. Throws if `source`
    /// is not in the graph.
    #[wasm_bindgen(js_name = findNearest)]
    pub fn find_nearest(&self, source: u32) -> Result<Option<u32>, JsError> {
        Ok(self.graph.find_nearest(WaypointId(source))?.map(|id| id.0))
    }

    /// Find the nearest other waypoint and link to it.
    ///
    /// The inspector's one-click operation. Returns the peer's id, or
    /// undefined when `source` is the only waypoint.
    #[wasm_bindgen(js_name = connectNearest)]
    pub fn connect_nearest(&mut self, source: u32) -> Result<Option<u32>, JsError> {
        let peer = self.graph.connect_nearest(WaypointId(source))?;
        if let Some(peer) = peer {
            web_sys::console::log_1(
                &format!("Connected waypoint {source} to {}", peer.raw()).into(),
            );
        }
        Ok(peer.map(|id| id.0))
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Get all waypoints reachable from `waypoint_id`, including itself.
    ///
    /// Returns a Uint32Array in BFS order; the host highlights the
    /// connected route network.
    #[wasm_bindgen(js_name = reachableFrom)]
    pub fn reachable_from(&self, waypoint_id: u32) -> Vec<u32> {
        self.graph.reachable_from(WaypointId(waypoint_id))
    }

    /// Count the connected components of the graph.
    #[wasm_bindgen(js_name = componentCount)]
    pub fn component_count(&self) -> u32 {
        self.graph.component_count()
    }

    // =========================================================================
    // Position Buffer Access (Zero-Copy)
    // =========================================================================

    /// Get a zero-copy view of X positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately for upload, do not store.
    #[wasm_bindgen(js_name = getPositionsXView)]
    pub fn get_positions_x_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.graph.positions_x()) }
    }

    /// Get a zero-copy view of Y positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately for upload, do not store.
    #[wasm_bindgen(js_name = getPositionsYView)]
    pub fn get_positions_y_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.graph.positions_y()) }
    }

    /// Get a zero-copy view of Z positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately for upload, do not store.
    #[wasm_bindgen(js_name = getPositionsZView)]
    pub fn get_positions_z_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.graph.positions_z()) }
    }

    /// Get a pointer to the X positions buffer.
    ///
    /// Used for creating views after WASM memory growth.
    #[wasm_bindgen(js_name = positionsXPtr)]
    pub fn positions_x_ptr(&self) -> *const f32 {
        self.graph.positions_x().as_ptr()
    }

    /// Get the length of the positions buffer.
    #[wasm_bindgen(js_name = positionsLen)]
    pub fn positions_len(&self) -> usize {
        self.graph.positions_x().len()
    }

    // =========================================================================
    // Gizmo Geometry
    // =========================================================================

    /// Get every link as a flat segment buffer for the connection-line pass.
    ///
    /// Returns [ax, ay, az, bx, by, bz, ...], six floats per link.
    #[wasm_bindgen(js_name = linkSegments)]
    pub fn link_segments(&self) -> Float32Array {
        Float32Array::from(&self.graph.link_segments()[..])
    }

    /// Get the links of a single waypoint as a flat segment buffer.
    ///
    /// Used for the selected-waypoint highlight pass.
    #[wasm_bindgen(js_name = linkSegmentsFor)]
    pub fn link_segments_for(&self, waypoint_id: u32) -> Float32Array {
        Float32Array::from(&self.graph.link_segments_for(WaypointId(waypoint_id))[..])
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the waypoint nearest to an arbitrary scene point (click picking).
    ///
    /// Returns the waypoint ID, or undefined if the graph is empty.
    #[wasm_bindgen(js_name = nearestToPoint)]
    pub fn nearest_to_point(&self, x: f32, y: f32, z: f32) -> Option<u32> {
        self.graph.nearest_to_point(x, y, z).map(|id| id.0)
    }

    /// Find the waypoint nearest to a scene point within a maximum distance.
    #[wasm_bindgen(js_name = nearestToPointWithin)]
    pub fn nearest_to_point_within(
        &self,
        x: f32,
        y: f32,
        z: f32,
        max_distance: f32,
    ) -> Option<u32> {
        self.graph
            .nearest_to_point_within(x, y, z, max_distance)
            .map(|id| id.0)
    }

    /// Find all waypoints inside an axis-aligned box (marquee selection).
    ///
    /// Returns a Uint32Array of waypoint IDs.
    #[wasm_bindgen(js_name = waypointsInBox)]
    pub fn waypoints_in_box(
        &self,
        min_x: f32,
        min_y: f32,
        min_z: f32,
        max_x: f32,
        max_y: f32,
        max_z: f32,
    ) -> Vec<u32> {
        self.graph
            .waypoints_in_box(min_x, min_y, min_z, max_x, max_y, max_z)
    }

    /// Find all waypoints within a radius of a scene point.
    #[wasm_bindgen(js_name = waypointsInRadius)]
    pub fn waypoints_in_radius(&self, x: f32, y: f32, z: f32, radius: f32) -> Vec<u32> {
        self.graph.waypoints_in_radius(x, y, z, radius)
    }

    /// Check whether positions changed since the last spatial rebuild.
    #[wasm_bindgen(js_name = spatialNeedsRebuild)]
    pub fn spatial_needs_rebuild(&self) -> bool {
        self.graph.spatial_needs_rebuild()
    }

    /// Rebuild the spatial index after position changes.
    ///
    /// Call this after bulk position updates for accurate picking.
    #[wasm_bindgen(js_name = rebuildSpatialIndex)]
    pub fn rebuild_spatial_index(&mut self) {
        self.graph.rebuild_spatial_index();
    }

    // =========================================================================
    // Snapshot / Restore
    // =========================================================================

    /// Capture the full graph state for the host's edit history.
    ///
    /// Returns a plain object { waypoints: [{id, x, y, z}], links: [{a, b}] }.
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.graph.snapshot())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Replace the graph state with a previously captured snapshot.
    pub fn restore(&mut self, snapshot: JsValue) -> Result<(), JsError> {
        let snapshot: GraphSnapshot =
            serde_wasm_bindgen::from_value(snapshot).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(self.graph.restore(&snapshot)?)
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Get the bounding box of all waypoints.
    ///
    /// Returns [min_x, min_y, min_z, max_x, max_y, max_z], or undefined if
    /// the graph is empty.
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f32>> {
        self.graph
            .bounds()
            .map(|(min_x, min_y, min_z, max_x, max_y, max_z)| {
                vec![min_x, min_y, min_z, max_x, max_y, max_z]
            })
    }

    /// Clear all waypoints and links.
    pub fn clear(&mut self) {
        self.graph.clear();
    }
}

impl Default for WaypointGraphWasm {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute a spotlight cone outline as a flat segment buffer.
///
/// Takes the host transform's position, forward, and up vectors, the full
/// opening angle in degrees, the range, and the rim-circle chord count.
/// Returns [ax, ay, az, bx, by, bz, ...]: four apex lines then the rim.
#[wasm_bindgen(js_name = lightConeOutline)]
#[allow(clippy::too_many_arguments)]
pub fn light_cone_outline(
    origin_x: f32,
    origin_y: f32,
    origin_z: f32,
    forward_x: f32,
    forward_y: f32,
    forward_z: f32,
    up_x: f32,
    up_y: f32,
    up_z: f32,
    angle_deg: f32,
    range: f32,
    circle_segments: u32,
) -> Float32Array {
    let cone = LightCone::new(
        [origin_x, origin_y, origin_z],
        [forward_x, forward_y, forward_z],
        [up_x, up_y, up_z],
        angle_deg,
        range,
    );
    Float32Array::from(&cone.outline(circle_segments as usize)[..])
}
