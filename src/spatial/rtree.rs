//! R-tree based spatial index using the rstar crate.
//!
//! Provides O(log n) scene-space queries for:
//! - Nearest waypoint to a point (click picking)
//! - Point-in-radius
//! - Box intersection (marquee selection)

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::graph::WaypointId;

/// A point in the spatial index with associated waypoint ID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointPoint {
    /// The waypoint identifier.
    pub id: WaypointId,
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl WaypointPoint {
    /// Create a new WaypointPoint.
    pub fn new(id: WaypointId, x: f32, y: f32, z: f32) -> Self {
        Self { id, x, y, z }
    }
}

impl RTreeObject for WaypointPoint {
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y, self.z])
    }
}

impl PointDistance for WaypointPoint {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        let dz = self.z - point[2];
        dx * dx + dy * dy + dz * dz
    }

    fn contains_point(&self, point: &[f32; 3]) -> bool {
        (self.x - point[0]).abs() < f32::EPSILON
            && (self.y - point[1]).abs() < f32::EPSILON
            && (self.z - point[2]).abs() < f32::EPSILON
    }
}

/// Spatial index for scene waypoints.
///
/// Uses an R*-tree for efficient spatial queries.
pub struct SpatialIndex {
    tree: RTree<WaypointPoint>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Insert a waypoint into the index.
    pub fn insert(&mut self, id: WaypointId, x: f32, y: f32, z: f32) {
        self.tree.insert(WaypointPoint::new(id, x, y, z));
    }

    /// Remove a waypoint from the index.
    ///
    /// Returns true if the waypoint was found and removed.
    pub fn remove(&mut self, id: WaypointId, x: f32, y: f32, z: f32) -> bool {
        let point = WaypointPoint::new(id, x, y, z);
        self.tree.remove(&point).is_some()
    }

    /// Find the nearest waypoint to a point.
    pub fn nearest(&self, x: f32, y: f32, z: f32) -> Option<WaypointId> {
        self.tree.nearest_neighbor(&[x, y, z]).map(|point| point.id)
    }

    /// Find the nearest waypoint within a maximum distance.
    pub fn nearest_within(&self, x: f32, y: f32, z: f32, max_distance: f32) -> Option<WaypointId> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y, z])
            .filter(|point| point.distance_2(&[x, y, z]) <= max_distance_sq)
            .map(|point| point.id)
    }

    /// Find all waypoints within an axis-aligned box.
    pub fn in_box(
        &self,
        min_x: f32,
        min_y: f32,
        min_z: f32,
        max_x: f32,
        max_y: f32,
        max_z: f32,
    ) -> Vec<WaypointId> {
        let envelope = AABB::from_corners([min_x, min_y, min_z], [max_x, max_y, max_z]);
        self.tree
            .locate_in_envelope(&envelope)
            .map(|point| point.id)
            .collect()
    }

    /// Find all waypoints within a radius of a point.
    pub fn in_radius(&self, x: f32, y: f32, z: f32, radius: f32) -> Vec<WaypointId> {
        let radius_sq = radius * radius;
        self.tree
            .locate_within_distance([x, y, z], radius_sq)
            .map(|point| point.id)
            .collect()
    }

    /// Rebuild the index from a list of (id, x, y, z) tuples.
    ///
    /// This is more efficient than incremental inserts for bulk updates.
    pub fn rebuild(&mut self, points: &[(WaypointId, f32, f32, f32)]) {
        let waypoint_points: Vec<_> = points
            .iter()
            .map(|&(id, x, y, z)| WaypointPoint::new(id, x, y, z))
            .collect();

        self.tree = RTree::bulk_load(waypoint_points);
    }

    /// Clear all waypoints from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Get the number of waypoints in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
