//! Spatial indexing for O(log n) scene picking.
//!
//! This module provides an R-tree based spatial index for efficient
//! nearest-neighbor and range queries on waypoint positions.

mod rtree;

pub use rtree::SpatialIndex;
