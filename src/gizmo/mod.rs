//! Gizmo geometry for the host scene view.
//!
//! This module computes the line-segment buffers the host draws as scene
//! gizmos. The crate produces geometry only; colors, dotted styles, and
//! the draw calls themselves belong to the host.

mod light_cone;

pub use light_cone::LightCone;
