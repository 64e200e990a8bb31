//! Waypoint identity and editor-state flags.
//!
//! Waypoints are the vertices of the connectivity graph. Each waypoint has:
//! - A stable unique identifier (survives unrelated graph mutations)
//! - A position (x, y, z) in scene space, stored in the graph's SoA buffers
//! - Editor flags (selected, hovered, hidden) mirrored from the host tool

use std::fmt;

/// Stable waypoint identifier.
///
/// This ID remains valid even after other waypoints are removed from the
/// graph. It wraps a u32 for efficient storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaypointId(pub u32);

impl WaypointId {
    /// Create a new WaypointId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Waypoint({})", self.0)
    }
}

impl From<u32> for WaypointId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<WaypointId> for u32 {
    #[inline]
    fn from(id: WaypointId) -> Self {
        id.0
    }
}

/// Editor-state flags packed into a single byte.
///
/// These track host-tool state per waypoint (which node is selected in the
/// inspector, which one the cursor hovers, which are hidden from the scene
/// view). They never affect graph topology.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaypointState {
    flags: u8,
}

impl WaypointState {
    const SELECTED: u8 = 0b0000_0001;
    const HOVERED: u8 = 0b0000_0010;
    const HIDDEN: u8 = 0b0000_0100;

    /// Create a new default waypoint state.
    #[inline]
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// Check if the waypoint is selected in the host editor.
    #[inline]
    pub fn is_selected(self) -> bool {
        self.flags & Self::SELECTED != 0
    }

    /// Set the selected state.
    #[inline]
    pub fn set_selected(&mut self, selected: bool) {
        if selected {
            self.flags |= Self::SELECTED;
        } else {
            self.flags &= !Self::SELECTED;
        }
    }

    /// Check if the waypoint is hovered.
    #[inline]
    pub fn is_hovered(self) -> bool {
        self.flags & Self::HOVERED != 0
    }

    /// Set the hovered state.
    #[inline]
    pub fn set_hovered(&mut self, hovered: bool) {
        if hovered {
            self.flags |= Self::HOVERED;
        } else {
            self.flags &= !Self::HOVERED;
        }
    }

    /// Check if the waypoint is hidden from the scene view.
    #[inline]
    pub fn is_hidden(self) -> bool {
        self.flags & Self::HIDDEN != 0
    }

    /// Set the hidden state.
    #[inline]
    pub fn set_hidden(&mut self, hidden: bool) {
        if hidden {
            self.flags |= Self::HIDDEN;
        } else {
            self.flags &= !Self::HIDDEN;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waypoint_id() {
        let id = WaypointId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.0, 42);
        assert_eq!(format!("{}", id), "Waypoint(42)");
    }

    #[test]
    fn test_waypoint_id_conversion() {
        let id: WaypointId = 123.into();
        let raw: u32 = id.into();
        assert_eq!(raw, 123);
    }

    #[test]
    fn test_state_default() {
        let state = WaypointState::new();
        assert!(!state.is_selected());
        assert!(!state.is_hovered());
        assert!(!state.is_hidden());
    }

    #[test]
    fn test_state_flags_independent() {
        let mut state = WaypointState::new();
        state.set_selected(true);
        state.set_hidden(true);

        assert!(state.is_selected());
        assert!(state.is_hidden());
        assert!(!state.is_hovered());

        state.set_selected(false);
        assert!(!state.is_selected());
        assert!(state.is_hidden());
    }
}
