//! Light-cone outline geometry.
//!
//! Computes the wireframe a host scene view draws for a spotlight: four
//! rim lines from the apex plus a rim circle where the cone ends. The
//! output is a flat segment buffer; rendering stays in the host.

use std::f32::consts::TAU;

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len_sq = v[0] * v[0] + v[1] * v[1] + v[2] * v[2];
    if len_sq <= f32::EPSILON {
        return [0.0, 0.0, 0.0];
    }
    let inv = len_sq.sqrt().recip();
    [v[0] * inv, v[1] * inv, v[2] * inv]
}

fn add_scaled(p: [f32; 3], v: [f32; 3], s: f32) -> [f32; 3] {
    [p[0] + v[0] * s, p[1] + v[1] * s, p[2] + v[2] * s]
}

/// A spotlight cone: apex position, orientation basis, full opening angle
/// in degrees, and range along the forward axis.
#[derive(Debug, Clone, Copy)]
pub struct LightCone {
    origin: [f32; 3],
    forward: [f32; 3],
    up: [f32; 3],
    right: [f32; 3],
    angle_deg: f32,
    range: f32,
}

impl LightCone {
    /// Create a cone from the host transform's position and basis vectors.
    ///
    /// `forward` and `up` are normalized and re-orthogonalized, so a
    /// slightly skewed host basis still yields a clean rim circle.
    pub fn new(origin: [f32; 3], forward: [f32; 3], up: [f32; 3], angle_deg: f32, range: f32) -> Self {
        let forward = normalize(forward);
        let right = normalize(cross(forward, up));
        let up = cross(right, forward);

        Self {
            origin,
            forward,
            up,
            right,
            angle_deg,
            range,
        }
    }

    /// The rim radius at the end of the cone.
    pub fn radius(&self) -> f32 {
        (self.angle_deg.to_radians() * 0.5).tan() * self.range
    }

    /// The center of the rim circle.
    pub fn end_point(&self) -> [f32; 3] {
        add_scaled(self.origin, self.forward, self.range)
    }

    /// Build the outline as a flat segment buffer [ax, ay, az, bx, by, bz, ...].
    ///
    /// Four apex-to-rim lines (up, down, right, left) followed by the rim
    /// circle approximated with `circle_segments` chords (minimum 3).
    pub fn outline(&self, circle_segments: usize) -> Vec<f32> {
        let end = self.end_point();
        let radius = self.radius();
        let chords = circle_segments.max(3);

        let mut segments = Vec::with_capacity((4 + chords) * 6);
        let mut push = |a: [f32; 3], b: [f32; 3]| {
            segments.extend_from_slice(&a);
            segments.extend_from_slice(&b);
        };

        push(self.origin, add_scaled(end, self.up, radius));
        push(self.origin, add_scaled(end, self.up, -radius));
        push(self.origin, add_scaled(end, self.right, radius));
        push(self.origin, add_scaled(end, self.right, -radius));

        let rim_point = |t: f32| {
            let p = add_scaled(end, self.up, radius * t.cos());
            add_scaled(p, self.right, radius * t.sin())
        };
        for k in 0..chords {
            let t0 = k as f32 / chords as f32 * TAU;
            let t1 = (k + 1) as f32 / chords as f32 * TAU;
            push(rim_point(t0), rim_point(t1));
        }

        segments
    }
}
