//! Fixed spawn placement.
//!
//! A [`Placement`] is where a staged tank must appear: a world-space position
//! and a heading. Headings are authored in degrees and handed to the host in
//! radians.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A world-space position plus a heading in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    /// World-space position.
    pub position: Vec3,
    /// Heading around the vertical axis, in degrees.
    pub heading_deg: f32,
}

impl Placement {
    /// The origin, facing along +X.
    pub const ORIGIN: Self = Self {
        position: Vec3::ZERO,
        heading_deg: 0.0,
    };

    /// Create a placement from a position and a heading in degrees.
    #[must_use]
    pub fn new(position: Vec3, heading_deg: f32) -> Self {
        Self {
            position,
            heading_deg,
        }
    }

    /// Heading converted to radians, as the host expects it.
    #[must_use]
    pub fn heading_radians(&self) -> f32 {
        self.heading_deg.to_radians()
    }

    /// Raise the placement by `dz` on the vertical axis.
    #[must_use]
    pub fn lifted(mut self, dz: f32) -> Self {
        self.position.z += dz;
        self
    }

    /// Absolute per-axis distance between `actual` and this placement on the
    /// horizontal plane.
    #[must_use]
    pub fn horizontal_offset(&self, actual: Vec3) -> Vec2 {
        (self.position.truncate() - actual.truncate()).abs()
    }

    /// Returns `true` if `actual` has strayed more than `tolerance` from this
    /// placement along either horizontal axis.
    #[must_use]
    pub fn has_drifted(&self, actual: Vec3, tolerance: f32) -> bool {
        let offset = self.horizontal_offset(actual);
        offset.x > tolerance || offset.y > tolerance
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::ORIGIN
    }
}
