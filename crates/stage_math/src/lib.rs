//! # stage_math
//!
//! Math types for staged scenes. Re-exports [`glam`] for linear algebra and
//! defines the spawn [`Placement`] and the spherical [`aim_direction`] used to
//! point staged shots.

pub mod aim;
pub mod placement;

// Re-export glam types for convenience.
pub use glam::{Vec2, Vec3};

pub use aim::aim_direction;
pub use placement::Placement;
