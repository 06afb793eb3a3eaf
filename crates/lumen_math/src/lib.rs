// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod ray;
mod vec;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use vec::{MathError, MathResult, Vec3Ext};

/// Linear RGB color. Components are unbounded radiance, not display values.
pub type Color = Vec3;

/// A position in world space.
pub type Point3 = Vec3;
