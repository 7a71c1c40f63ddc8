// Re-export the glam double-precision vector as our Vec3
pub use glam::DVec3 as Vec3;

// MiniLight math types
mod aabb;
mod ray;

pub use aabb::Aabb;
pub use ray::Ray;
