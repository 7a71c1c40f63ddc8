//! MiniLight Render - progressive Monte Carlo path tracing.
//!
//! A minimal unbiased global-illumination renderer:
//!
//! - Recursive path tracing with next-event emitter sampling
//! - Russian-roulette termination, cosine-weighted hemisphere sampling
//! - Octree spatial index with ray-ordered traversal
//! - Ward tone-mapped PPM output
//!
//! One [`Camera::frame`] call traces one jittered sample through every
//! pixel; calling it repeatedly accumulates iterations into the [`Image`],
//! which can be written out at any point.

mod camera;
mod image;
mod octree;
mod random;
mod scene;
mod surface;
mod tracer;
mod triangle;

pub use camera::Camera;
pub use image::{Image, IMAGE_DIM_MAX};
pub use octree::SpatialIndex;
pub use random::{gen_f64, Lfsr113};
pub use scene::{Scene, MAX_TRIANGLES};
pub use surface::SurfacePoint;
pub use tracer::RayTracer;
pub use triangle::{Triangle, TriangleId};

/// Re-export math types used throughout the API
pub use minilight_math::{Aabb, Ray, Vec3};
