//! Triangle primitive: geometry, surface qualities, ray intersection.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use minilight_math::{Aabb, Ray, Vec3};
use rand::RngCore;

use crate::random::gen_f64;

/// Index of a triangle in the scene's arena. Identity comparisons
/// (`last_hit`, emitter-vs-occluder) are id comparisons, never value
/// equality.
pub type TriangleId = usize;

/// Padding applied to triangle bounds and to octree cell containment
/// tests. Chosen so a triangle straddling cell boundaries is found from
/// either side.
pub(crate) const TOLERANCE: f64 = 1.0 / 1024.0;

/// Determinant cutoff below which a ray counts as parallel to the plane.
const EPSILON: f64 = 1.0 / 1_048_576.0;

/// A triangle with diffuse and emissive surface qualities.
///
/// Immutable after construction; the shading frame (tangent, normal), the
/// area and the padded bound are precomputed.
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Per-channel reflectivity, clamped to [0, 1]
    reflectivity: Vec3,
    /// Per-channel radiant exitance, clamped to be non-negative
    emissivity: Vec3,
    tangent: Vec3,
    normal: Vec3,
    area: f64,
    bound: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices and its qualities.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, reflectivity: Vec3, emissivity: Vec3) -> Self {
        let reflectivity = reflectivity.clamp(Vec3::ZERO, Vec3::ONE);
        let emissivity = emissivity.max(Vec3::ZERO);

        let tangent = (v1 - v0).normalize_or_zero();
        let edge_cross = (v1 - v0).cross(v2 - v1);
        let normal = tangent.cross(v2 - v1).normalize_or_zero();
        let area = 0.5 * edge_cross.length();

        let bound = Aabb::new(v0.min(v1).min(v2), v0.max(v1).max(v2)).expand(TOLERANCE);

        Self {
            v0,
            v1,
            v2,
            reflectivity,
            emissivity,
            tangent,
            normal,
            area,
            bound,
        }
    }

    pub fn reflectivity(&self) -> Vec3 {
        self.reflectivity
    }

    pub fn emissivity(&self) -> Vec3 {
        self.emissivity
    }

    /// Unit vector along the first edge; the x axis of the shading frame.
    pub fn tangent(&self) -> Vec3 {
        self.tangent
    }

    /// Unit face normal. Zero for degenerate triangles.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Axis-aligned bound, padded by TOLERANCE on every face.
    pub fn bound(&self) -> Aabb {
        self.bound
    }

    /// An emitter has somewhere to emit from and something to emit.
    pub fn is_emitter(&self) -> bool {
        self.emissivity != Vec3::ZERO && self.area > 0.0
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// Returns the distance along the ray, or `None` for a miss. There is
    /// no back-face culling: both sides are intersectable, and orientation
    /// is resolved at shading time.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let p = ray.direction.cross(edge2);
        let det = edge1.dot(p);

        // Ray is parallel to triangle plane
        if det.abs() < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.v0;
        let u = s.dot(p) * inv_det;

        // Check if intersection is outside triangle (u parameter)
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = ray.direction.dot(q) * inv_det;

        // Check if intersection is outside triangle (v parameter)
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }

    /// Uniform random point on the triangle.
    pub fn sample_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        // sqrt warps the first deviate so area is sampled uniformly
        let sqr1 = gen_f64(rng).sqrt();
        let r2 = gen_f64(rng);
        let a = 1.0 - sqr1;
        let b = (1.0 - r2) * sqr1;
        self.v0 + (self.v1 - self.v0) * a + (self.v2 - self.v0) * b
    }
}
