//! Surface interaction at a ray hit.
//!
//! A [`SurfacePoint`] bundles a triangle with a position on it and answers
//! the three local-shading questions: what does this point emit, how does
//! it reflect incoming radiance, and where does the path go next.

use std::f64::consts::PI;

use minilight_math::Vec3;
use rand::RngCore;

use crate::random::gen_f64;
use crate::triangle::{Triangle, TriangleId};

/// Floor on the squared distance in solid-angle emission, clamping the
/// inverse-square singularity.
const DISTANCE2_MIN: f64 = 1e-6;

/// A shading point on a triangle.
///
/// All direction arguments are unit vectors pointing away from the
/// surface.
pub struct SurfacePoint<'a> {
    triangle: &'a Triangle,
    id: TriangleId,
    position: Vec3,
}

impl<'a> SurfacePoint<'a> {
    pub fn new(triangle: &'a Triangle, id: TriangleId, position: Vec3) -> Self {
        Self {
            triangle,
            id,
            position,
        }
    }

    pub fn id(&self) -> TriangleId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Emission from this point toward `to_position`.
    ///
    /// `out_direction` is the unit direction from here to the query point.
    /// With `is_solid_angle` the radiance is scaled by the projected solid
    /// angle subtended at the query position (next-event estimation);
    /// otherwise the raw emissivity is returned. Back faces emit nothing.
    pub fn emission(&self, to_position: Vec3, out_direction: Vec3, is_solid_angle: bool) -> Vec3 {
        let ray = to_position - self.position;
        let distance2 = ray.dot(ray);
        let cos_area = out_direction.dot(self.triangle.normal()) * self.triangle.area();

        // emit from the front face only
        if cos_area <= 0.0 {
            return Vec3::ZERO;
        }

        let solid_angle = cos_area / distance2.max(DISTANCE2_MIN);
        self.triangle.emissivity() * if is_solid_angle { solid_angle } else { 1.0 }
    }

    /// Diffuse reflection of `in_radiance` arriving along `in_direction`,
    /// seen from `out_direction`.
    pub fn reflection(&self, in_direction: Vec3, in_radiance: Vec3, out_direction: Vec3) -> Vec3 {
        let in_dot = in_direction.dot(self.triangle.normal());
        let out_dot = out_direction.dot(self.triangle.normal());

        // directions must be on the same side of the surface
        if (in_dot < 0.0) != (out_dot < 0.0) {
            return Vec3::ZERO;
        }

        in_radiance * self.triangle.reflectivity() * (in_dot.abs() / PI)
    }

    /// Sample the next path direction, or `None` when the path terminates.
    ///
    /// Russian roulette on the mean reflectivity decides survival;
    /// survivors carry `reflectivity / mean` so the estimator stays
    /// unbiased, and get a cosine-weighted direction in the hemisphere on
    /// `in_direction`'s side of the surface.
    pub fn next_direction(
        &self,
        rng: &mut dyn RngCore,
        in_direction: Vec3,
    ) -> Option<(Vec3, Vec3)> {
        let reflectivity_mean = self.triangle.reflectivity().dot(Vec3::ONE) / 3.0;
        if gen_f64(rng) >= reflectivity_mean {
            return None;
        }
        let color = self.triangle.reflectivity() / reflectivity_mean;

        // cosine-weighted importance sample of the hemisphere
        let two_pi_r1 = 2.0 * PI * gen_f64(rng);
        let r2 = gen_f64(rng);
        let sr2 = r2.sqrt();
        let x = two_pi_r1.cos() * sr2;
        let y = two_pi_r1.sin() * sr2;
        let z = (1.0 - r2).sqrt();

        // frame z goes to whichever side faces the incoming direction
        let normal = if self.triangle.normal().dot(in_direction) >= 0.0 {
            self.triangle.normal()
        } else {
            -self.triangle.normal()
        };
        let tangent = self.triangle.tangent();

        let out_direction = tangent * x + normal.cross(tangent) * y + normal * z;
        Some((out_direction, color))
    }
}
