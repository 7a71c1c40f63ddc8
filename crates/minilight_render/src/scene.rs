//! Scene: the triangle arena, its emitters, the spatial index, and the
//! background emission.

use minilight_math::{Ray, Vec3};
use rand::RngCore;

use crate::octree::SpatialIndex;
use crate::random::gen_f64;
use crate::triangle::{Triangle, TriangleId};

/// Hard cap on triangles held by a scene.
pub const MAX_TRIANGLES: usize = 1 << 24;

/// An immutable scene. Triangles are owned here; everything else refers to
/// them by [`TriangleId`].
pub struct Scene {
    triangles: Vec<Triangle>,
    emitters: Vec<TriangleId>,
    index: SpatialIndex,
    sky_emission: Vec3,
    ground_reflection: Vec3,
}

impl Scene {
    /// Build a scene around the `eye` position.
    ///
    /// `sky_emission` is clamped non-negative; `ground_reflectance` is a
    /// [0, 1] factor applied to the sky to produce the upward background.
    pub fn new(
        eye: Vec3,
        sky_emission: Vec3,
        ground_reflectance: Vec3,
        mut triangles: Vec<Triangle>,
    ) -> Self {
        let sky_emission = sky_emission.max(Vec3::ZERO);
        let ground_reflection = sky_emission * ground_reflectance.clamp(Vec3::ZERO, Vec3::ONE);

        triangles.truncate(MAX_TRIANGLES);
        let emitters = triangles
            .iter()
            .enumerate()
            .filter(|(_, triangle)| triangle.is_emitter())
            .map(|(id, _)| id)
            .collect();
        let index = SpatialIndex::new(eye, &triangles);

        Self {
            triangles,
            emitters,
            index,
            sky_emission,
            ground_reflection,
        }
    }

    pub fn triangle(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id]
    }

    pub fn triangles_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn emitters_count(&self) -> usize {
        self.emitters.len()
    }

    /// Nearest triangle hit along `ray`, skipping `last_hit`.
    pub fn intersect(
        &self,
        ray: &Ray,
        last_hit: Option<TriangleId>,
    ) -> Option<(TriangleId, Vec3)> {
        self.index.intersect(ray, &self.triangles, last_hit)
    }

    /// Uniformly pick an emitter and a point on it, or `None` when the
    /// scene has no emitters.
    pub fn sample_emitter(&self, rng: &mut dyn RngCore) -> Option<(Vec3, TriangleId)> {
        if self.emitters.is_empty() {
            return None;
        }
        let pick = (gen_f64(rng) * self.emitters.len() as f64) as usize;
        let id = self.emitters[pick.min(self.emitters.len() - 1)];
        Some((self.triangles[id].sample_point(rng), id))
    }

    /// Background radiance for a ray that left the scene. `back_direction`
    /// is the escaping ray's direction reversed: a ray going up looks back
    /// down and sees the sky, anything else sees the ground reflection.
    pub fn default_emission(&self, back_direction: Vec3) -> Vec3 {
        if back_direction.y < 0.0 {
            self.sky_emission
        } else {
            self.ground_reflection
        }
    }
}
