//! Core path-tracing radiance estimator.
//!
//! Implements recursive Monte Carlo path tracing with:
//! - Next-event (emitter) sampling with shadow rays
//! - Russian-roulette termination via the surface's next-direction sample
//! - Background emission for escaping rays

use minilight_math::{Ray, Vec3};
use rand::RngCore;

use crate::scene::Scene;
use crate::surface::SurfacePoint;
use crate::triangle::TriangleId;

/// Radiance estimator over a scene.
pub struct RayTracer<'a> {
    scene: &'a Scene,
}

impl<'a> RayTracer<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// Radiance seen along `ray`.
    ///
    /// `last_hit` is the triangle the ray leaves from, skipped during
    /// intersection so continuation rays never re-hit their own surface.
    /// Recursion depth is bounded in expectation by Russian roulette.
    pub fn radiance(
        &self,
        ray: &Ray,
        rng: &mut dyn RngCore,
        last_hit: Option<TriangleId>,
    ) -> Vec3 {
        let Some((id, position)) = self.scene.intersect(ray, last_hit) else {
            return self.scene.default_emission(-ray.direction);
        };
        let surface = SurfacePoint::new(self.scene.triangle(id), id, position);

        // Only the first bounce sees emission directly; later bounces get
        // it through the emitter sampling step, never both
        let local_emission = if last_hit.is_none() {
            surface.emission(ray.origin, -ray.direction, false)
        } else {
            Vec3::ZERO
        };

        let mut radiance = local_emission + self.sample_emitters(ray, rng, &surface);

        if let Some((next_direction, color)) = surface.next_direction(rng, -ray.direction) {
            let next_ray = Ray::new(surface.position(), next_direction);
            radiance += color * self.radiance(&next_ray, rng, Some(id));
        }

        radiance
    }

    /// Single-sample next-event estimate of direct lighting at `surface`.
    ///
    /// One emitter is picked uniformly; scaling the result by the emitter
    /// count corrects for the selection probability.
    fn sample_emitters(
        &self,
        ray: &Ray,
        rng: &mut dyn RngCore,
        surface: &SurfacePoint,
    ) -> Vec3 {
        let Some((emitter_position, emitter_id)) = self.scene.sample_emitter(rng) else {
            return Vec3::ZERO;
        };
        let emit_direction = (emitter_position - surface.position()).normalize_or_zero();

        // the sample is unshadowed only when nothing is hit, or the hit is
        // the chosen emitter itself
        let shadow_ray = Ray::new(surface.position(), emit_direction);
        let unshadowed = match self.scene.intersect(&shadow_ray, Some(surface.id())) {
            None => true,
            Some((hit_id, _)) => hit_id == emitter_id,
        };

        let emission_in = if unshadowed {
            SurfacePoint::new(self.scene.triangle(emitter_id), emitter_id, emitter_position)
                .emission(surface.position(), -emit_direction, true)
        } else {
            Vec3::ZERO
        };

        surface.reflection(
            emit_direction,
            emission_in * self.scene.emitters_count() as f64,
            -ray.direction,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::Lfsr113;
    use crate::triangle::Triangle;

    #[test]
    fn test_radiance_of_empty_scene_is_background() {
        let scene = Scene::new(Vec3::ZERO, Vec3::new(2.0, 3.0, 4.0), Vec3::splat(0.5), Vec::new());
        let tracer = RayTracer::new(&scene);
        let mut rng = Lfsr113::new();

        // ray going up looks back down: sky
        let up = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(tracer.radiance(&up, &mut rng, None), Vec3::new(2.0, 3.0, 4.0));

        // ray going down looks back up: ground reflection
        let down = Ray::new(Vec3::ZERO, -Vec3::Y);
        assert_eq!(tracer.radiance(&down, &mut rng, None), Vec3::new(1.0, 1.5, 2.0));

        // horizontal rays fall on the ground side (strict test)
        let level = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(tracer.radiance(&level, &mut rng, None), Vec3::new(1.0, 1.5, 2.0));
    }

    #[test]
    fn test_first_bounce_sees_emitter_directly() {
        // black emitter-only surface: radiance is its emissivity exactly
        let emitter = Triangle::new(
            Vec3::new(-2.0, 0.0, -2.0),
            Vec3::new(-2.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::new(5.0, 6.0, 7.0),
        );
        let scene = Scene::new(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, Vec3::ZERO, vec![emitter]);
        let tracer = RayTracer::new(&scene);
        let mut rng = Lfsr113::new();

        let down = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let radiance = tracer.radiance(&down, &mut rng, None);
        // zero reflectivity: no direct-light term, no continuation
        assert_eq!(radiance, Vec3::new(5.0, 6.0, 7.0));
    }

    #[test]
    fn test_later_bounces_do_not_double_count_emission() {
        let emitter = Triangle::new(
            Vec3::new(-2.0, 0.0, -2.0),
            Vec3::new(-2.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::ONE,
        );
        let scene = Scene::new(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, Vec3::ZERO, vec![emitter]);
        let tracer = RayTracer::new(&scene);
        let mut rng = Lfsr113::new();

        // same ray, but flagged as a continuation from another surface:
        // the only emitter is also the only hit, and with the surface
        // itself black there is nothing to add
        let down = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let radiance = tracer.radiance(&down, &mut rng, Some(usize::MAX - 1));
        assert_eq!(radiance, Vec3::ZERO);
    }

    #[test]
    fn test_direct_lighting_reaches_unshadowed_floor() {
        // emitter overhead, reflective floor below
        let emitter = Triangle::new(
            Vec3::new(-0.5, 2.0, -0.5),
            Vec3::new(0.5, 2.0, -0.5),
            Vec3::new(0.0, 2.0, 0.5),
            Vec3::ZERO,
            Vec3::splat(10.0),
        );
        let floor = Triangle::new(
            Vec3::new(-2.0, 0.0, -2.0),
            Vec3::new(-2.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::splat(0.75),
            Vec3::ZERO,
        );
        let scene = Scene::new(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::ZERO,
            Vec3::ZERO,
            vec![emitter, floor],
        );
        let tracer = RayTracer::new(&scene);
        let mut rng = Lfsr113::new();

        let down = Ray::new(Vec3::new(0.1, 1.0, 0.1), Vec3::new(0.0, -1.0, 0.0));
        let mut lit = 0usize;
        for _ in 0..16 {
            if tracer.radiance(&down, &mut rng, None).max_element() > 0.0 {
                lit += 1;
            }
        }
        // the shadow ray to the overhead emitter is never blocked
        assert_eq!(lit, 16);
    }

    #[test]
    fn test_occluder_shadows_direct_lighting() {
        let emitter = Triangle::new(
            Vec3::new(-0.5, 2.0, -0.5),
            Vec3::new(0.5, 2.0, -0.5),
            Vec3::new(0.0, 2.0, 0.5),
            Vec3::ZERO,
            Vec3::splat(10.0),
        );
        // a black shade fully covering the emitter from below
        let shade = Triangle::new(
            Vec3::new(-4.0, 1.5, 4.0),
            Vec3::new(4.0, 1.5, 4.0),
            Vec3::new(0.0, 1.5, -4.0),
            Vec3::ZERO,
            Vec3::ZERO,
        );
        let floor = Triangle::new(
            Vec3::new(-2.0, 0.0, -2.0),
            Vec3::new(-2.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::splat(0.75),
            Vec3::ZERO,
        );
        let scene = Scene::new(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::ZERO,
            Vec3::ZERO,
            vec![emitter, shade, floor],
        );
        let tracer = RayTracer::new(&scene);
        let mut rng = Lfsr113::new();

        // hit the floor; its view of the emitter passes through the shade
        let down = Ray::new(Vec3::new(0.1, 1.0, 0.1), Vec3::new(0.0, -1.0, 0.0));
        for _ in 0..16 {
            let radiance = tracer.radiance(&down, &mut rng, None);
            assert_eq!(radiance, Vec3::ZERO);
        }
    }
}
