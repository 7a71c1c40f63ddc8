//! Camera: view frame construction and per-pixel ray generation.

use std::f64::consts::PI;

use minilight_math::{Ray, Vec3};
use rand::RngCore;

use crate::image::Image;
use crate::random::gen_f64;
use crate::scene::Scene;
use crate::tracer::RayTracer;

/// View angle limits, degrees.
const VIEW_ANGLE_MIN: f64 = 10.0;
const VIEW_ANGLE_MAX: f64 = 160.0;

/// Pinhole camera with a precomputed orthonormal view frame.
pub struct Camera {
    view_position: Vec3,
    view_direction: Vec3,
    right: Vec3,
    up: Vec3,
    /// Full view angle in radians
    view_angle: f64,
}

impl Camera {
    /// Create a camera at `position` looking along `direction`.
    ///
    /// The direction is normalized (falling back to +Z if zero) and the
    /// view angle is clamped to [10, 160] degrees.
    pub fn new(position: Vec3, direction: Vec3, view_angle_degrees: f64) -> Self {
        let mut view_direction = direction.normalize_or_zero();
        if view_direction == Vec3::ZERO {
            view_direction = Vec3::Z;
        }

        let view_angle = view_angle_degrees.clamp(VIEW_ANGLE_MIN, VIEW_ANGLE_MAX) * (PI / 180.0);

        // calculate view frame basis vectors
        let mut right = Vec3::Y.cross(view_direction).normalize_or_zero();
        if right == Vec3::ZERO {
            // view direction is vertical: start the frame from a Z axis
            // pointing away from it
            let up = Vec3::new(0.0, 0.0, if view_direction.y < 0.0 { 1.0 } else { -1.0 });
            right = up.cross(view_direction).normalize_or_zero();
        }
        let up = view_direction.cross(right).normalize_or_zero();

        Self {
            view_position: position,
            view_direction,
            right,
            up,
            view_angle,
        }
    }

    pub fn view_position(&self) -> Vec3 {
        self.view_position
    }

    /// Accumulate one frame into `image`: one jittered sample through
    /// every pixel, row by row.
    pub fn frame(&self, scene: &Scene, rng: &mut dyn RngCore, image: &mut Image) {
        let tracer = RayTracer::new(scene);
        let (width, height) = (image.width(), image.height());
        let aspect = height as f64 / width as f64;
        let tan_half_angle = (self.view_angle * 0.5).tan();

        for y in 0..height {
            for x in 0..width {
                // stratified jitter inside the pixel, mapped to [-1, 1)
                let x_coefficient = ((x as f64 + gen_f64(rng)) * 2.0 / width as f64) - 1.0;
                let y_coefficient = ((y as f64 + gen_f64(rng)) * 2.0 / height as f64) - 1.0;

                let offset = self.right * x_coefficient + self.up * (y_coefficient * aspect);
                let direction =
                    (self.view_direction + offset * tan_half_angle).normalize_or_zero();

                let ray = Ray::new(self.view_position, direction);
                let radiance = tracer.radiance(&ray, rng, None);
                image.add_to_pixel(x, y, radiance);
            }
        }
    }
}
