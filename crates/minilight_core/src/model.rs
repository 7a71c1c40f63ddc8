//! Parsed model data.
//!
//! A [`Model`] is the plain-data form of a scene description file: camera
//! placement, image dimensions, iteration count, background emission, and
//! the triangle list. Turning it into render types is the driver's job.

use std::fs;
use std::path::Path;

use minilight_math::Vec3;

use crate::parser::{parse_model, ModelResult};

/// Hard cap on triangles read from a model file.
pub const MAX_TRIANGLES: usize = 1 << 24;

/// Camera description from a model file.
///
/// `direction` is as written in the file; normalization and view-angle
/// clamping happen when the render camera is built.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraParams {
    pub position: Vec3,
    pub direction: Vec3,
    pub view_angle_degrees: f64,
}

/// One triangle: three vertices plus its surface qualities.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleData {
    pub vertices: [Vec3; 3],
    pub reflectivity: Vec3,
    pub emissivity: Vec3,
}

/// A parsed MiniLight model file.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub iterations: u32,
    pub width: usize,
    pub height: usize,
    pub camera: CameraParams,
    pub sky_emission: Vec3,
    pub ground_reflectance: Vec3,
    pub triangles: Vec<TriangleData>,
}

impl Model {
    /// Read and parse a model file.
    pub fn load<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse a model from in-memory text.
    pub fn parse(src: &str) -> ModelResult<Self> {
        parse_model(src)
    }
}
