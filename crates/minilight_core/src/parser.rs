//! MiniLight model text parser.
//!
//! The grammar is line-oriented only at the top: after the `#MiniLight`
//! header line, fields are whitespace-separated tokens, so blank lines may
//! appear anywhere between sections and a parenthesized triple may be split
//! across lines.
//!
//! # Layout
//!
//! 1. `#MiniLight` header line
//! 2. iteration count
//! 3. image width and height
//! 4. camera: `(position) (direction) angleDegrees`
//! 5. background: `(skyEmission) (groundReflectance)`
//! 6. triangles: `(v0) (v1) (v2) (reflectivity) (emissivity)` until EOF

use minilight_math::Vec3;
use thiserror::Error;

use crate::model::{CameraParams, Model, TriangleData, MAX_TRIANGLES};

/// Model files must begin with this identifier.
pub const FORMAT_ID: &str = "#MiniLight";

/// Errors that can occur while loading a model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("first line does not begin with #MiniLight")]
    UnrecognizedFormat,

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unexpected end of file")]
    UnexpectedEof,
}

/// Result type for model loading.
pub type ModelResult<T> = Result<T, ModelError>;

/// Parse a complete model from source text.
pub(crate) fn parse_model(src: &str) -> ModelResult<Model> {
    let mut cursor = Cursor::new(src);
    cursor.header()?;

    let iterations = cursor.u32()?;
    let width = cursor.usize()?;
    let height = cursor.usize()?;

    let camera = CameraParams {
        position: cursor.vec3()?,
        direction: cursor.vec3()?,
        view_angle_degrees: cursor.f64()?,
    };
    let sky_emission = cursor.vec3()?;
    let ground_reflectance = cursor.vec3()?;

    let mut triangles = Vec::new();
    while triangles.len() < MAX_TRIANGLES && !cursor.at_eof() {
        triangles.push(TriangleData {
            vertices: [cursor.vec3()?, cursor.vec3()?, cursor.vec3()?],
            reflectivity: cursor.vec3()?,
            emissivity: cursor.vec3()?,
        });
    }

    Ok(Model {
        iterations,
        width,
        height,
        camera,
        sky_emission,
        ground_reflectance,
        triangles,
    })
}

/// Token cursor over the source text, tracking the current line for error
/// messages.
struct Cursor<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { rest: src, line: 1 }
    }

    fn error(&self, message: String) -> ModelError {
        ModelError::Parse {
            line: self.line,
            message,
        }
    }

    /// Consume the header line; it must begin with the format id.
    fn header(&mut self) -> ModelResult<()> {
        let line_end = self.rest.find('\n').unwrap_or(self.rest.len());
        if !self.rest[..line_end].starts_with(FORMAT_ID) {
            return Err(ModelError::UnrecognizedFormat);
        }
        self.rest = &self.rest[line_end..];
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.rest.chars().next() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.rest = &self.rest[c.len_utf8()..];
        }
    }

    /// True once only whitespace remains.
    fn at_eof(&mut self) -> bool {
        self.skip_whitespace();
        self.rest.is_empty()
    }

    fn expect(&mut self, c: char) -> ModelResult<()> {
        self.skip_whitespace();
        let mut chars = self.rest.chars();
        match chars.next() {
            Some(found) if found == c => {
                self.rest = chars.as_str();
                Ok(())
            }
            Some(found) => Err(self.error(format!("expected '{c}', found '{found}'"))),
            None => Err(ModelError::UnexpectedEof),
        }
    }

    /// Next run of non-whitespace, non-parenthesis characters.
    fn token(&mut self) -> ModelResult<&'a str> {
        self.skip_whitespace();
        if self.rest.is_empty() {
            return Err(ModelError::UnexpectedEof);
        }
        let end = self
            .rest
            .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .unwrap_or(self.rest.len());
        if end == 0 {
            let found = self.rest.chars().next().unwrap();
            return Err(self.error(format!("expected a number, found '{found}'")));
        }
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(token)
    }

    fn f64(&mut self) -> ModelResult<f64> {
        let token = self.token()?;
        token
            .parse()
            .map_err(|_| self.error(format!("invalid number '{token}'")))
    }

    fn u32(&mut self) -> ModelResult<u32> {
        let token = self.token()?;
        token
            .parse()
            .map_err(|_| self.error(format!("invalid count '{token}'")))
    }

    fn usize(&mut self) -> ModelResult<usize> {
        let token = self.token()?;
        token
            .parse()
            .map_err(|_| self.error(format!("invalid dimension '{token}'")))
    }

    /// A parenthesized triple, whitespace-tolerant inside the parentheses.
    fn vec3(&mut self) -> ModelResult<Vec3> {
        self.expect('(')?;
        let x = self.f64()?;
        let y = self.f64()?;
        let z = self.f64()?;
        self.expect(')')?;
        Ok(Vec3::new(x, y, z))
    }
}
