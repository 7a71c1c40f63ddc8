//! MiniLight Core - model file support.
//!
//! This crate provides:
//!
//! - **Model data**: [`Model`], [`CameraParams`], [`TriangleData`] - the
//!   parsed scene description, independent of the render types
//! - **Parsing**: the line-oriented MiniLight text grammar
//!
//! # Example
//!
//! ```ignore
//! use minilight_core::Model;
//!
//! let model = Model::load("cornellbox.ml.txt")?;
//! println!("{} triangles over {} iterations",
//!     model.triangles.len(),
//!     model.iterations);
//! ```

mod model;
mod parser;

pub use model::{CameraParams, Model, TriangleData, MAX_TRIANGLES};
pub use parser::{ModelError, ModelResult, FORMAT_ID};
