#![forbid(unsafe_code)]

//! Grid/mesh response model for meshview (headless).
//!
//! The grid server answers a single GET with a JSON document describing the grid dimensions,
//! the mesh segments and, optionally, the u-cell control volumes. This crate owns:
//! - the typed model of that document ([`Grid`])
//! - an explicit, path-aware validating parse ([`parse_grid`])
//! - the viewer configuration ([`MeshViewConfig`])

pub mod config;
pub mod error;
pub mod model;
pub mod parse;

pub use config::{CanvasConfig, MeshStyle, MeshViewConfig, RequestMode};
pub use error::{Error, Result};
pub use model::{ControlPoint, Grid, Mesh, Neighborhood, Point, Segment};
pub use parse::{parse_grid, parse_grid_value};

#[cfg(test)]
mod tests;
