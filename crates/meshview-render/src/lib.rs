#![forbid(unsafe_code)]

//! Headless rendering for meshview: D3-compatible linear scales, line generators and curves,
//! and an SVG canvas that rendered elements are appended to.

pub mod canvas;
pub mod curve;
mod fmt;
pub mod geom;
pub mod line;
pub mod mesh;
pub mod path;
pub mod scale;

pub use canvas::{SvgCanvas, SvgElement};
pub use curve::Curve;
pub use line::LineGenerator;
pub use mesh::{MAX_LATTICE_CELLS, MeshRenderOptions, MeshScales, RenderSummary, render_mesh};
pub use scale::LinearScale;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("render target missing: the document has no <svg> element")]
    RenderTargetMissing,
    #[error("canvas `{attribute}` is not a numeric length: {value:?}")]
    InvalidCanvasSize {
        attribute: &'static str,
        value: Option<String>,
    },
    #[error("canvas document is not well-formed: {message}")]
    InvalidDocument { message: String },
    #[error("unknown curve `{name}`")]
    UnknownCurve { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
