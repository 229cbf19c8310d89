#![forbid(unsafe_code)]

//! `meshview` fetches a grid/mesh description from an HTTP endpoint and renders it as an SVG
//! path, headless.
//!
//! The grid server answers one GET with a JSON document (`nx`, `ny`, `dx`, `dy`,
//! `mesh.segments`). [`fetch_and_render`] fetches it, frames the padded grid with two linear
//! scales and appends a single `<path class="mesh">` to the canvas.
//!
//! # Features
//!
//! - `raster`: PNG output via pure-Rust SVG rasterization (`meshview::raster`)

mod fetch;

#[cfg(feature = "raster")]
pub mod raster;

pub use fetch::{FailureKind, GridFetcher, fetch_grid};
pub use meshview_core::{
    CanvasConfig, ControlPoint, Grid, Mesh, MeshStyle, MeshViewConfig, Neighborhood, Point,
    RequestMode, Segment, parse_grid,
};
pub use meshview_render::{
    Curve, LinearScale, MeshRenderOptions, MeshScales, RenderSummary, SvgCanvas, SvgElement,
    render_mesh,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network failure fetching {url}: {kind}: {detail}")]
    NetworkFailure {
        url: String,
        kind: FailureKind,
        detail: String,
    },
    /// The body is not a grid document, or the configuration is invalid.
    #[error(transparent)]
    Schema(#[from] meshview_core::Error),
    #[error(transparent)]
    Render(#[from] meshview_render::Error),
}

impl Error {
    pub(crate) fn network(url: &url::Url, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::NetworkFailure {
            url: url.to_string(),
            kind,
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Builds the render target: the first `<svg>` of `host`, or a blank canvas of the configured
/// size.
pub fn canvas_for(config: &MeshViewConfig, host: Option<&str>) -> Result<SvgCanvas> {
    let canvas = match host {
        Some(doc) => SvgCanvas::parse(doc),
        None => Ok(SvgCanvas::blank(config.canvas.width, config.canvas.height)),
    };
    logged(canvas.map_err(Error::from))
}

/// Fetches the grid from `config.endpoint` and appends the mesh path to `canvas`.
///
/// Every failure is logged and returned; the canvas is only touched once the grid has been
/// fetched and validated.
pub async fn fetch_and_render(
    config: &MeshViewConfig,
    canvas: &mut SvgCanvas,
) -> Result<RenderSummary> {
    let run = async {
        let options = MeshRenderOptions::from_config(config)?;
        let grid = fetch_grid(config).await?;
        Ok::<_, Error>(render_mesh(canvas, &grid, &options))
    };
    logged(run.await)
}

/// [`fetch_and_render`] onto [`canvas_for`], returning the serialized document.
pub async fn fetch_and_render_svg(config: &MeshViewConfig, host: Option<&str>) -> Result<String> {
    let mut canvas = canvas_for(config, host)?;
    fetch_and_render(config, &mut canvas).await?;
    Ok(canvas.to_svg_string())
}

/// Renders an already-received response body. Nothing is appended when the body is invalid.
pub fn render_grid_json(
    body: &str,
    canvas: &mut SvgCanvas,
    options: &MeshRenderOptions,
) -> Result<RenderSummary> {
    let grid = logged(parse_grid(body).map_err(Error::from))?;
    Ok(render_mesh(canvas, &grid, options))
}

fn logged<T>(result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        tracing::error!(error = %err, "mesh fetch and render failed");
    }
    result
}
