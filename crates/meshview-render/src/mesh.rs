//! The mesh render step: scales over the grid's padded extent, a line generator over the
//! segment start points, and one `<path>` appended to the canvas.

use crate::canvas::{SvgCanvas, SvgElement};
use crate::curve::Curve;
use crate::fmt::{fmt_attr, fmt_path};
use crate::geom::{Point, point};
use crate::line::LineGenerator;
use crate::Result;
use crate::path::PathBuilder;
use crate::scale::LinearScale;
use meshview_core::{Grid, MeshStyle, MeshViewConfig, Segment};

#[derive(Debug, Clone, PartialEq)]
pub struct MeshRenderOptions {
    pub style: MeshStyle,
    pub curve: Curve,
    /// Cells of padding on each side of both scale domains.
    pub padding_cells: f64,
    pub include_lattice: bool,
    pub include_neighborhoods: bool,
    pub neighborhood_radius: f64,
}

impl Default for MeshRenderOptions {
    fn default() -> Self {
        Self {
            style: MeshStyle::default(),
            curve: Curve::LinearClosed,
            padding_cells: 2.0,
            include_lattice: false,
            include_neighborhoods: false,
            neighborhood_radius: 3.0,
        }
    }
}

impl MeshRenderOptions {
    pub fn from_config(config: &MeshViewConfig) -> Result<Self> {
        Ok(Self {
            style: config.style.clone(),
            curve: config.curve.parse()?,
            padding_cells: config.padding_cells,
            include_lattice: config.include_lattice,
            include_neighborhoods: config.include_neighborhoods,
            ..Self::default()
        })
    }
}

/// The pair of scales that maps grid coordinates to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshScales {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl MeshScales {
    /// `x: [-p·dx, nx + p·dx] -> [0, width]`, `y: [-p·dy, ny + p·dy] -> [height, 0]`.
    pub fn for_grid(grid: &Grid, width: f64, height: f64, padding_cells: f64) -> Self {
        Self {
            x: LinearScale::new(grid.x_extent(padding_cells), (0.0, width)),
            y: LinearScale::new(grid.y_extent(padding_cells), (height, 0.0)),
        }
    }

    pub fn project(&self, x: f64, y: f64) -> Point {
        point(self.x.scale(x), self.y.scale(y))
    }
}

/// A generator projecting each segment's start point through `scales`.
pub fn segment_line<'a>(scales: &'a MeshScales, curve: Curve) -> LineGenerator<'a, Segment> {
    LineGenerator::new(
        move |s: &Segment| scales.x.scale(s.a.x),
        move |s: &Segment| scales.y.scale(s.a.y),
    )
    .curve(curve)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub segment_count: usize,
    /// Number of elements appended to the canvas by this call.
    pub appended: usize,
    pub path_d: String,
}

/// Renders `grid` onto `canvas`.
///
/// Always appends exactly one mesh `<path>`, even when the grid has no segments (its `d` is then
/// empty). Overlays enabled in `options` add one element each; the lattice is left out for grids
/// larger than [`MAX_LATTICE_CELLS`].
pub fn render_mesh(
    canvas: &mut SvgCanvas,
    grid: &Grid,
    options: &MeshRenderOptions,
) -> RenderSummary {
    tracing::debug!(
        nx = grid.nx,
        ny = grid.ny,
        dx = grid.dx,
        dy = grid.dy,
        segments = grid.segments().len(),
        neighborhoods = grid.u_neighborhoods.len(),
        "grid"
    );

    let scales = MeshScales::for_grid(
        grid,
        canvas.width(),
        canvas.height(),
        options.padding_cells,
    );
    tracing::debug!(x = ?scales.x, y = ?scales.y, "scales");

    let line = segment_line(&scales, options.curve);
    tracing::debug!(generator = ?line, curve = options.curve.name(), "line generator");
    tracing::trace!(segments = ?grid.segments(), "segments");

    let mut appended = 0;
    if options.include_lattice {
        if let Some(lattice) = lattice_path(grid, &scales) {
            canvas.append(lattice);
            appended += 1;
        }
    }

    let d = line.generate(grid.segments());
    let style = &options.style;
    canvas.append(
        SvgElement::new("path")
            .attr("class", style.class.as_str())
            .attr("stroke", style.stroke.as_str())
            .attr("stroke-width", fmt_attr(style.stroke_width))
            .attr("fill", style.fill.as_str())
            .attr("d", d.as_str()),
    );
    appended += 1;

    if options.include_neighborhoods {
        canvas.append(neighborhood_group(grid, &scales, options.neighborhood_radius));
        appended += 1;
    }

    RenderSummary {
        segment_count: grid.segments().len(),
        appended,
        path_d: d,
    }
}

/// Lattice overlays are skipped above this many cells along either axis.
pub const MAX_LATTICE_CELLS: u32 = 1000;

/// Cell boundary lines at `x = i·dx` for `i in 0..=nx` and `y = j·dy` for `j in 0..=ny`.
///
/// `None` when the grid exceeds [`MAX_LATTICE_CELLS`] along either axis.
fn lattice_path(grid: &Grid, scales: &MeshScales) -> Option<SvgElement> {
    if grid.nx > MAX_LATTICE_CELLS || grid.ny > MAX_LATTICE_CELLS {
        tracing::warn!(
            nx = grid.nx,
            ny = grid.ny,
            limit = MAX_LATTICE_CELLS,
            "grid too large for a lattice overlay; skipping it"
        );
        return None;
    }

    let width = f64::from(grid.nx) * grid.dx;
    let height = f64::from(grid.ny) * grid.dy;
    let mut path = PathBuilder::with_capacity(2 * (grid.nx as usize + grid.ny as usize + 2));
    for i in 0..=grid.nx {
        let x = f64::from(i) * grid.dx;
        let from = scales.project(x, 0.0);
        let to = scales.project(x, height);
        path.move_to(from.x, from.y);
        path.line_to(to.x, to.y);
    }
    for j in 0..=grid.ny {
        let y = f64::from(j) * grid.dy;
        let from = scales.project(0.0, y);
        let to = scales.project(width, y);
        path.move_to(from.x, from.y);
        path.line_to(to.x, to.y);
    }
    Some(
        SvgElement::new("path")
            .attr("class", "lattice")
            .attr("stroke", "#ccc")
            .attr("stroke-width", "0.5")
            .attr("fill", "none")
            .attr("d", path.finish()),
    )
}

fn neighborhood_group(grid: &Grid, scales: &MeshScales, radius: f64) -> SvgElement {
    let mut group = SvgElement::new("g").attr("class", "neighborhoods");
    for n in &grid.u_neighborhoods {
        let c = scales.project(n.p.x, n.p.y);
        let mut circle = SvgElement::new("circle")
            .attr("cx", fmt_path(c.x))
            .attr("cy", fmt_path(c.y))
            .attr("r", fmt_attr(radius))
            .attr("fill", "red");
        if !n.p.is_boundary() {
            circle = circle.attr("data-variable", n.p.variable.as_str());
        }
        group = group.child(circle);
    }
    group
}
