use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One line element of the mesh.
///
/// Only the start point takes part in rendering; the end point is carried when the server sends
/// it so that `inspect` output round-trips the response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub a: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<Point>,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b: Some(b) }
    }

    pub fn starting_at(a: Point) -> Self {
        Self { a, b: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    pub segments: Vec<Segment>,
}

/// A control point of the staggered grid: a position plus the unknown it stands for.
///
/// An empty `variable` marks a boundary point (a constant term rather than an unknown).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub phi: f64,
    pub variable: String,
}

impl ControlPoint {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_boundary(&self) -> bool {
        self.variable.is_empty()
    }
}

/// The control volume around one u-cell. Face and oblique-neighbor data sent by the server is
/// not modelled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighborhood {
    pub volume: f64,
    pub p: ControlPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub nx: u32,
    pub ny: u32,
    pub dx: f64,
    pub dy: f64,
    pub mesh: Mesh,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub u_neighborhoods: Vec<Neighborhood>,
}

impl Grid {
    pub fn new(nx: u32, ny: u32, dx: f64, dy: f64, segments: Vec<Segment>) -> Self {
        Self {
            nx,
            ny,
            dx,
            dy,
            mesh: Mesh { segments },
            u_neighborhoods: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.mesh.segments
    }

    /// Horizontal extent padded by `padding_cells` cells on both sides: `[-p·dx, nx + p·dx]`.
    ///
    /// The upper bound adds a cell size to a cell count; viewers of this server have always
    /// framed the mesh this way.
    pub fn x_extent(&self, padding_cells: f64) -> (f64, f64) {
        let pad = padding_cells * self.dx;
        (-pad, f64::from(self.nx) + pad)
    }

    /// Vertical extent padded by `padding_cells` cells on both sides: `[-p·dy, ny + p·dy]`.
    pub fn y_extent(&self, padding_cells: f64) -> (f64, f64) {
        let pad = padding_cells * self.dy;
        (-pad, f64::from(self.ny) + pad)
    }
}
