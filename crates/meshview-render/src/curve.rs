//! Curve factories for [`LineGenerator`](crate::line::LineGenerator), ported from d3-shape v3.
//!
//! A curve receives one contiguous run of projected points and writes path commands for it. The
//! emitted command sequences follow d3-shape exactly so output can be diffed against a browser
//! rendering of the same data.

use crate::geom::Point;
use crate::path::PathBuilder;
use crate::{Error, Result};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Curve {
    Linear,
    /// Polyline whose last point connects back to the first.
    #[default]
    LinearClosed,
    Basis,
    BasisClosed,
    Cardinal {
        tension: f64,
    },
    Natural,
    Step,
    StepBefore,
    StepAfter,
    MonotoneX,
    MonotoneY,
}

impl Curve {
    pub const NAMES: &'static [&'static str] = &[
        "linear",
        "linearClosed",
        "basis",
        "basisClosed",
        "cardinal",
        "natural",
        "step",
        "stepBefore",
        "stepAfter",
        "monotoneX",
        "monotoneY",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Curve::Linear => "linear",
            Curve::LinearClosed => "linearClosed",
            Curve::Basis => "basis",
            Curve::BasisClosed => "basisClosed",
            Curve::Cardinal { .. } => "cardinal",
            Curve::Natural => "natural",
            Curve::Step => "step",
            Curve::StepBefore => "stepBefore",
            Curve::StepAfter => "stepAfter",
            Curve::MonotoneX => "monotoneX",
            Curve::MonotoneY => "monotoneY",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Curve::LinearClosed | Curve::BasisClosed)
    }

    /// Writes one run of points. Empty runs write nothing.
    pub fn write_run(&self, points: &[Point], path: &mut PathBuilder) {
        if points.is_empty() {
            return;
        }
        match *self {
            Curve::Linear => linear(points, path),
            Curve::LinearClosed => {
                linear(points, path);
                path.close_path();
            }
            Curve::Basis => basis(points, path),
            Curve::BasisClosed => basis_closed(points, path),
            Curve::Cardinal { tension } => cardinal(points, tension, path),
            Curve::Natural => natural(points, path),
            Curve::Step => step(points, 0.5, path),
            Curve::StepBefore => step(points, 0.0, path),
            Curve::StepAfter => step(points, 1.0, path),
            Curve::MonotoneX => monotone(points, false, path),
            Curve::MonotoneY => monotone(points, true, path),
        }
    }

    pub fn path_d(&self, points: &[Point]) -> String {
        let mut path = PathBuilder::with_capacity(points.len());
        self.write_run(points, &mut path);
        path.finish()
    }
}

impl FromStr for Curve {
    type Err = Error;

    /// Accepts d3 names with or without the `curve` prefix (`linearClosed`, `curveBasis`).
    /// Cardinal takes an optional tension: `cardinal(0.5)`.
    fn from_str(s: &str) -> Result<Self> {
        let unknown = || Error::UnknownCurve {
            name: s.to_string(),
        };
        let trimmed = s.trim();
        let bare = trimmed.strip_prefix("curve").unwrap_or(trimmed);
        let key = bare.to_ascii_lowercase();
        if let Some(arg) = key
            .strip_prefix("cardinal(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let tension = arg
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|t| t.is_finite())
                .ok_or_else(unknown)?;
            return Ok(Curve::Cardinal { tension });
        }
        let curve = match key.as_str() {
            "linear" => Curve::Linear,
            "linearclosed" => Curve::LinearClosed,
            "basis" => Curve::Basis,
            "basisclosed" => Curve::BasisClosed,
            "cardinal" => Curve::Cardinal { tension: 0.0 },
            "natural" => Curve::Natural,
            "step" => Curve::Step,
            "stepbefore" => Curve::StepBefore,
            "stepafter" => Curve::StepAfter,
            "monotonex" => Curve::MonotoneX,
            "monotoney" => Curve::MonotoneY,
            _ => return Err(unknown()),
        };
        Ok(curve)
    }
}

fn linear(points: &[Point], path: &mut PathBuilder) {
    let first = points[0];
    path.move_to(first.x, first.y);
    for p in &points[1..] {
        path.line_to(p.x, p.y);
    }
}

fn basis_point(path: &mut PathBuilder, p0: Point, p1: Point, p: Point) {
    path.bezier_curve_to(
        (2.0 * p0.x + p1.x) / 3.0,
        (2.0 * p0.y + p1.y) / 3.0,
        (p0.x + 2.0 * p1.x) / 3.0,
        (p0.y + 2.0 * p1.y) / 3.0,
        (p0.x + 4.0 * p1.x + p.x) / 6.0,
        (p0.y + 4.0 * p1.y + p.y) / 6.0,
    );
}

fn basis(points: &[Point], path: &mut PathBuilder) {
    let first = points[0];
    path.move_to(first.x, first.y);
    match points.len() {
        1 => {}
        2 => path.line_to(points[1].x, points[1].y),
        n => {
            let (p0, p1) = (points[0], points[1]);
            path.line_to((5.0 * p0.x + p1.x) / 6.0, (5.0 * p0.y + p1.y) / 6.0);
            for w in points.windows(3) {
                basis_point(path, w[0], w[1], w[2]);
            }
            let (a, b) = (points[n - 2], points[n - 1]);
            basis_point(path, a, b, b);
            path.line_to(b.x, b.y);
        }
    }
}

fn basis_closed(points: &[Point], path: &mut PathBuilder) {
    match points {
        [a] => {
            path.move_to(a.x, a.y);
            path.close_path();
        }
        [a, b] => {
            path.move_to((a.x + 2.0 * b.x) / 3.0, (a.y + 2.0 * b.y) / 3.0);
            path.line_to((b.x + 2.0 * a.x) / 3.0, (b.y + 2.0 * a.y) / 3.0);
            path.close_path();
        }
        _ => {
            // The first three points are replayed after the last one to close the spline.
            let (a, b, c) = (points[0], points[1], points[2]);
            path.move_to(
                (a.x + 4.0 * b.x + c.x) / 6.0,
                (a.y + 4.0 * b.y + c.y) / 6.0,
            );
            let wrapped: Vec<Point> = points[1..].iter().chain([a, b, c].iter()).copied().collect();
            for w in wrapped.windows(3) {
                basis_point(path, w[0], w[1], w[2]);
            }
        }
    }
}

fn cardinal(points: &[Point], tension: f64, path: &mut PathBuilder) {
    let k = (1.0 - tension) / 6.0;
    let segment = |path: &mut PathBuilder, p0: Point, p1: Point, p2: Point, p: Point| {
        path.bezier_curve_to(
            p1.x + k * (p2.x - p0.x),
            p1.y + k * (p2.y - p0.y),
            p2.x + k * (p1.x - p.x),
            p2.y + k * (p1.y - p.y),
            p2.x,
            p2.y,
        );
    };

    let first = points[0];
    path.move_to(first.x, first.y);
    match points.len() {
        1 => {}
        2 => path.line_to(points[1].x, points[1].y),
        n => {
            // The second point doubles as the phantom predecessor of the first segment.
            segment(path, points[1], points[0], points[1], points[2]);
            for w in points.windows(4) {
                segment(path, w[0], w[1], w[2], w[3]);
            }
            segment(path, points[n - 3], points[n - 2], points[n - 1], points[n - 2]);
        }
    }
}

fn natural(points: &[Point], path: &mut PathBuilder) {
    fn control_points(v: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let n = v.len() - 1;
        let mut a = vec![0.0; n];
        let mut b = vec![0.0; n];
        let mut r = vec![0.0; n];
        b[0] = 2.0;
        r[0] = v[0] + 2.0 * v[1];
        for i in 1..n.saturating_sub(1) {
            a[i] = 1.0;
            b[i] = 4.0;
            r[i] = 4.0 * v[i] + 2.0 * v[i + 1];
        }
        a[n - 1] = 2.0;
        b[n - 1] = 7.0;
        r[n - 1] = 8.0 * v[n - 1] + v[n];
        for i in 1..n {
            let m = a[i] / b[i - 1];
            b[i] -= m;
            r[i] -= m * r[i - 1];
        }
        a[n - 1] = r[n - 1] / b[n - 1];
        for i in (0..n - 1).rev() {
            a[i] = (r[i] - a[i + 1]) / b[i];
        }
        b[n - 1] = (v[n] + a[n - 1]) / 2.0;
        for i in 0..n - 1 {
            b[i] = 2.0 * v[i + 1] - a[i + 1];
        }
        (a, b)
    }

    let first = points[0];
    path.move_to(first.x, first.y);
    match points.len() {
        1 => {}
        2 => path.line_to(points[1].x, points[1].y),
        _ => {
            let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
            let (x1, x2) = control_points(&xs);
            let (y1, y2) = control_points(&ys);
            for (i, p) in points[1..].iter().enumerate() {
                path.bezier_curve_to(x1[i], y1[i], x2[i], y2[i], p.x, p.y);
            }
        }
    }
}

fn step(points: &[Point], t: f64, path: &mut PathBuilder) {
    let first = points[0];
    path.move_to(first.x, first.y);
    let mut prev = first;
    for &p in &points[1..] {
        if t <= 0.0 {
            path.line_to(prev.x, p.y);
            path.line_to(p.x, p.y);
        } else {
            let x1 = prev.x * (1.0 - t) + p.x * t;
            path.line_to(x1, prev.y);
            path.line_to(x1, p.y);
        }
        prev = p;
    }
    if 0.0 < t && t < 1.0 && points.len() > 1 {
        path.line_to(prev.x, prev.y);
    }
}

fn monotone(points: &[Point], swap_xy: bool, path: &mut PathBuilder) {
    fn sign(v: f64) -> f64 {
        if v < 0.0 { -1.0 } else { 1.0 }
    }

    // JS `h0 || (h1 < 0 && -0)`: keep the sign of the neighbouring interval on zero width.
    fn signed_width(h: f64, other: f64) -> f64 {
        if h != 0.0 {
            h
        } else if other < 0.0 {
            -0.0
        } else {
            0.0
        }
    }

    fn slope3(p0: Point, p1: Point, p2: Point) -> f64 {
        let h0 = p1.x - p0.x;
        let h1 = p2.x - p1.x;
        let s0 = (p1.y - p0.y) / signed_width(h0, h1);
        let s1 = (p2.y - p1.y) / signed_width(h1, h0);
        let p = (s0 * h1 + s1 * h0) / (h0 + h1);
        let v = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
        if v.is_finite() { v } else { 0.0 }
    }

    fn slope2(p0: Point, p1: Point, t: f64) -> f64 {
        let h = p1.x - p0.x;
        if h != 0.0 {
            (3.0 * (p1.y - p0.y) / h - t) / 2.0
        } else {
            t
        }
    }

    let emit = |path: &mut PathBuilder, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64| {
        if swap_xy {
            path.bezier_curve_to(y1, x1, y2, x2, y, x);
        } else {
            path.bezier_curve_to(x1, y1, x2, y2, x, y);
        }
    };
    let hermite = |path: &mut PathBuilder, p0: Point, p1: Point, t0: f64, t1: f64| {
        let dx = (p1.x - p0.x) / 3.0;
        emit(path, p0.x + dx, p0.y + dx * t0, p1.x - dx, p1.y - dx * t1, p1.x, p1.y);
    };

    // Work in the monotone coordinate system; coincident consecutive points are dropped.
    let mut pts: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        let q = if swap_xy {
            Point::new(p.y, p.x)
        } else {
            *p
        };
        if pts.last() != Some(&q) {
            pts.push(q);
        }
    }

    let first = pts[0];
    if swap_xy {
        path.move_to(first.y, first.x);
    } else {
        path.move_to(first.x, first.y);
    }

    match pts.len() {
        1 => {}
        2 => {
            let last = pts[1];
            if swap_xy {
                path.line_to(last.y, last.x);
            } else {
                path.line_to(last.x, last.y);
            }
        }
        n => {
            let mut t0 = f64::NAN;
            for i in 2..n {
                let t1 = slope3(pts[i - 2], pts[i - 1], pts[i]);
                if i == 2 {
                    t0 = slope2(pts[0], pts[1], t1);
                }
                hermite(path, pts[i - 2], pts[i - 1], t0, t1);
                t0 = t1;
            }
            let t1 = slope2(pts[n - 2], pts[n - 1], t0);
            hermite(path, pts[n - 2], pts[n - 1], t0, t1);
        }
    }
}
