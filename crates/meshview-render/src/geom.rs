pub type Unit = euclid::UnknownUnit;

/// A projected vertex in canvas pixel space.
pub type Point = euclid::Point2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}
