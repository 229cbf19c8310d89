//! D3-style line generator: accessor functions project each datum to a vertex and a [`Curve`]
//! turns the vertices into path data.

use crate::curve::Curve;
use crate::geom::{Point, point};
use crate::path::PathBuilder;

type Accessor<'a, T> = Box<dyn Fn(&T) -> f64 + 'a>;
type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;

pub struct LineGenerator<'a, T> {
    x: Accessor<'a, T>,
    y: Accessor<'a, T>,
    defined: Option<Predicate<'a, T>>,
    curve: Curve,
}

impl<T> std::fmt::Debug for LineGenerator<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineGenerator")
            .field("curve", &self.curve)
            .field("defined", &self.defined.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a, T> LineGenerator<'a, T> {
    /// Creates a generator with a linear curve, like `d3.line().x(x).y(y)`.
    pub fn new(x: impl Fn(&T) -> f64 + 'a, y: impl Fn(&T) -> f64 + 'a) -> Self {
        Self {
            x: Box::new(x),
            y: Box::new(y),
            defined: None,
            curve: Curve::Linear,
        }
    }

    pub fn curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Data for which `defined` returns false break the line into separate runs.
    pub fn defined(mut self, defined: impl Fn(&T) -> bool + 'a) -> Self {
        self.defined = Some(Box::new(defined));
        self
    }

    pub fn current_curve(&self) -> Curve {
        self.curve
    }

    /// Projects the data into contiguous runs of defined vertices.
    pub fn runs(&self, data: &[T]) -> Vec<Vec<Point>> {
        let mut runs = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        for d in data {
            let is_defined = self.defined.as_ref().is_none_or(|f| f(d));
            if is_defined {
                current.push(point((self.x)(d), (self.y)(d)));
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    /// Path data for `data`; empty when no datum is defined.
    pub fn generate(&self, data: &[T]) -> String {
        let mut path = PathBuilder::with_capacity(data.len());
        for run in self.runs(data) {
            self.curve.write_run(&run, &mut path);
        }
        path.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_projects_through_accessors() {
        let data = [(0.0, 0.0), (1.0, 2.0), (2.0, 4.0)];
        let line = LineGenerator::new(|d: &(f64, f64)| d.0 * 10.0, |d: &(f64, f64)| 100.0 - d.1);
        assert_eq!(line.generate(&data), "M0,100L10,98L20,96");
    }

    #[test]
    fn closed_curve_appends_close_command() {
        let data = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)];
        let line = LineGenerator::new(|d: &(f64, f64)| d.0, |d: &(f64, f64)| d.1)
            .curve(Curve::LinearClosed);
        assert_eq!(line.generate(&data), "M0,0L1,0L1,1Z");
    }

    #[test]
    fn undefined_data_split_the_line() {
        let data = [1.0, 2.0, f64::NAN, 4.0, 5.0];
        let line = LineGenerator::new(|d: &f64| *d, |d: &f64| *d).defined(|d: &f64| !d.is_nan());
        assert_eq!(line.runs(&data).len(), 2);
        assert_eq!(line.generate(&data), "M1,1L2,2M4,4L5,5");
    }

    #[test]
    fn empty_data_produce_empty_path() {
        let line = LineGenerator::new(|d: &f64| *d, |d: &f64| *d).curve(Curve::LinearClosed);
        assert_eq!(line.generate(&[]), "");
    }
}
