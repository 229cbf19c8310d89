//! Continuous linear scales (D3 `scaleLinear` semantics).

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Maps a domain value to the range.
    ///
    /// Endpoints are exact: `scale(d0) == r0` and `scale(d1) == r1`. A degenerate domain maps
    /// every input to the middle of the range.
    pub fn scale(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return r0 + (r1 - r0) * 0.5;
        }
        interpolate(r0, r1, (v - d0) / (d1 - d0))
    }
}

fn interpolate(a: f64, b: f64, t: f64) -> f64 {
    // `a * (1 - t) + b * t` keeps both endpoints exact, unlike `a + t * (b - a)`.
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_exact_at_endpoints() {
        let x = LinearScale::new((-2.0, 12.0), (0.0, 500.0));
        assert_eq!(x.scale(-2.0), 0.0);
        assert_eq!(x.scale(12.0), 500.0);
        assert_eq!(x.scale(5.0), 250.0);
    }

    #[test]
    fn inverted_range_flips_the_axis() {
        let y = LinearScale::new((-2.0, 12.0), (500.0, 0.0));
        assert_eq!(y.scale(-2.0), 500.0);
        assert_eq!(y.scale(12.0), 0.0);
        assert!(y.scale(10.0) < y.scale(0.0));
    }

    #[test]
    fn scale_extrapolates_outside_the_domain() {
        let x = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert_eq!(x.scale(20.0), 200.0);
        assert_eq!(x.scale(-5.0), -50.0);
    }

    #[test]
    fn degenerate_domain_maps_to_range_midpoint() {
        let x = LinearScale::new((3.0, 3.0), (0.0, 500.0));
        assert_eq!(x.scale(3.0), 250.0);
        assert_eq!(x.scale(-100.0), 250.0);
    }
}
