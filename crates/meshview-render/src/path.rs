use crate::fmt::fmt_path_into;

/// Accumulates SVG path data the way `d3-path` serializes it (`M0,0L1,1Z`).
#[derive(Debug, Default, Clone)]
pub struct PathBuilder {
    out: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(points: usize) -> Self {
        Self {
            out: String::with_capacity(points.saturating_mul(24)),
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.cmd_pair('M', x, y);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.cmd_pair('L', x, y);
    }

    pub fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.out.push('C');
        for (i, v) in [x1, y1, x2, y2, x, y].into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            fmt_path_into(&mut self.out, v);
        }
    }

    pub fn close_path(&mut self) {
        if !self.out.is_empty() {
            self.out.push('Z');
        }
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn cmd_pair(&mut self, cmd: char, x: f64, y: f64) {
        self.out.push(cmd);
        fmt_path_into(&mut self.out, x);
        self.out.push(',');
        fmt_path_into(&mut self.out, y);
    }
}
