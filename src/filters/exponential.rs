use super::PointFilter;

/// Exponential smoothing filter
///
/// `s = alpha * raw + (1 - alpha) * s_prev`, seeded with the first raw point.
/// Evaluated as `s_prev + alpha * (raw - s_prev)` so a steady input is
/// reproduced exactly.
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<(f64, f64)>,
}

impl ExponentialFilter {
    /// Create a new exponential filter
    ///
    /// # Panics
    ///
    /// Panics if alpha is not in the range (0, 1]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self { alpha, last: None }
    }

    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl PointFilter for ExponentialFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        let filtered = match self.last {
            Some((last_x, last_y)) => (
                self.alpha.mul_add(x - last_x, last_x),
                self.alpha.mul_add(y - last_y, last_y),
            ),
            None => (x, y),
        };

        self.last = Some(filtered);

        filtered
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}
