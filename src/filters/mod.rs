//! Temporal filters for smoothing the aim point.
//!
//! The raw aim point jitters with detector noise; a filter instance carries
//! the cross-frame state and belongs to exactly one session.

/// Exponential moving average, the default smoother
pub mod exponential;

/// Moving average filter over a fixed window
pub mod moving_average;

use crate::{
    constants::{DEFAULT_MOVING_AVERAGE_WINDOW, DEFAULT_SMOOTHING_ALPHA, EXPONENTIAL_ALPHA_MAX, EXPONENTIAL_ALPHA_MIN},
    Error, Result,
};

/// Trait for all aim point filters
pub trait PointFilter: Send + Sync {
    /// Apply filter to a new raw point
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64);

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl PointFilter for NoFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Smoother families known to the factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    None,
    Exponential,
    MovingAverage,
}

impl FilterKind {
    /// Resolve a filter name, case-insensitively and with aliases
    ///
    /// # Errors
    ///
    /// Returns `Error::FilterError` for an unknown name
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "none" | "nofilter" => Ok(Self::None),
            "exponential" | "ema" => Ok(Self::Exponential),
            "moving_average" | "movingaverage" => Ok(Self::MovingAverage),
            _ => Err(Error::FilterError(format!("Unknown filter type: {name}"))),
        }
    }
}

/// Split a `name[:parameter]` description
#[must_use]
pub fn split_description(description: &str) -> (&str, Option<&str>) {
    match description.trim().split_once(':') {
        Some((name, param)) => (name, Some(param.trim())),
        None => (description.trim(), None),
    }
}

/// Create a point filter from a `name[:parameter]` description
///
/// Accepted forms: `none`, `exponential`, `exponential:<alpha>`,
/// `moving_average`, `moving_average:<window>`. Names are case-insensitive;
/// `ema` and `movingaverage` are aliases.
///
/// # Errors
///
/// Returns `Error::FilterError` for unknown names or invalid parameters
pub fn create_filter(description: &str) -> Result<Box<dyn PointFilter>> {
    let (name, param) = split_description(description);

    match FilterKind::from_name(name)? {
        FilterKind::None => Ok(Box::new(NoFilter)),
        FilterKind::Exponential => {
            let alpha = match param {
                Some(p) => p
                    .parse::<f64>()
                    .map_err(|_| Error::FilterError(format!("Invalid alpha '{p}'")))?,
                None => DEFAULT_SMOOTHING_ALPHA,
            };
            exponential_filter(alpha)
        }
        FilterKind::MovingAverage => {
            let window = match param {
                Some(p) => p
                    .parse::<usize>()
                    .map_err(|_| Error::FilterError(format!("Invalid window size '{p}'")))?,
                None => DEFAULT_MOVING_AVERAGE_WINDOW,
            };
            moving_average_filter(window)
        }
    }
}

/// Exponential filter with a checked alpha
///
/// # Errors
///
/// Returns `Error::FilterError` if alpha is outside `(0, 1]`
pub fn exponential_filter(alpha: f64) -> Result<Box<dyn PointFilter>> {
    validate_alpha(alpha)?;
    Ok(Box::new(exponential::ExponentialFilter::new(alpha)))
}

/// Moving average filter with a checked window
///
/// # Errors
///
/// Returns `Error::FilterError` for a zero window
pub fn moving_average_filter(window: usize) -> Result<Box<dyn PointFilter>> {
    if window == 0 {
        return Err(Error::FilterError("Window size must be greater than 0".to_string()));
    }
    Ok(Box::new(moving_average::MovingAverageFilter::new(window)))
}

/// Check that an exponential smoothing factor lies in `(0, 1]`
///
/// # Errors
///
/// Returns `Error::FilterError` when it does not
pub fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > EXPONENTIAL_ALPHA_MIN && alpha <= EXPONENTIAL_ALPHA_MAX {
        Ok(())
    } else {
        Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")))
    }
}
