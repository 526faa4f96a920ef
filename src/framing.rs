//! Framing evaluation: is the face centred and at a usable distance?
//!
//! Every decision derives from one signed distance per axis compared
//! against a threshold. The symmetric `is_*_framed` flags and the directional
//! `is_too_*` projections are two views of the same comparison.

use crate::{
    config::FramingConfig,
    geometry::{centroid, x_extent, CanvasSize},
    landmarks::Landmark,
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// Framing decision for one frame; all distances in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramingVerdict {
    pub is_x_framed: bool,
    pub is_y_framed: bool,
    pub is_z_framed: bool,
    pub is_framed: bool,
    /// Landmark centroid
    pub avg_x: f64,
    pub avg_y: f64,
    /// Signed centroid offset from the framing centre
    pub center_dist_x: f64,
    pub center_dist_y: f64,
    /// Head width, used as a proxy for distance to the camera
    pub extreme_dist_x: f64,
    pub min_dist: f64,
    pub max_dist: f64,
    pub x_threshold: f64,
    pub y_threshold: f64,
}

/// Whether the head is at an acceptable distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Depth {
    /// Head too narrow on screen
    TooFar,
    /// Head too wide on screen
    TooClose,
    InRange,
}

impl FramingVerdict {
    #[must_use]
    pub fn is_too_left(&self) -> bool {
        self.center_dist_x <= -self.x_threshold
    }

    #[must_use]
    pub fn is_too_right(&self) -> bool {
        self.center_dist_x >= self.x_threshold
    }

    #[must_use]
    pub fn is_too_high(&self) -> bool {
        self.center_dist_y <= -self.y_threshold
    }

    #[must_use]
    pub fn is_too_low(&self) -> bool {
        self.center_dist_y >= self.y_threshold
    }

    #[must_use]
    pub fn depth(&self) -> Depth {
        if self.is_z_framed {
            Depth::InRange
        } else if self.extreme_dist_x <= self.min_dist {
            Depth::TooFar
        } else {
            Depth::TooClose
        }
    }

    /// All numeric fields finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [
            self.avg_x,
            self.avg_y,
            self.center_dist_x,
            self.center_dist_y,
            self.extreme_dist_x,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Stateless framing evaluator
#[derive(Debug, Clone)]
pub struct FramingEvaluator {
    config: FramingConfig,
}

impl FramingEvaluator {
    #[must_use]
    pub fn new(config: FramingConfig) -> Self {
        log::info!(
            "Initializing FramingEvaluator: depth band {:.2}-{:.2} of width, centre y at {:.3} of height",
            config.min_dist_ratio,
            config.max_dist_ratio,
            config.center_y_ratio
        );
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &FramingConfig {
        &self.config
    }

    /// Evaluate framing of a full landmark set
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the landmark set is empty
    pub fn evaluate(&self, landmarks: &[Landmark], canvas: CanvasSize) -> Result<FramingVerdict> {
        let (avg_x, avg_y) =
            centroid(landmarks, canvas).ok_or_else(|| Error::InvalidInput("Empty landmark set".to_string()))?;
        let (min_x, max_x) =
            x_extent(landmarks, canvas).ok_or_else(|| Error::InvalidInput("Empty landmark set".to_string()))?;

        let center_dist_x = avg_x - canvas.width / 2.0;
        let center_dist_y = avg_y - canvas.height * self.config.center_y_ratio;
        let extreme_dist_x = max_x - min_x;

        let min_dist = canvas.width * self.config.min_dist_ratio;
        let max_dist = canvas.width * self.config.max_dist_ratio;
        let x_threshold = canvas.width * self.config.x_threshold_ratio;
        let y_threshold = canvas.height * self.config.y_threshold_ratio;

        let is_x_framed = center_dist_x.abs() < x_threshold;
        let is_y_framed = center_dist_y.abs() < y_threshold;
        let is_z_framed = extreme_dist_x > min_dist && extreme_dist_x < max_dist;

        Ok(FramingVerdict {
            is_x_framed,
            is_y_framed,
            is_z_framed,
            is_framed: is_x_framed && is_y_framed && is_z_framed,
            avg_x,
            avg_y,
            center_dist_x,
            center_dist_y,
            extreme_dist_x,
            min_dist,
            max_dist,
            x_threshold,
            y_threshold,
        })
    }
}
