//! Aim-point projection.
//!
//! The facial normal is drawn as a line from the nose tip; its end point is
//! the on-screen pointer the user steers with their head.

use crate::{geometry::CanvasSize, landmarks::Landmark};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A point on the canvas, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimPoint {
    pub x: f64,
    pub y: f64,
}

impl AimPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Nose-anchored aim line for one frame, before smoothing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimLine {
    /// Nose tip in canvas pixels
    pub anchor: AimPoint,
    /// Raw aim point
    pub end: AimPoint,
}

/// Projects the facial normal onto the canvas
#[derive(Debug, Clone, Copy)]
pub struct AimProjector {
    y_bias: f64,
    line_length_ratio: f64,
}

impl AimProjector {
    /// `y_bias` is subtracted from the vertical component of the forward
    /// vector; `line_length_ratio` scales the line by canvas width.
    #[must_use]
    pub const fn new(y_bias: f64, line_length_ratio: f64) -> Self {
        Self {
            y_bias,
            line_length_ratio,
        }
    }

    #[must_use]
    pub fn line_length(&self, canvas: CanvasSize) -> f64 {
        canvas.width * self.line_length_ratio
    }

    /// Project `forward` from the nose tip
    #[must_use]
    pub fn project(&self, nose: &Landmark, forward: &Vector3<f64>, canvas: CanvasSize) -> AimLine {
        let length = self.line_length(canvas);
        let (anchor_x, anchor_y) = nose.to_canvas(canvas);

        AimLine {
            anchor: AimPoint::new(anchor_x, anchor_y),
            end: AimPoint::new(
                forward.x.mul_add(length, anchor_x),
                (forward.y - self.y_bias).mul_add(length, anchor_y),
            ),
        }
    }
}
