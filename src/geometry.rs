//! Vector math and landmark-set geometry.

use crate::landmarks::Landmark;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Scale a vector to unit length.
///
/// A zero-length input yields non-finite components; callers check
/// [`is_finite`] before using the result.
#[must_use]
pub fn normalize(v: &Vector3<f64>) -> Vector3<f64> {
    let length = (v.x * v.x + v.y * v.y + v.z * v.z).sqrt();
    Vector3::new(v.x / length, v.y / length, v.z / length)
}

#[must_use]
pub fn is_finite(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Orthonormal-ish facial frame built from eyes, nose and mouth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacialBasis {
    /// Interocular direction, right eye to left eye
    pub x_axis: Vector3<f64>,
    /// Nose to mouth
    pub y_axis: Vector3<f64>,
    /// Facial normal
    pub z_axis: Vector3<f64>,
}

impl FacialBasis {
    #[must_use]
    pub fn from_landmarks(left_eye: &Landmark, right_eye: &Landmark, nose: &Landmark, mouth: &Landmark) -> Self {
        let eyes = left_eye.to_vector() - right_eye.to_vector();
        let nose_mouth = mouth.to_vector() - nose.to_vector();
        let normal = eyes.cross(&nose_mouth);

        Self {
            x_axis: normalize(&eyes),
            y_axis: normalize(&nose_mouth),
            z_axis: normalize(&normal),
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        is_finite(&self.x_axis) && is_finite(&self.y_axis) && is_finite(&self.z_axis)
    }

    /// Axes as matrix columns `[x y z]`
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&[self.x_axis, self.y_axis, self.z_axis])
    }
}

/// Mean landmark position in canvas pixels, `None` for an empty set
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn centroid(landmarks: &[Landmark], canvas: CanvasSize) -> Option<(f64, f64)> {
    if landmarks.is_empty() {
        return None;
    }
    let (sum_x, sum_y) = landmarks.iter().fold((0.0, 0.0), |(sx, sy), l| {
        let (x, y) = l.to_canvas(canvas);
        (sx + x, sy + y)
    });
    let n = landmarks.len() as f64;
    Some((sum_x / n, sum_y / n))
}

/// Horizontal `(min, max)` in canvas pixels
#[must_use]
pub fn x_extent(landmarks: &[Landmark], canvas: CanvasSize) -> Option<(f64, f64)> {
    extent(landmarks.iter().map(|l| l.x * canvas.width))
}

/// Vertical `(min, max)` in canvas pixels
#[must_use]
pub fn y_extent(landmarks: &[Landmark], canvas: CanvasSize) -> Option<(f64, f64)> {
    extent(landmarks.iter().map(|l| l.y * canvas.height))
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
    })
}

#[must_use]
pub fn distance_2d(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x1 - x2).hypot(y1 - y2)
}
