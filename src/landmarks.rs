//! Typed face landmarks and key-point lookup.
//!
//! The external detector delivers a dense face mesh in normalized image
//! coordinates. Only four points drive pose estimation; their mesh indices
//! are configuration, not literals at call sites.

use crate::{
    constants::{LEFT_EYE_INDEX, MOUTH_INDEX, NOSE_INDEX, RIGHT_EYE_INDEX},
    geometry::CanvasSize,
    Error, Result,
};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A detected facial keypoint.
///
/// `x` and `y` are normalized to `[0, 1]` relative to frame width and height.
/// `z` is detector-relative depth and defaults to zero when absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Landmark as a 3D vector in detector space
    #[must_use]
    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Landmark position in canvas pixels
    #[must_use]
    pub fn to_canvas(&self, canvas: CanvasSize) -> (f64, f64) {
        (self.x * canvas.width, self.y * canvas.height)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Mesh indices of the landmarks used for pose estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkIndices {
    /// Left eye (iris centre)
    pub left_eye: usize,

    /// Right eye (iris centre)
    pub right_eye: usize,

    /// Nose tip, also the anchor of the aim line
    pub nose: usize,

    /// Mouth
    pub mouth: usize,
}

impl Default for LandmarkIndices {
    fn default() -> Self {
        Self {
            left_eye: LEFT_EYE_INDEX,
            right_eye: RIGHT_EYE_INDEX,
            nose: NOSE_INDEX,
            mouth: MOUTH_INDEX,
        }
    }
}

impl LandmarkIndices {
    /// Smallest landmark count that contains every configured index
    #[must_use]
    pub fn required_len(&self) -> usize {
        self.left_eye.max(self.right_eye).max(self.nose).max(self.mouth) + 1
    }

    /// Validate that the four indices are distinct
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if two roles share an index
    pub fn validate(&self) -> Result<()> {
        let indices = [self.left_eye, self.right_eye, self.nose, self.mouth];
        for (i, a) in indices.iter().enumerate() {
            if indices[i + 1..].contains(a) {
                return Err(Error::ConfigError(format!(
                    "Landmark index {a} is assigned to more than one role"
                )));
            }
        }
        Ok(())
    }
}

/// The four landmarks that define the facial basis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyLandmarks {
    pub left_eye: Landmark,
    pub right_eye: Landmark,
    pub nose: Landmark,
    pub mouth: Landmark,
}

impl KeyLandmarks {
    /// Look up the key landmarks in a face mesh.
    ///
    /// Returns `None` if any configured index is out of range.
    #[must_use]
    pub fn select(landmarks: &[Landmark], indices: &LandmarkIndices) -> Option<Self> {
        Some(Self {
            left_eye: *landmarks.get(indices.left_eye)?,
            right_eye: *landmarks.get(indices.right_eye)?,
            nose: *landmarks.get(indices.nose)?,
            mouth: *landmarks.get(indices.mouth)?,
        })
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.left_eye.is_finite() && self.right_eye.is_finite() && self.nose.is_finite() && self.mouth.is_finite()
    }
}
