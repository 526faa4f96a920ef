use crate::{
    geometry::{is_finite, FacialBasis},
    landmarks::KeyLandmarks,
    Error, Result,
};
use log::debug;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Head orientation for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseEstimate {
    /// Degrees, including the calibration offset
    pub pitch: f64,
    /// Degrees
    pub yaw: f64,
    /// Degrees
    pub roll: f64,
    /// Unit facial normal
    pub forward: Vector3<f64>,
}

/// Head pose estimator working directly on face mesh landmarks
#[derive(Debug, Clone, Copy)]
pub struct PoseEstimator {
    pitch_offset: f64,
}

impl PoseEstimator {
    /// Create a new pose estimator
    ///
    /// `pitch_offset` (degrees) is added to the extracted pitch to cancel
    /// the detector's head-up bias.
    #[must_use]
    pub fn new(pitch_offset: f64) -> Self {
        log::info!("Initializing PoseEstimator with pitch offset {pitch_offset}°");
        Self { pitch_offset }
    }

    /// Estimate head pose from the four key landmarks
    ///
    /// # Errors
    ///
    /// Returns `Error::DegenerateGeometry` if the landmarks are coincident or
    /// collinear so that any axis of the facial basis has zero length
    pub fn estimate(&self, keys: &KeyLandmarks) -> Result<PoseEstimate> {
        if !keys.is_finite() {
            return Err(Error::DegenerateGeometry("Key landmark has non-finite coordinates".to_string()));
        }

        let basis = FacialBasis::from_landmarks(&keys.left_eye, &keys.right_eye, &keys.nose, &keys.mouth);
        if !basis.is_finite() {
            return Err(Error::DegenerateGeometry(
                "Zero-length axis in facial basis".to_string(),
            ));
        }

        let angles = Self::basis_to_euler(&basis.to_matrix());
        if !is_finite(&angles) {
            return Err(Error::DegenerateGeometry(format!("Non-finite Euler angles: {angles:?}")));
        }

        let pose = PoseEstimate {
            pitch: angles[0] + self.pitch_offset,
            yaw: angles[1],
            roll: angles[2],
            forward: basis.z_axis,
        };
        debug!(
            "Pose: pitch {:.2}°, yaw {:.2}°, roll {:.2}°",
            pose.pitch, pose.yaw, pose.roll
        );
        Ok(pose)
    }

    /// Convert a basis matrix (axes as columns) to Euler angles in degrees
    ///
    /// Yaw-pitch-roll (Y-X-Z) convention, returned as `[pitch, yaw, roll]`
    /// without any calibration offset.
    #[must_use]
    pub fn basis_to_euler(basis: &Matrix3<f64>) -> Vector3<f64> {
        let r13 = basis[(0, 2)];
        let r21 = basis[(1, 0)];
        let r22 = basis[(1, 1)];
        let r23 = basis[(1, 2)];
        let r33 = basis[(2, 2)];

        // Rounding can push |r23| marginally past 1
        let pitch = (-r23).clamp(-1.0, 1.0).asin();
        let yaw = r13.atan2(r33);
        let roll = r21.atan2(r22);

        Vector3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
    }

    #[must_use]
    pub const fn pitch_offset(&self) -> f64 {
        self.pitch_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;

    fn frontal_keys() -> KeyLandmarks {
        KeyLandmarks {
            left_eye: Landmark::new(0.6, 0.4, 0.0),
            right_eye: Landmark::new(0.4, 0.4, 0.0),
            nose: Landmark::new(0.5, 0.5, 0.0),
            mouth: Landmark::new(0.5, 0.6, 0.0),
        }
    }

    #[test]
    fn test_euler_angle_conversion() {
        let angles = PoseEstimator::basis_to_euler(&Matrix3::identity());

        assert!((angles[0]).abs() < 1e-6);
        assert!((angles[1]).abs() < 1e-6);
        assert!((angles[2]).abs() < 1e-6);
    }

    #[test]
    fn test_frontal_pose_applies_offset() {
        let estimator = PoseEstimator::new(30.0);
        let pose = estimator.estimate(&frontal_keys()).unwrap();

        assert!((pose.pitch - 30.0).abs() < 1e-9);
        assert!(pose.yaw.abs() < 1e-9);
        assert!(pose.roll.abs() < 1e-9);
        assert!((pose.forward.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_turned_head_has_yaw() {
        let mut keys = frontal_keys();
        // Left eye recedes: the face turns about the vertical axis
        keys.left_eye.z = 0.1;
        let pose = PoseEstimator::new(0.0).estimate(&keys).unwrap();

        assert!(pose.yaw.abs() > 1.0);
        assert!((pose.forward.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_tilted_head_has_roll() {
        let mut keys = frontal_keys();
        keys.left_eye.y = 0.45;
        let pose = PoseEstimator::new(0.0).estimate(&keys).unwrap();
        assert!(pose.roll > 1.0);
    }

    #[test]
    fn test_degenerate_landmarks() {
        let mut keys = frontal_keys();
        keys.left_eye = keys.right_eye;
        let result = PoseEstimator::new(30.0).estimate(&keys);
        assert!(matches!(result, Err(Error::DegenerateGeometry(_))));

        let mut keys = frontal_keys();
        keys.mouth.x = f64::NAN;
        assert!(PoseEstimator::new(30.0).estimate(&keys).is_err());
    }
}
