//! Per-session framing pipeline.
//!
//! A [`FramingSession`] owns every piece of state that survives between
//! frames: the aim point filter and the workflow. Sessions are independent,
//! so several can run side by side.

use crate::{
    aim::{AimLine, AimPoint, AimProjector},
    config::Config,
    filters::PointFilter,
    framing::{FramingEvaluator, FramingVerdict},
    geometry::CanvasSize,
    guidance::{derive_guidance, Guidance, OvalGuide},
    landmarks::{KeyLandmarks, Landmark, LandmarkIndices},
    pose_estimation::{PoseEstimate, PoseEstimator},
    targets::{Target, TargetLayout},
    workflow::{WorkflowSnapshot, WorkflowState},
    Error, Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why a frame produced no report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoSubjectReason {
    /// Detector found no face; workflow and smoothing were reset
    NoFace,
    /// A configured key landmark index is missing from the mesh
    MissingLandmarks,
    /// Landmarks collapsed or produced non-finite results
    DegenerateGeometry,
    /// Canvas dimensions are not positive and finite
    InvalidCanvas,
}

/// Everything computed for a tracked frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub pose: PoseEstimate,
    pub aim_line: AimLine,
    pub smoothed_aim: AimPoint,
    pub framing: FramingVerdict,
    pub targets: Vec<Target>,
    pub workflow: WorkflowSnapshot,
    pub guidance: Guidance,
}

/// Result of processing one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOutcome {
    Tracked(Box<FrameReport>),
    NoSubject(NoSubjectReason),
}

impl FrameOutcome {
    #[must_use]
    pub fn report(&self) -> Option<&FrameReport> {
        match self {
            Self::Tracked(report) => Some(report.as_ref()),
            Self::NoSubject(_) => None,
        }
    }

    #[must_use]
    pub fn guidance(&self) -> Guidance {
        match self {
            Self::Tracked(report) => report.guidance.clone(),
            Self::NoSubject(_) => Guidance::NoSubject,
        }
    }
}

/// One face-framing session
pub struct FramingSession {
    config: Config,
    indices: LandmarkIndices,
    pose_estimator: PoseEstimator,
    projector: AimProjector,
    aim_filter: Box<dyn PointFilter>,
    framing: FramingEvaluator,
    target_layout: TargetLayout,
    workflow: WorkflowState,
}

impl FramingSession {
    /// Create a new session
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the configuration is invalid
    pub fn new(config: Config) -> Result<Self> {
        info!("Initializing framing session");
        config.validate()?;

        let aim_filter = config.create_filter()?;
        info!("Aim point smoothing with {}", aim_filter.name());

        Ok(Self {
            indices: config.landmarks,
            pose_estimator: PoseEstimator::new(config.pose.pitch_offset_deg),
            projector: AimProjector::new(config.aim.y_bias, config.aim.line_length_ratio),
            aim_filter,
            framing: FramingEvaluator::new(config.framing.clone()),
            target_layout: TargetLayout::new(config.targets.clone()),
            workflow: WorkflowState::new(&config.workflow)?,
            config,
        })
    }

    /// Process one frame
    ///
    /// `landmarks` is the first detected face, or `None` when the detector
    /// found nothing. `now` is the frame time on the caller's session clock.
    pub fn process_frame(&mut self, landmarks: Option<&[Landmark]>, canvas: CanvasSize, now: Duration) -> FrameOutcome {
        let landmarks = match landmarks {
            Some(l) if !l.is_empty() => l,
            _ => {
                debug!("No face at {now:?}, resetting workflow and smoothing");
                self.reset();
                return FrameOutcome::NoSubject(NoSubjectReason::NoFace);
            }
        };

        if !canvas.is_valid() {
            warn!("Skipping frame with invalid canvas {}x{}", canvas.width, canvas.height);
            return FrameOutcome::NoSubject(NoSubjectReason::InvalidCanvas);
        }

        let Some(keys) = KeyLandmarks::select(landmarks, &self.indices) else {
            warn!(
                "Skipping frame: {} landmarks, key indices need {}",
                landmarks.len(),
                self.indices.required_len()
            );
            return FrameOutcome::NoSubject(NoSubjectReason::MissingLandmarks);
        };

        match self.track(landmarks, &keys, canvas, now) {
            Ok(report) => FrameOutcome::Tracked(Box::new(report)),
            Err(e) => {
                warn!("Skipping frame: {e}");
                FrameOutcome::NoSubject(NoSubjectReason::DegenerateGeometry)
            }
        }
    }

    /// Run the pipeline on validated input
    ///
    /// Everything that can fail is checked before the filter or workflow
    /// are touched, so a bad frame leaves session state unchanged.
    fn track(&mut self, landmarks: &[Landmark], keys: &KeyLandmarks, canvas: CanvasSize, now: Duration) -> Result<FrameReport> {
        let pose = self.pose_estimator.estimate(keys)?;

        let aim_line = self.projector.project(&keys.nose, &pose.forward, canvas);
        if !aim_line.end.is_finite() || !aim_line.anchor.is_finite() {
            return Err(Error::DegenerateGeometry(format!("Non-finite aim point {:?}", aim_line.end)));
        }

        let framing = self.framing.evaluate(landmarks, canvas)?;
        if !framing.is_finite() {
            return Err(Error::DegenerateGeometry("Non-finite framing values".to_string()));
        }

        let (smoothed_x, smoothed_y) = self.aim_filter.apply(aim_line.end.x, aim_line.end.y);
        let smoothed_aim = AimPoint::new(smoothed_x, smoothed_y);

        let targets = self.target_layout.targets_and_hits(canvas, smoothed_aim);
        self.workflow.update(&targets, now);

        let guidance = derive_guidance(&framing, &self.workflow);
        debug!(
            "Frame {now:?}: framed={} aim=({:.1}, {:.1}) step={} {}",
            framing.is_framed,
            smoothed_aim.x,
            smoothed_aim.y,
            self.workflow.current_step(),
            guidance
        );

        Ok(FrameReport {
            pose,
            aim_line,
            smoothed_aim,
            framing,
            targets: targets.to_vec(),
            workflow: self.workflow.snapshot(),
            guidance,
        })
    }

    /// Restart the workflow and smoothing, as on an explicit reset
    pub fn reset(&mut self) {
        self.workflow.reset();
        self.aim_filter.reset();
    }

    /// Head guide geometry for a canvas
    #[must_use]
    pub fn oval_guide(&self, canvas: CanvasSize) -> OvalGuide {
        OvalGuide::for_canvas(canvas, &self.config.guide)
    }

    #[must_use]
    pub const fn workflow(&self) -> &WorkflowState {
        &self.workflow
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn filter_name(&self) -> &str {
        self.aim_filter.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_mesh_config() -> Config {
        let mut config = Config::default();
        config.landmarks = LandmarkIndices {
            left_eye: 0,
            right_eye: 1,
            nose: 2,
            mouth: 3,
        };
        config
    }

    fn frontal_mesh() -> Vec<Landmark> {
        vec![
            Landmark::new(0.6, 0.45, 0.0),
            Landmark::new(0.4, 0.45, 0.0),
            Landmark::new(0.5, 0.5, 0.0),
            Landmark::new(0.5, 0.6, 0.0),
            Landmark::new(0.25, 0.5, 0.0),
            Landmark::new(0.75, 0.5, 0.0),
        ]
    }

    #[test]
    fn test_tracked_frame() {
        let mut session = FramingSession::new(small_mesh_config()).unwrap();
        let outcome = session.process_frame(Some(&frontal_mesh()), CanvasSize::new(640.0, 480.0), Duration::ZERO);

        let report = outcome.report().unwrap();
        assert_eq!(report.targets.len(), 3);
        assert!((report.pose.forward.norm() - 1.0).abs() < 1e-6);
        // First frame seeds the filter
        assert_eq!(report.smoothed_aim, report.aim_line.end);
    }

    #[test]
    fn test_no_face_resets_workflow() {
        let mut session = FramingSession::new(small_mesh_config()).unwrap();
        let outcome = session.process_frame(None, CanvasSize::new(640.0, 480.0), Duration::ZERO);
        assert_eq!(outcome, FrameOutcome::NoSubject(NoSubjectReason::NoFace));
        assert_eq!(outcome.guidance(), Guidance::NoSubject);

        let outcome = session.process_frame(Some(&[]), CanvasSize::new(640.0, 480.0), Duration::ZERO);
        assert_eq!(outcome, FrameOutcome::NoSubject(NoSubjectReason::NoFace));
    }

    #[test]
    fn test_missing_landmarks() {
        let mut session = FramingSession::new(Config::default()).unwrap();
        let outcome = session.process_frame(Some(&frontal_mesh()), CanvasSize::new(640.0, 480.0), Duration::ZERO);
        assert_eq!(outcome, FrameOutcome::NoSubject(NoSubjectReason::MissingLandmarks));
    }

    #[test]
    fn test_degenerate_and_invalid_canvas() {
        let mut session = FramingSession::new(small_mesh_config()).unwrap();
        let mut mesh = frontal_mesh();
        mesh[0] = mesh[1];
        let outcome = session.process_frame(Some(&mesh), CanvasSize::new(640.0, 480.0), Duration::ZERO);
        assert_eq!(outcome, FrameOutcome::NoSubject(NoSubjectReason::DegenerateGeometry));

        let outcome = session.process_frame(Some(&frontal_mesh()), CanvasSize::new(0.0, 480.0), Duration::ZERO);
        assert_eq!(outcome, FrameOutcome::NoSubject(NoSubjectReason::InvalidCanvas));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = Config::default();
        config.framing.min_dist_ratio = 0.9;
        assert!(FramingSession::new(config).is_err());
    }

    #[test]
    fn test_oval_guide_from_config() {
        let session = FramingSession::new(Config::default()).unwrap();
        let oval = session.oval_guide(CanvasSize::new(100.0, 100.0));
        assert_eq!(oval.center_x, 50.0);
        assert_eq!(session.filter_name(), "ExponentialFilter");
    }
}
