//! User guidance derived from framing and workflow state.
//!
//! The renderer turns these into alerts, arrows and prompts; nothing here
//! draws.

use crate::{
    config::GuideConfig,
    framing::{Depth, FramingVerdict},
    geometry::CanvasSize,
    workflow::WorkflowState,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arrow direction, pointing where the user should move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Highest-priority hint for the current frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guidance {
    NoSubject,
    MoveCloser,
    MoveBack,
    Reposition {
        horizontal: Option<Direction>,
        vertical: Option<Direction>,
    },
    Step {
        index: usize,
        total: usize,
        name: String,
        /// Present only while a hold is in progress
        progress_percent: Option<u32>,
    },
    Complete,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self {
            Self::Left => "←",
            Self::Right => "→",
            Self::Up => "↑",
            Self::Down => "↓",
        };
        f.write_str(arrow)
    }
}

impl fmt::Display for Guidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSubject => write!(f, "No face detected"),
            Self::MoveCloser => write!(f, "Move closer"),
            Self::MoveBack => write!(f, "Move back"),
            Self::Reposition { horizontal, vertical } => {
                write!(f, "Move")?;
                for direction in horizontal.iter().chain(vertical.iter()) {
                    write!(f, " {direction}")?;
                }
                Ok(())
            }
            Self::Step {
                index,
                total,
                name,
                progress_percent: Some(progress),
            } => write!(f, "Step {}/{total}: {name} ({progress}%)", index + 1),
            Self::Step {
                index,
                total,
                name,
                progress_percent: None,
            } => write!(f, "Step {}/{total}: {name}", index + 1),
            Self::Complete => write!(f, "Workflow complete"),
        }
    }
}

/// Pick the hint to show for a tracked frame
///
/// Distance problems come first, then centring, then the workflow prompt.
#[must_use]
pub fn derive_guidance(verdict: &FramingVerdict, workflow: &WorkflowState) -> Guidance {
    match verdict.depth() {
        Depth::TooFar => return Guidance::MoveCloser,
        Depth::TooClose => return Guidance::MoveBack,
        Depth::InRange => {}
    }

    let horizontal = if verdict.is_too_right() {
        Some(Direction::Left)
    } else if verdict.is_too_left() {
        Some(Direction::Right)
    } else {
        None
    };
    let vertical = if verdict.is_too_low() {
        Some(Direction::Up)
    } else if verdict.is_too_high() {
        Some(Direction::Down)
    } else {
        None
    };
    if horizontal.is_some() || vertical.is_some() {
        return Guidance::Reposition { horizontal, vertical };
    }

    if workflow.is_complete() {
        return Guidance::Complete;
    }

    Guidance::Step {
        index: workflow.current_step(),
        total: workflow.steps().len(),
        name: workflow.current_step_name().to_string(),
        progress_percent: workflow.is_holding().then(|| workflow.hold_progress_percent()),
    }
}

/// Elliptical head guide drawn over the preview
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvalGuide {
    pub center_x: f64,
    pub center_y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl OvalGuide {
    #[must_use]
    pub fn for_canvas(canvas: CanvasSize, config: &GuideConfig) -> Self {
        Self {
            center_x: canvas.width / 2.0,
            center_y: canvas.height * config.oval_center_y_ratio,
            radius_x: canvas.width * config.oval_radius_ratio,
            radius_y: canvas.height * config.oval_radius_ratio,
        }
    }

    /// Point lies inside or on the ellipse
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = (x - self.center_x) / self.radius_x;
        let dy = (y - self.center_y) / self.radius_y;
        dx.mul_add(dx, dy * dy) <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{FramingConfig, WorkflowConfig},
        framing::FramingEvaluator,
        landmarks::Landmark,
        targets::{Target, TargetSlot},
    };
    use std::time::Duration;

    fn verdict(center_x: f64, center_y: f64, width: f64) -> FramingVerdict {
        let half = width / 2.0;
        let landmarks = [
            Landmark::new(center_x - half, center_y, 0.0),
            Landmark::new(center_x + half, center_y, 0.0),
        ];
        FramingEvaluator::new(FramingConfig::default())
            .evaluate(&landmarks, CanvasSize::new(1000.0, 1000.0))
            .unwrap()
    }

    fn workflow() -> WorkflowState {
        WorkflowState::new(&WorkflowConfig::default()).unwrap()
    }

    #[test]
    fn test_depth_has_priority() {
        // Off-centre and too far: distance wins
        assert_eq!(derive_guidance(&verdict(0.9, 0.5, 0.2), &workflow()), Guidance::MoveCloser);
        assert_eq!(derive_guidance(&verdict(0.5, 0.5, 0.8), &workflow()), Guidance::MoveBack);
    }

    #[test]
    fn test_reposition_arrows() {
        let guidance = derive_guidance(&verdict(0.7, 0.8, 0.5), &workflow());
        assert_eq!(
            guidance,
            Guidance::Reposition {
                horizontal: Some(Direction::Left),
                vertical: Some(Direction::Up),
            }
        );
        assert_eq!(guidance.to_string(), "Move ← ↑");

        let guidance = derive_guidance(&verdict(0.3, 0.5, 0.5), &workflow());
        assert_eq!(
            guidance,
            Guidance::Reposition {
                horizontal: Some(Direction::Right),
                vertical: None,
            }
        );
    }

    #[test]
    fn test_step_prompt_with_progress() {
        let framed = verdict(0.5, 0.5, 0.5);
        let mut state = workflow();
        assert_eq!(derive_guidance(&framed, &state).to_string(), "Step 1/3: middle");

        let targets: Vec<Target> = TargetSlot::ALL
            .iter()
            .map(|&slot| Target {
                slot,
                x: 0.0,
                y: 0.0,
                radius: 1.0,
                hit: slot == TargetSlot::BottomCenter,
            })
            .collect();
        state.update(&targets, Duration::from_millis(0));
        state.update(&targets, Duration::from_millis(400));
        assert_eq!(derive_guidance(&framed, &state).to_string(), "Step 1/3: middle (40%)");
    }

    #[test]
    fn test_oval_guide() {
        let oval = OvalGuide::for_canvas(CanvasSize::new(640.0, 480.0), &GuideConfig::default());
        assert_eq!(oval.center_x, 320.0);
        assert!((oval.center_y - 216.0).abs() < 1e-9);
        assert!((oval.radius_x - 192.0).abs() < 1e-9);
        assert!(oval.contains(320.0, 216.0));
        assert!(!oval.contains(0.0, 0.0));
    }
}
