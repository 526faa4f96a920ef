//! Bottom-edge targets and aim point hit testing.

use crate::{
    aim::AimPoint,
    config::TargetConfig,
    constants::TARGET_COUNT,
    geometry::{distance_2d, CanvasSize},
};
use serde::{Deserialize, Serialize};

/// Fixed target positions, in layout order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSlot {
    BottomCenter,
    BottomRight,
    BottomLeft,
}

impl TargetSlot {
    pub const ALL: [Self; TARGET_COUNT] = [Self::BottomCenter, Self::BottomRight, Self::BottomLeft];

    /// Position of this slot in the target array
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::BottomCenter => 0,
            Self::BottomRight => 1,
            Self::BottomLeft => 2,
        }
    }
}

/// A circular target in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub slot: TargetSlot,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub hit: bool,
}

impl Target {
    /// Strict containment: a point exactly on the rim is outside
    #[must_use]
    pub fn contains(&self, point: AimPoint) -> bool {
        distance_2d(point.x, point.y, self.x, self.y) < self.radius
    }
}

/// Lays out the targets for a canvas
#[derive(Debug, Clone)]
pub struct TargetLayout {
    config: TargetConfig,
}

impl TargetLayout {
    #[must_use]
    pub const fn new(config: TargetConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn radius(&self, canvas: CanvasSize) -> f64 {
        canvas.width * self.config.radius_ratio
    }

    /// Target positions with `hit` cleared
    #[must_use]
    pub fn targets(&self, canvas: CanvasSize) -> [Target; TARGET_COUNT] {
        let radius = self.radius(canvas);
        let y = canvas.height - radius - self.config.bottom_offset;

        TargetSlot::ALL.map(|slot| {
            let x = match slot {
                TargetSlot::BottomCenter => canvas.width / 2.0,
                TargetSlot::BottomRight => canvas.width - self.config.margin,
                TargetSlot::BottomLeft => self.config.margin,
            };
            Target {
                slot,
                x,
                y,
                radius,
                hit: false,
            }
        })
    }

    /// Target positions with `hit` set for those containing `point`
    #[must_use]
    pub fn targets_and_hits(&self, canvas: CanvasSize, point: AimPoint) -> [Target; TARGET_COUNT] {
        self.targets(canvas).map(|target| Target {
            hit: target.contains(point),
            ..target
        })
    }
}
