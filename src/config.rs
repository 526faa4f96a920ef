//! Configuration management for the face framing guide

use crate::{
    constants::{
        DEFAULT_AIM_LINE_LENGTH_RATIO, DEFAULT_AIM_Y_BIAS, DEFAULT_CENTER_Y_RATIO, DEFAULT_MAX_DIST_RATIO,
        DEFAULT_MIN_DIST_RATIO, DEFAULT_MOVING_AVERAGE_WINDOW, DEFAULT_OVAL_CENTER_Y_RATIO, DEFAULT_OVAL_RADIUS_RATIO,
        DEFAULT_PITCH_OFFSET_DEG, DEFAULT_REQUIRED_HOLD_MS, DEFAULT_SMOOTHING_ALPHA, DEFAULT_TARGET_BOTTOM_OFFSET,
        DEFAULT_TARGET_MARGIN, DEFAULT_TARGET_RADIUS_RATIO, DEFAULT_X_THRESHOLD_RATIO, DEFAULT_Y_THRESHOLD_RATIO,
    },
    filters::{exponential_filter, moving_average_filter, split_description, FilterKind, NoFilter, PointFilter},
    landmarks::LandmarkIndices,
    targets::TargetSlot,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mesh indices of the key landmarks
    pub landmarks: LandmarkIndices,

    /// Pose estimation configuration
    pub pose: PoseConfig,

    /// Aim point projection and smoothing
    pub aim: AimConfig,

    /// Framing thresholds
    pub framing: FramingConfig,

    /// Target layout
    pub targets: TargetConfig,

    /// Workflow steps and hold time
    pub workflow: WorkflowConfig,

    /// Oval head guide
    pub guide: GuideConfig,
}

/// Pose estimation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Degrees added to the extracted pitch
    pub pitch_offset_deg: f64,
}

/// Aim point configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    /// Subtracted from the forward vector's vertical component
    pub y_bias: f64,

    /// Aim line length as a multiple of canvas width
    pub line_length_ratio: f64,

    /// Smoothing filter type (exponential, moving_average, none; case-insensitive,
    /// `ema` and `movingaverage` accepted)
    pub filter: String,

    /// Exponential filter alpha value
    pub smoothing_alpha: f64,

    /// Moving average window size
    pub moving_average_window: usize,
}

/// Framing thresholds, as fractions of canvas width or height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Head width must exceed this fraction of canvas width
    pub min_dist_ratio: f64,

    /// Head width must stay below this fraction of canvas width
    pub max_dist_ratio: f64,

    /// Horizontal centring tolerance (fraction of width)
    pub x_threshold_ratio: f64,

    /// Vertical centring tolerance (fraction of height)
    pub y_threshold_ratio: f64,

    /// Vertical framing centre (fraction of height)
    pub center_y_ratio: f64,
}

/// Target layout parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Target radius as a fraction of canvas width
    pub radius_ratio: f64,

    /// Horizontal inset of the side targets in pixels
    pub margin: f64,

    /// Gap between target rim and canvas bottom in pixels
    pub bottom_offset: f64,
}

/// One workflow step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Prompt shown to the user
    pub name: String,

    /// Target to hold
    pub target: TargetSlot,
}

/// Workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Continuous hold needed per step, in milliseconds
    pub required_hold_ms: u64,

    /// Steps in order
    pub steps: Vec<WorkflowStep>,
}

/// Oval head guide geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Oval centre (fraction of height)
    pub oval_center_y_ratio: f64,

    /// Oval radii (fraction of width and height)
    pub oval_radius_ratio: f64,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            pitch_offset_deg: DEFAULT_PITCH_OFFSET_DEG,
        }
    }
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            y_bias: DEFAULT_AIM_Y_BIAS,
            line_length_ratio: DEFAULT_AIM_LINE_LENGTH_RATIO,
            filter: "exponential".to_string(),
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
        }
    }
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            min_dist_ratio: DEFAULT_MIN_DIST_RATIO,
            max_dist_ratio: DEFAULT_MAX_DIST_RATIO,
            x_threshold_ratio: DEFAULT_X_THRESHOLD_RATIO,
            y_threshold_ratio: DEFAULT_Y_THRESHOLD_RATIO,
            center_y_ratio: DEFAULT_CENTER_Y_RATIO,
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            radius_ratio: DEFAULT_TARGET_RADIUS_RATIO,
            margin: DEFAULT_TARGET_MARGIN,
            bottom_offset: DEFAULT_TARGET_BOTTOM_OFFSET,
        }
    }
}

impl Default for WorkflowConfig {
    /// Middle, then the subject's left, then the subject's right.
    ///
    /// Canvas coordinates follow the unmirrored camera frame, so the
    /// subject's left is the right-hand target.
    fn default() -> Self {
        Self {
            required_hold_ms: DEFAULT_REQUIRED_HOLD_MS,
            steps: vec![
                WorkflowStep {
                    name: "middle".to_string(),
                    target: TargetSlot::BottomCenter,
                },
                WorkflowStep {
                    name: "left".to_string(),
                    target: TargetSlot::BottomRight,
                },
                WorkflowStep {
                    name: "right".to_string(),
                    target: TargetSlot::BottomLeft,
                },
            ],
        }
    }
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            oval_center_y_ratio: DEFAULT_OVAL_CENTER_Y_RATIO,
            oval_radius_ratio: DEFAULT_OVAL_RADIUS_RATIO,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Create the aim point filter from configuration
    ///
    /// The filter name may use any alias accepted by
    /// [`FilterKind::from_name`]. Parameters always come from
    /// `aim.smoothing_alpha` and `aim.moving_average_window`; a
    /// `name:param` suffix is rejected.
    ///
    /// # Errors
    ///
    /// Returns `Error::FilterError` for an unknown filter type or invalid parameters
    pub fn create_filter(&self) -> Result<Box<dyn PointFilter>> {
        let (name, param) = split_description(&self.aim.filter);
        if let Some(param) = param {
            return Err(Error::FilterError(format!(
                "Filter parameter '{param}' in '{}' is not allowed here; set aim.smoothing_alpha or aim.moving_average_window",
                self.aim.filter
            )));
        }

        match FilterKind::from_name(name)? {
            FilterKind::None => Ok(Box::new(NoFilter)),
            FilterKind::Exponential => exponential_filter(self.aim.smoothing_alpha),
            FilterKind::MovingAverage => moving_average_filter(self.aim.moving_average_window),
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        self.landmarks.validate()?;

        let finite = [
            ("pose.pitch_offset_deg", self.pose.pitch_offset_deg),
            ("aim.y_bias", self.aim.y_bias),
            ("aim.line_length_ratio", self.aim.line_length_ratio),
            ("framing.min_dist_ratio", self.framing.min_dist_ratio),
            ("framing.max_dist_ratio", self.framing.max_dist_ratio),
            ("framing.x_threshold_ratio", self.framing.x_threshold_ratio),
            ("framing.y_threshold_ratio", self.framing.y_threshold_ratio),
            ("framing.center_y_ratio", self.framing.center_y_ratio),
            ("targets.radius_ratio", self.targets.radius_ratio),
            ("targets.margin", self.targets.margin),
            ("targets.bottom_offset", self.targets.bottom_offset),
            ("guide.oval_center_y_ratio", self.guide.oval_center_y_ratio),
            ("guide.oval_radius_ratio", self.guide.oval_radius_ratio),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::ConfigError(format!("{name} must be finite, got {value}")));
            }
        }

        // Validate aim and smoothing
        if self.aim.line_length_ratio <= 0.0 {
            return Err(Error::ConfigError("Aim line length ratio must be greater than 0".to_string()));
        }
        self.create_filter()
            .map_err(|e| Error::ConfigError(format!("Invalid smoothing filter: {e}")))?;

        // Validate framing thresholds
        if self.framing.min_dist_ratio < 0.0 {
            return Err(Error::ConfigError("Minimum head width ratio must not be negative".to_string()));
        }
        if self.framing.min_dist_ratio >= self.framing.max_dist_ratio {
            return Err(Error::ConfigError(format!(
                "Minimum head width ratio ({}) must be below maximum ({})",
                self.framing.min_dist_ratio, self.framing.max_dist_ratio
            )));
        }
        if self.framing.x_threshold_ratio <= 0.0 || self.framing.y_threshold_ratio <= 0.0 {
            return Err(Error::ConfigError("Centring thresholds must be greater than 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.framing.center_y_ratio) {
            return Err(Error::ConfigError(
                "Vertical framing centre must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Validate targets
        if self.targets.radius_ratio <= 0.0 {
            return Err(Error::ConfigError("Target radius ratio must be greater than 0".to_string()));
        }
        if self.targets.margin < 0.0 || self.targets.bottom_offset < 0.0 {
            return Err(Error::ConfigError(
                "Target margin and bottom offset must not be negative".to_string(),
            ));
        }

        // Validate workflow
        if self.workflow.required_hold_ms == 0 {
            return Err(Error::ConfigError("Required hold time must be greater than 0".to_string()));
        }
        if self.workflow.steps.is_empty() {
            return Err(Error::ConfigError("Workflow needs at least one step".to_string()));
        }

        if self.guide.oval_radius_ratio <= 0.0 {
            return Err(Error::ConfigError("Oval radius ratio must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face Framing Guide Configuration

# Face mesh indices of the key landmarks (refined 478-point mesh)
landmarks:
  left_eye: 468
  right_eye: 473
  nose: 1
  mouth: 13

# Pose estimation
pose:
  pitch_offset_deg: 30.0

# Aim point projection and smoothing
aim:
  y_bias: 0.5
  line_length_ratio: 1.0
  filter: "exponential"
  smoothing_alpha: 0.2
  moving_average_window: 5

# Framing thresholds (fractions of canvas width / height)
framing:
  min_dist_ratio: 0.47
  max_dist_ratio: 0.55
  x_threshold_ratio: 0.10
  y_threshold_ratio: 0.10
  center_y_ratio: 0.5

# Target layout
targets:
  radius_ratio: 0.15
  margin: 80.0
  bottom_offset: 20.0

# Workflow
workflow:
  required_hold_ms: 1000
  steps:
    - name: "middle"
      target: bottom_center
    - name: "left"
      target: bottom_right
    - name: "right"
      target: bottom_left

# Oval head guide
guide:
  oval_center_y_ratio: 0.45
  oval_radius_ratio: 0.30
"#;
