//! Constants used throughout the library

/// Face mesh index of the left eye (iris centre)
pub const LEFT_EYE_INDEX: usize = 468;

/// Face mesh index of the right eye (iris centre)
pub const RIGHT_EYE_INDEX: usize = 473;

/// Face mesh index of the nose tip
pub const NOSE_INDEX: usize = 1;

/// Face mesh index of the upper inner lip
pub const MOUTH_INDEX: usize = 13;

/// Pitch calibration offset in degrees, corrects the detector's head-up bias
pub const DEFAULT_PITCH_OFFSET_DEG: f64 = 30.0;

/// Vertical bias subtracted from the forward vector before projection
pub const DEFAULT_AIM_Y_BIAS: f64 = 0.5;

/// Aim line length as a multiple of canvas width
pub const DEFAULT_AIM_LINE_LENGTH_RATIO: f64 = 1.0;

/// Default filter parameters
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.2;
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 5;

/// Framing thresholds as fractions of canvas width/height
pub const DEFAULT_MIN_DIST_RATIO: f64 = 0.47;
pub const DEFAULT_MAX_DIST_RATIO: f64 = 0.55;
pub const DEFAULT_X_THRESHOLD_RATIO: f64 = 0.10;
pub const DEFAULT_Y_THRESHOLD_RATIO: f64 = 0.10;

/// Vertical framing centre as a fraction of canvas height
pub const DEFAULT_CENTER_Y_RATIO: f64 = 0.5;

/// Target geometry
pub const DEFAULT_TARGET_RADIUS_RATIO: f64 = 0.15;
pub const DEFAULT_TARGET_MARGIN: f64 = 80.0;
pub const DEFAULT_TARGET_BOTTOM_OFFSET: f64 = 20.0;

/// Number of targets laid out along the bottom edge
pub const TARGET_COUNT: usize = 3;

/// Continuous hold needed to complete a workflow step
pub const DEFAULT_REQUIRED_HOLD_MS: u64 = 1000;

/// Oval head guide geometry
pub const DEFAULT_OVAL_CENTER_Y_RATIO: f64 = 0.45;
pub const DEFAULT_OVAL_RADIUS_RATIO: f64 = 0.30;

/// Exponential filter bounds
pub const EXPONENTIAL_ALPHA_MIN: f64 = 0.0;
pub const EXPONENTIAL_ALPHA_MAX: f64 = 1.0;
