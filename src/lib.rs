//! Face framing guide library for capture applications.
//!
//! Given the dense face mesh produced by an external landmark detector, this
//! library works out where the user's head is pointing and whether the face
//! is well framed, then drives a short "look at each target" workflow:
//! - Head pose from four key landmarks (eyes, nose, mouth)
//! - Aim point projection with configurable smoothing filters
//! - Framing checks for distance and centring against canvas-relative thresholds
//! - Target hit testing and a hold-to-confirm workflow
//! - User guidance derived from the above
//!
//! The pipeline for one frame is:
//! 1. Select the key landmarks and build the facial basis
//! 2. Extract pitch, yaw and roll and the forward vector
//! 3. Project the aim line from the nose and smooth its end point
//! 4. Evaluate framing over the whole mesh
//! 5. Hit test the targets and advance the workflow
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use face_framing_guide::{
//!     config::Config,
//!     geometry::CanvasSize,
//!     landmarks::Landmark,
//!     session::{FrameOutcome, FramingSession},
//! };
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = FramingSession::new(Config::default())?;
//! let canvas = CanvasSize::new(640.0, 480.0);
//!
//! // 478-point mesh from the detector, normalized coordinates
//! let mesh: Vec<Landmark> = vec![Landmark::new(0.5, 0.5, 0.0); 478];
//!
//! match session.process_frame(Some(&mesh), canvas, Duration::from_millis(33)) {
//!     FrameOutcome::Tracked(report) => {
//!         println!("Pitch: {:.2}°, Yaw: {:.2}°", report.pose.pitch, report.pose.yaw);
//!         println!("{}", report.guidance);
//!     }
//!     FrameOutcome::NoSubject(reason) => println!("Skipped: {reason:?}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Filters
//!
//! ```no_run
//! use face_framing_guide::filters::create_filter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut filter = create_filter("exponential:0.2")?;
//!
//! let smoothed = filter.apply(320.0, 400.0);
//! println!("Smoothed aim: ({:.1}, {:.1})", smoothed.0, smoothed.1);
//!
//! filter.reset();
//! # Ok(())
//! # }
//! ```

/// Vector math and landmark-set geometry
pub mod geometry;

/// Typed landmarks and key landmark selection
pub mod landmarks;

/// Head pose estimation from the facial basis
pub mod pose_estimation;

/// Aim line projection
pub mod aim;

/// Signal filtering algorithms for smoothing the aim point
pub mod filters;

/// Framing evaluation against distance and centring thresholds
pub mod framing;

/// Target layout and hit testing
pub mod targets;

/// Hold-to-confirm workflow
pub mod workflow;

/// User guidance and the oval head guide
pub mod guidance;

/// Per-session pipeline
pub mod session;

/// Recorded sessions for offline replay
pub mod replay;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
