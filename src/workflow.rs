//! Sequential "hold the pointer on the target" workflow.
//!
//! Each step names a target slot. The aim point must stay on that target
//! for the required hold time; leaving it for a single frame restarts the
//! hold. After the last step the workflow is complete and ignores input
//! until reset.

use crate::{
    config::{WorkflowConfig, WorkflowStep},
    targets::Target,
    Error, Result,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Progress through the configured steps
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    steps: Vec<WorkflowStep>,
    current_step: usize,
    completed_steps: Vec<bool>,
    is_complete: bool,
    hold_start: Option<Duration>,
    hold_duration: Duration,
    required_hold: Duration,
}

/// Serializable view of a [`WorkflowState`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub current_step: usize,
    pub step_name: String,
    pub completed_steps: Vec<bool>,
    pub is_complete: bool,
    pub hold_ms: u64,
    pub progress_percent: u32,
}

impl WorkflowState {
    /// Create the initial state for a step list
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` for an empty step list or a zero hold time
    pub fn new(config: &WorkflowConfig) -> Result<Self> {
        if config.steps.is_empty() {
            return Err(Error::ConfigError("Workflow needs at least one step".to_string()));
        }
        if config.required_hold_ms == 0 {
            return Err(Error::ConfigError("Required hold time must be greater than 0".to_string()));
        }

        Ok(Self {
            steps: config.steps.clone(),
            current_step: 0,
            completed_steps: vec![false; config.steps.len()],
            is_complete: false,
            hold_start: None,
            hold_duration: Duration::ZERO,
            required_hold: Duration::from_millis(config.required_hold_ms),
        })
    }

    /// Return to the initial state, whatever the current one
    pub fn reset(&mut self) {
        self.current_step = 0;
        self.completed_steps.iter_mut().for_each(|c| *c = false);
        self.is_complete = false;
        self.clear_hold();
    }

    /// Advance the workflow by one frame
    ///
    /// `now` is the frame timestamp on the caller's session clock.
    pub fn update(&mut self, targets: &[Target], now: Duration) {
        if self.is_complete {
            return;
        }

        let slot = self.steps[self.current_step].target;
        let hit = targets.get(slot.index()).is_some_and(|t| t.hit);
        if !hit {
            if self.hold_start.is_some() {
                debug!("Step {} hold abandoned after {:?}", self.current_step, self.hold_duration);
            }
            self.clear_hold();
            return;
        }

        let start = *self.hold_start.get_or_insert(now);
        self.hold_duration = now.saturating_sub(start);

        if self.hold_duration >= self.required_hold && !self.completed_steps[self.current_step] {
            self.completed_steps[self.current_step] = true;
            info!("Workflow step {} ({}) completed", self.current_step, self.steps[self.current_step].name);

            if self.current_step + 1 < self.steps.len() {
                self.current_step += 1;
                self.clear_hold();
            } else {
                self.is_complete = true;
                info!("Workflow complete");
            }
        }
    }

    fn clear_hold(&mut self) {
        self.hold_start = None;
        self.hold_duration = Duration::ZERO;
    }

    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn current_step_name(&self) -> &str {
        &self.steps[self.current_step].name
    }

    #[must_use]
    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    #[must_use]
    pub fn completed_steps(&self) -> &[bool] {
        &self.completed_steps
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.is_complete
    }

    #[must_use]
    pub const fn hold_start(&self) -> Option<Duration> {
        self.hold_start
    }

    #[must_use]
    pub const fn hold_duration(&self) -> Duration {
        self.hold_duration
    }

    #[must_use]
    pub const fn required_hold(&self) -> Duration {
        self.required_hold
    }

    /// A hold is in progress on the current step
    #[must_use]
    pub fn is_holding(&self) -> bool {
        self.hold_start.is_some() && !self.hold_duration.is_zero()
    }

    /// Hold progress on the current step, 0-100
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn hold_progress_percent(&self) -> u32 {
        let ratio = self.hold_duration.as_secs_f64() / self.required_hold.as_secs_f64();
        (ratio * 100.0).round().clamp(0.0, 100.0) as u32
    }

    #[must_use]
    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            current_step: self.current_step,
            step_name: self.current_step_name().to_string(),
            completed_steps: self.completed_steps.clone(),
            is_complete: self.is_complete,
            hold_ms: u64::try_from(self.hold_duration.as_millis()).unwrap_or(u64::MAX),
            progress_percent: self.hold_progress_percent(),
        }
    }
}
