//! Time management utilities

use std::time::Instant;

/// Frame clock supplying the per-tick timestep
///
/// Owned by the scene driver and lent to component hooks; there is no global
/// instance. Total time counts only unpaused time and can be reset, actual
/// time counts everything since creation.
#[derive(Debug, Clone)]
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    actual_time: f32,
    paused_time: f32,
    paused: bool,
    max_delta_time: Option<f32>,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            actual_time: 0.0,
            paused_time: 0.0,
            paused: false,
            max_delta_time: None,
            frame_count: 0,
        }
    }

    /// Create a timer that clamps every frame step to `max_delta_time` seconds
    pub fn with_max_delta(max_delta_time: f32) -> Self {
        Self {
            max_delta_time: Some(max_delta_time),
            ..Self::new()
        }
    }

    /// Update the timer from the wall clock (should be called once per frame)
    pub fn frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.advance(elapsed.as_secs_f32());
    }

    /// Advance the timer by an explicit step in seconds
    ///
    /// Used by fixed-step drivers and tests. Negative steps count as zero.
    pub fn advance(&mut self, step: f32) {
        let step = match self.max_delta_time {
            Some(max) => step.clamp(0.0, max),
            None => step.max(0.0),
        };

        self.actual_time += step;
        self.frame_count += 1;

        if self.paused {
            self.paused_time += step;
            self.delta_time = 0.0;
        } else {
            self.total_time += step;
            self.delta_time = step;
        }
    }

    /// Get the time since the last frame in seconds (zero while paused)
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the unpaused time elapsed since creation or the last reset
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the time elapsed in the current pause (zero when running)
    pub fn time_paused(&self) -> f32 {
        self.paused_time
    }

    /// Get all time elapsed since creation, including pauses; never reset
    pub fn actual_time(&self) -> f32 {
        self.actual_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Pause the timer
    pub fn pause(&mut self) {
        if !self.paused {
            log::debug!("Timer paused at {:.3}s", self.total_time);
            self.paused = true;
            self.paused_time = 0.0;
        }
    }

    /// Unpause the timer
    pub fn unpause(&mut self) {
        if self.paused {
            log::debug!("Timer resumed after {:.3}s paused", self.paused_time);
            self.paused = false;
            self.paused_time = 0.0;
        }
    }

    /// Check if the timer is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reset total and paused time and unpause; actual time is kept
    pub fn reset(&mut self) {
        self.total_time = 0.0;
        self.paused_time = 0.0;
        self.delta_time = 0.0;
        self.paused = false;
    }
}
