//! Stuck detection for navigation agents.
//!
//! An agent that is commanded to move but covers less than a minimum
//! displacement over a full window is reported as stuck.

use glam::DVec3;

use skidfire_core::constants::{STUCK_MIN_DISPLACEMENT, STUCK_WINDOW_SECS};

#[derive(Debug, Clone)]
pub struct StuckDetector {
    window_secs: f64,
    min_displacement: f64,
    timer: f64,
    anchor: Option<DVec3>,
}

impl Default for StuckDetector {
    fn default() -> Self {
        Self::new(STUCK_WINDOW_SECS, STUCK_MIN_DISPLACEMENT)
    }
}

impl StuckDetector {
    pub fn new(window_secs: f64, min_displacement: f64) -> Self {
        Self {
            window_secs,
            min_displacement,
            timer: 0.0,
            anchor: None,
        }
    }

    /// Feed one step. Returns true once per window in which the agent was
    /// moving but stayed within `min_displacement` of where it started.
    pub fn update(&mut self, position: DVec3, moving: bool, dt: f64) -> bool {
        if !moving {
            self.reset();
            return false;
        }

        let anchor = *self.anchor.get_or_insert(position);
        self.timer += dt;
        if self.timer <= self.window_secs {
            return false;
        }

        let displacement = position.distance(anchor);
        self.timer = 0.0;
        self.anchor = Some(position);
        displacement < self.min_displacement
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.anchor = None;
    }

    /// Seconds accumulated in the current window.
    pub fn elapsed(&self) -> f64 {
        self.timer
    }
}
