//! Activation input: one press/release signal from mouse and touch
//!
//! Platform handlers record raw events as they arrive; the frame loop calls
//! [`ActivationInput::update`] once per tick to latch them into edges.

use crate::sim::TickInput;

/// Latched pointer and multi-touch state
#[derive(Debug, Clone, Default)]
pub struct ActivationInput {
    pending_down: bool,
    pending_up: bool,
    started: Vec<i32>,
    ended: Vec<i32>,
    /// Touches from the most recent press
    tracked: Vec<i32>,
    just_pressed: bool,
    just_released: bool,
}

impl ActivationInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self) {
        self.pending_down = true;
    }

    pub fn pointer_up(&mut self) {
        self.pending_up = true;
    }

    pub fn touch_start(&mut self, id: i32) {
        self.started.push(id);
    }

    pub fn touch_end(&mut self, id: i32) {
        self.ended.push(id);
    }

    /// Latch the events recorded since the previous update.
    ///
    /// Any number of new touches in one tick count as a single press and
    /// replace the tracked set; releasing any tracked touch is a release.
    pub fn update(&mut self) {
        self.just_pressed = self.pending_down || !self.started.is_empty();
        if !self.started.is_empty() {
            self.tracked = std::mem::take(&mut self.started);
        }

        let touch_released = self.ended.iter().any(|id| self.tracked.contains(id));
        self.just_released = self.pending_up || touch_released;
        if touch_released {
            let ended = &self.ended;
            self.tracked.retain(|id| !ended.contains(id));
        }

        self.pending_down = false;
        self.pending_up = false;
        self.ended.clear();
    }

    pub fn is_just_pressed(&self) -> bool {
        self.just_pressed
    }

    pub fn is_just_released(&self) -> bool {
        self.just_released
    }

    /// Input for the next simulation tick
    pub fn tick_input(&self, autopilot: bool) -> TickInput {
        TickInput {
            pressed: self.just_pressed,
            released: self.just_released,
            autopilot,
        }
    }
}
