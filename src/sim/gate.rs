//! Partition slit controller
//!
//! The slit slides up and down the partition while closed and freezes in
//! place while the player holds it open.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The movable slit in the center partition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// Upper edge of the slit
    pub top: f32,
    /// Lower edge of the slit (always `top + SLIT_SIZE`)
    pub bottom: f32,
    /// Vertical speed applied each tick while closed
    pub velocity: f32,
    /// Whether molecules may pass through the slit
    pub open: bool,
}

impl Default for Gate {
    fn default() -> Self {
        let top = (FRAME_BOTTOM - SLIT_SIZE + FRAME_TOP) * 0.4;
        Self {
            top,
            bottom: top + SLIT_SIZE,
            velocity: SLIT_SPEED,
            open: false,
        }
    }
}

impl Gate {
    /// Put the slit back at its level-start position, closed
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Open the slit. Returns false if it was already open.
    pub fn open(&mut self) -> bool {
        let changed = !self.open;
        self.open = true;
        changed
    }

    /// Close the slit. Returns false if it was already closed.
    pub fn close(&mut self) -> bool {
        let changed = self.open;
        self.open = false;
        changed
    }

    /// Advance the slit one tick, reflecting at the frame edges
    pub fn step(&mut self) {
        if self.open {
            return;
        }

        self.top += self.velocity;
        self.bottom += self.velocity;

        if self.top < FRAME_TOP {
            self.top = FRAME_TOP;
            self.bottom = self.top + SLIT_SIZE;
            self.velocity = -self.velocity;
        }
        if self.bottom > FRAME_BOTTOM {
            self.bottom = FRAME_BOTTOM;
            self.top = self.bottom - SLIT_SIZE;
            self.velocity = -self.velocity;
        }
    }

    /// Whether a molecule at height `y` may pass the partition
    #[inline]
    pub fn admits(&self, y: f32) -> bool {
        self.open && y >= self.top && y <= self.bottom
    }

    /// Vertical center of the slit
    #[inline]
    pub fn center(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}
