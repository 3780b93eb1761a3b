//! Separation scoring
//!
//! Counts molecules that sit in their target half: fast molecules right of
//! the centerline, slow molecules left of it.

use serde::{Deserialize, Serialize};

use super::state::{Molecule, SpeedClass};

/// Change in the sorted counts between two evaluations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortDelta {
    /// Some count went up
    pub improved: bool,
    /// Some count went down
    pub worsened: bool,
}

/// Sorting targets and current counts for a level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortTally {
    pub target_fast_in_right: u32,
    pub target_slow_in_left: u32,
    pub fast_in_right: u32,
    pub slow_in_left: u32,
}

impl SortTally {
    /// Targets and counts for a freshly created molecule set
    pub fn for_level(molecules: &[Molecule]) -> Self {
        let target_fast_in_right = molecules
            .iter()
            .filter(|m| m.class == SpeedClass::Fast)
            .count() as u32;
        let (fast_in_right, slow_in_left) = count_sorted(molecules);
        Self {
            target_fast_in_right,
            target_slow_in_left: molecules.len() as u32 - target_fast_in_right,
            fast_in_right,
            slow_in_left,
        }
    }

    /// Recount and report how the counts moved since the last update
    pub fn update(&mut self, molecules: &[Molecule]) -> SortDelta {
        let (fast, slow) = count_sorted(molecules);
        let delta = SortDelta {
            improved: fast > self.fast_in_right || slow > self.slow_in_left,
            worsened: fast < self.fast_in_right || slow < self.slow_in_left,
        };
        self.fast_in_right = fast;
        self.slow_in_left = slow;
        delta
    }

    /// Every molecule is on its target side
    pub fn is_complete(&self) -> bool {
        self.fast_in_right == self.target_fast_in_right
            && self.slow_in_left == self.target_slow_in_left
    }
}

/// (fast molecules right of center, slow molecules left of center)
pub fn count_sorted(molecules: &[Molecule]) -> (u32, u32) {
    molecules
        .iter()
        .filter(|m| m.is_sorted())
        .fold((0, 0), |(fast, slow), m| match m.class {
            SpeedClass::Fast => (fast + 1, slow),
            SpeedClass::Slow => (fast, slow + 1),
        })
}
