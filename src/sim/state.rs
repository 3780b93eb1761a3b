//! Game state and core simulation types
//!
//! `GameState` owns everything a tick mutates: the molecules, the partition
//! gate, the sorting tally and the mode counters. Side effects are queued as
//! [`GameEvent`]s and drained by the frontend.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::gate::Gate;
use super::score::SortTally;
use crate::consts::*;

/// Current mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Title screen, waiting for the first activation
    Title,
    /// "LEVEL n" banner, molecules frozen
    LevelStart,
    /// Active sorting
    Playing,
    /// Level sorted, waiting for activation to advance
    Complete,
}

/// Which half of the chamber a position lies in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Speed class of a molecule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedClass {
    Fast,
    Slow,
}

impl SpeedClass {
    /// Class for the molecule created at `index` (even = fast, odd = slow)
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            SpeedClass::Fast
        } else {
            SpeedClass::Slow
        }
    }

    /// Constant speed magnitude for this class
    pub fn speed(self) -> f32 {
        match self {
            SpeedClass::Fast => FAST_SPEED,
            SpeedClass::Slow => SLOW_SPEED,
        }
    }

    /// Half of the chamber this class has to be sorted into
    pub fn target_side(self) -> Side {
        match self {
            SpeedClass::Fast => Side::Right,
            SpeedClass::Slow => Side::Left,
        }
    }
}

/// A molecule bouncing inside the chamber
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub class: SpeedClass,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Molecule {
    pub fn new(class: SpeedClass, pos: Vec2, vel: Vec2) -> Self {
        Self {
            class,
            pos,
            vel,
            radius: MOLECULE_RADIUS,
        }
    }

    /// Advance one tick (unit-step Euler)
    #[inline]
    pub fn step(&mut self) {
        self.pos += self.vel;
    }

    /// Current speed magnitude (constant for the molecule's lifetime)
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// True when the molecule sits strictly inside its target half
    pub fn is_sorted(&self) -> bool {
        match self.class.target_side() {
            Side::Right => self.pos.x > CENTER_X,
            Side::Left => self.pos.x < CENTER_X,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Current mode
    pub mode: GameMode,
    /// Ticks since the current mode was entered
    pub ticks_in_mode: u64,
    /// Ticks since the game was created
    pub time_ticks: u64,
    /// Current level (1-based)
    pub level: u32,
    /// Whole seconds spent in Playing for the current level
    pub elapsed_secs: u64,
    /// Molecules of the current level, in creation order
    pub molecules: Vec<Molecule>,
    /// Partition slit
    pub gate: Gate,
    /// Sorting targets and current counts
    pub tally: SortTally,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game on the title screen with level 1 set up
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            mode: GameMode::Title,
            ticks_in_mode: 0,
            time_ticks: 0,
            level: 1,
            elapsed_secs: 0,
            molecules: Vec::new(),
            gate: Gate::default(),
            tally: SortTally::default(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };

        super::tick::setup_level(&mut state);

        state
    }

    /// Switch mode and restart the mode-relative tick counter
    pub(crate) fn enter_mode(&mut self, mode: GameMode) {
        log::info!("{:?} -> {:?} (level {})", self.mode, mode, self.level);
        self.mode = mode;
        self.ticks_in_mode = 0;
    }

    /// Queue a side effect for the frontend
    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Side effects queued since the last drain, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Number of fast / slow molecules in the current level
    pub fn class_counts(&self) -> (usize, usize) {
        let fast = self
            .molecules
            .iter()
            .filter(|m| m.class == SpeedClass::Fast)
            .count();
        (fast, self.molecules.len() - fast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_alternates_by_index() {
        assert_eq!(SpeedClass::for_index(0), SpeedClass::Fast);
        assert_eq!(SpeedClass::for_index(1), SpeedClass::Slow);
        assert_eq!(SpeedClass::for_index(4), SpeedClass::Fast);
    }

    #[test]
    fn test_molecule_step_and_sorted() {
        let mut m = Molecule::new(SpeedClass::Fast, Vec2::new(318.0, 200.0), Vec2::new(4.0, 0.0));
        assert!(!m.is_sorted());
        m.step();
        assert_eq!(m.pos, Vec2::new(322.0, 200.0));
        assert!(m.is_sorted());
        assert_eq!(m.speed(), 4.0);
    }

    #[test]
    fn test_new_state_is_on_title_with_level_one() {
        let mut state = GameState::new(7);
        assert_eq!(state.mode, GameMode::Title);
        assert_eq!(state.level, 1);
        assert_eq!(state.molecules.len(), MOLECULES_PER_LEVEL);
        // Level setup is reported even before the game starts
        assert_eq!(state.drain_events().count(), 1);
        assert_eq!(state.drain_events().count(), 0);
    }
}
