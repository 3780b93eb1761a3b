//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Side effects queued as events, never performed
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod gate;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{PartitionCrossing, contain_in_frame, next_crossing, resolve, resolve_partition};
pub use events::{GameEvent, SoundClip, TelemetryAction, TelemetryRecord};
pub use gate::Gate;
pub use score::{SortDelta, SortTally};
pub use state::{GameMode, GameState, Molecule, Side, SpeedClass};
pub use tick::{TickInput, Transition, autopilot, setup_level, tick};
