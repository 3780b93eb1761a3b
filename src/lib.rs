//! Maxwell's Demon - a sorting game in a two-chamber box
//!
//! Core modules:
//! - `sim`: Deterministic simulation (molecules, partition gate, scoring, game modes)
//! - `renderer`: Dot-matrix software renderer
//! - `input`: Pointer/touch activation input
//! - `audio`: One-shot sound effects
//! - `telemetry`: Fire-and-forget play event logging
//! - `settings`: Process configuration

pub mod audio;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod telemetry;

pub use settings::Settings;

use glam::Vec2;

/// Game name reported to telemetry
pub const GAME_NAME: &str = "maxwells-demon";

/// Game configuration constants
pub mod consts {
    /// Logical screen resolution
    pub const SCREEN_WIDTH: u32 = 640;
    pub const SCREEN_HEIGHT: u32 = 480;

    /// Fixed simulation rate (one molecule step per tick)
    pub const TICKS_PER_SECOND: u64 = 60;
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Chamber frame (inner edges molecules bounce off)
    pub const FRAME_LEFT: f32 = 23.0;
    pub const FRAME_RIGHT: f32 = SCREEN_WIDTH as f32 - FRAME_LEFT;
    pub const FRAME_TOP: f32 = 70.0;
    pub const FRAME_BOTTOM: f32 = SCREEN_HEIGHT as f32 - 30.0;
    pub const FRAME_THICKNESS: f32 = 15.0;

    /// Vertical partition splitting the chamber in two
    pub const CENTER_X: f32 = SCREEN_WIDTH as f32 / 2.0;
    /// Half the frame thickness, rounded down to whole pixels
    pub const PARTITION_HALF_WIDTH: f32 = (FRAME_THICKNESS as u32 / 2) as f32;
    pub const PARTITION_LEFT: f32 = CENTER_X - PARTITION_HALF_WIDTH;
    pub const PARTITION_RIGHT: f32 = CENTER_X + PARTITION_HALF_WIDTH;

    /// Slit in the partition
    pub const SLIT_SIZE: f32 = 50.0;
    pub const SLIT_SPEED: f32 = 1.0;

    /// Molecules
    pub const MOLECULE_RADIUS: f32 = 10.0;
    pub const FAST_SPEED: f32 = 4.0;
    pub const SLOW_SPEED: f32 = 3.0;
    pub const MOLECULES_PER_LEVEL: usize = 5;

    /// LevelStart banner duration
    pub const LEVEL_START_TICKS: u64 = 2 * TICKS_PER_SECOND;
    /// Telemetry heartbeat period while playing
    pub const HEARTBEAT_TICKS: u64 = 600;
}

/// Velocity of the given magnitude pointing along `angle` (radians)
#[inline]
pub fn velocity_from_angle(speed: f32, angle: f32) -> Vec2 {
    Vec2::new(speed * angle.cos(), speed * angle.sin())
}
