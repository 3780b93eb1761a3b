//! Process configuration
//!
//! Natively read from environment variables; the browser build takes a JSON
//! object from the page. Bad values never fail startup, they fall back to
//! the defaults.

use serde::{Deserialize, Serialize};

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; a time-derived seed is used when absent
    pub seed: Option<u64>,
    /// Send play telemetry
    pub telemetry_enabled: bool,
    /// Let the demo autopilot play
    pub autopilot: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            telemetry_enabled: false,
            autopilot: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Environment variable holding the RNG seed
    pub const SEED_VAR: &'static str = "GAME_RAND_SEED";
    /// `1` turns telemetry on
    pub const LOGGING_VAR: &'static str = "GAME_LOGGING";
    /// `1` turns the autopilot on
    pub const AUTOPILOT_VAR: &'static str = "GAME_AUTOPILOT";
    /// Master volume, 0..1
    pub const VOLUME_VAR: &'static str = "GAME_VOLUME";

    /// Settings from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Settings from any variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(raw) = lookup(Self::SEED_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => settings.seed = Some(seed),
                Err(_) => log::warn!("Ignoring invalid {}={raw:?}", Self::SEED_VAR),
            }
        }
        settings.telemetry_enabled = lookup(Self::LOGGING_VAR).as_deref() == Some("1");
        settings.autopilot = lookup(Self::AUTOPILOT_VAR).as_deref() == Some("1");
        if let Some(raw) = lookup(Self::VOLUME_VAR) {
            match raw.trim().parse::<f32>() {
                Ok(vol) if vol.is_finite() => settings.master_volume = vol,
                _ => log::warn!("Ignoring invalid {}={raw:?}", Self::VOLUME_VAR),
            }
        }

        settings.clamped()
    }

    /// Settings from a JSON object; missing fields take defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Self>(json) {
            Ok(settings) => settings.clamped(),
            Err(e) => {
                log::warn!("Invalid settings JSON ({e}), using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Volumes forced into [0, 1]
    pub fn clamped(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Configured seed, or one derived from the clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(time_seed)
    }
}

#[cfg(target_arch = "wasm32")]
fn time_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
