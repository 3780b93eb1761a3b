//! Side effects requested by the simulation
//!
//! `tick` never talks to audio or telemetry directly. It queues events on the
//! game state and the frontend forwards them after the tick.

use serde::{Deserialize, Serialize};

/// One-shot sound clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundClip {
    /// Game started or next level begun
    Start,
    /// Slit opened
    Open,
    /// A molecule reached its target side
    Correct,
    /// A molecule left its target side
    Wrong,
    /// Level sorted
    Complete,
}

/// Telemetry action names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryAction {
    StartGame,
    Playing,
    Complete,
    Setup,
}

/// Structured fields of a telemetry event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub action: TelemetryAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticks: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sec: Option<u64>,
    /// Slow molecules sorted into the left half
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<u32>,
    /// Fast molecules sorted into the right half
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<u32>,
}

impl TelemetryRecord {
    pub fn new(action: TelemetryAction) -> Self {
        Self {
            action,
            level: None,
            ticks: None,
            sec: None,
            low: None,
            high: None,
        }
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn ticks(mut self, ticks: u64) -> Self {
        self.ticks = Some(ticks);
        self
    }

    pub fn sec(mut self, sec: u64) -> Self {
        self.sec = Some(sec);
        self
    }

    pub fn sorted(mut self, low: u32, high: u32) -> Self {
        self.low = Some(low);
        self.high = Some(high);
        self
    }
}

/// A side effect queued by the simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Sound(SoundClip),
    Telemetry(TelemetryRecord),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_omits_missing_fields() {
        let record = TelemetryRecord::new(TelemetryAction::Setup).level(3);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "action": "setup", "level": 3 }));
    }

    #[test]
    fn test_action_names() {
        let json = serde_json::to_string(&TelemetryAction::StartGame).unwrap();
        assert_eq!(json, "\"start_game\"");
    }
}
