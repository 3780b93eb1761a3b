//! Fire-and-forget play logging
//!
//! Records are serialized to one JSON line each and handed to a sink. On
//! native builds the sink runs on a background thread fed by a channel so
//! the frame loop never waits on it; in the browser there are no threads and
//! lines go straight to the console logger. Lost records are acceptable.

use rand::Rng;
use serde::Serialize;

use crate::sim::TelemetryRecord;

/// Receives serialized telemetry lines
pub type Sink = Box<dyn FnMut(String) + Send>;

/// Wire form of a record: the record's fields plus game and play id
#[derive(Serialize)]
struct Payload<'a> {
    game: &'a str,
    play_id: &'a str,
    #[serde(flatten)]
    record: &'a TelemetryRecord,
}

/// Serialize one record as a JSON object line
pub fn payload(game: &str, play_id: &str, record: &TelemetryRecord) -> serde_json::Result<String> {
    serde_json::to_string(&Payload {
        game,
        play_id,
        record,
    })
}

/// Random 128-bit play id as 32 lowercase hex digits
pub fn new_play_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:032x}", rng.random::<u128>())
}

enum Backend {
    Disabled,
    #[cfg(not(target_arch = "wasm32"))]
    Worker {
        tx: std::sync::mpsc::Sender<String>,
        worker: std::thread::JoinHandle<()>,
    },
    #[cfg(target_arch = "wasm32")]
    Direct(Sink),
}

/// Telemetry client for one play session
pub struct Telemetry {
    game: String,
    play_id: String,
    backend: Backend,
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("game", &self.game)
            .field("play_id", &self.play_id)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Telemetry {
    /// Start a client that writes lines to the `telemetry` log target
    pub fn spawn(game: &str, play_id: String, enabled: bool) -> Self {
        let sink: Sink = Box::new(|line| log::info!(target: "telemetry", "{line}"));
        Self::with_sink(game, play_id, enabled, sink)
    }

    /// Start a client delivering lines to `sink`
    pub fn with_sink(game: &str, play_id: String, enabled: bool, sink: Sink) -> Self {
        let backend = if enabled {
            Self::start_backend(sink)
        } else {
            Backend::Disabled
        };
        Self {
            game: game.to_string(),
            play_id,
            backend,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn start_backend(mut sink: Sink) -> Backend {
        let (tx, rx) = std::sync::mpsc::channel::<String>();
        let spawned = std::thread::Builder::new()
            .name("telemetry".into())
            .spawn(move || {
                for line in rx {
                    sink(line);
                }
            });
        match spawned {
            Ok(worker) => Backend::Worker { tx, worker },
            Err(e) => {
                log::warn!("Telemetry worker failed to start: {e}");
                Backend::Disabled
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn start_backend(sink: Sink) -> Backend {
        Backend::Direct(sink)
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.backend, Backend::Disabled)
    }

    pub fn play_id(&self) -> &str {
        &self.play_id
    }

    /// Queue a record; never blocks
    pub fn log_async(&mut self, record: &TelemetryRecord) {
        if !self.is_enabled() {
            return;
        }

        let line = match payload(&self.game, &self.play_id, record) {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Dropping telemetry record {:?}: {e}", record.action);
                return;
            }
        };

        let delivered = match &mut self.backend {
            Backend::Disabled => true,
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Worker { tx, .. } => tx.send(line).is_ok(),
            #[cfg(target_arch = "wasm32")]
            Backend::Direct(sink) => {
                sink(line);
                true
            }
        };
        if !delivered {
            log::warn!("Telemetry worker gone, disabling");
            self.shutdown();
        }
    }

    /// Stop the worker after it has delivered everything queued
    pub fn shutdown(&mut self) {
        match std::mem::replace(&mut self.backend, Backend::Disabled) {
            Backend::Disabled => {}
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Worker { tx, worker } => {
                drop(tx);
                if worker.join().is_err() {
                    log::warn!("Telemetry worker panicked");
                }
            }
            #[cfg(target_arch = "wasm32")]
            Backend::Direct(_) => {}
        }
    }
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::TelemetryAction;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::sync::mpsc;

    fn collecting(enabled: bool) -> (Telemetry, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        let sink: Sink = Box::new(move |line| {
            let _ = tx.send(line);
        });
        (Telemetry::with_sink("maxwells-demon", "abc".into(), enabled, sink), rx)
    }

    #[test]
    fn test_payload_flattens_record() {
        let record = TelemetryRecord::new(TelemetryAction::Complete).level(2).sec(41);
        let line = payload("maxwells-demon", "abc", &record).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["game"], "maxwells-demon");
        assert_eq!(value["play_id"], "abc");
        assert_eq!(value["action"], "complete");
        assert_eq!(value["level"], 2);
        assert_eq!(value["sec"], 41);
        assert!(value.get("ticks").is_none());
    }

    #[test]
    fn test_records_delivered_in_order() {
        let (mut telemetry, rx) = collecting(true);
        telemetry.log_async(&TelemetryRecord::new(TelemetryAction::Setup).level(1));
        telemetry.log_async(&TelemetryRecord::new(TelemetryAction::StartGame));
        telemetry.shutdown();

        let lines: Vec<String> = rx.iter().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"setup\""));
        assert!(lines[1].contains("\"start_game\""));
    }

    #[test]
    fn test_disabled_drops_records() {
        let (mut telemetry, rx) = collecting(false);
        assert!(!telemetry.is_enabled());
        telemetry.log_async(&TelemetryRecord::new(TelemetryAction::StartGame));
        drop(telemetry);
        assert_eq!(rx.iter().count(), 0);
    }

    #[test]
    fn test_play_id_format() {
        let mut rng = Pcg32::seed_from_u64(3);
        let id = new_play_id(&mut rng);
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(id, new_play_id(&mut rng));
    }
}
