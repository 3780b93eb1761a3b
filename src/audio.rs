//! Sound effects
//!
//! Every clip is a short sequence of procedurally generated tones, so no
//! audio assets are shipped. In the browser the tones are played through
//! the Web Audio API; natively clips are only logged.

use crate::sim::SoundClip;

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Triangle,
}

/// One enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Start frequency (Hz)
    pub freq: f32,
    /// Frequency reached at the end of the note, if it glides
    pub glide_to: Option<f32>,
    pub wave: Wave,
    /// Offset from the trigger time (s)
    pub delay: f64,
    /// Note length (s)
    pub duration: f64,
    /// Peak gain before master/sfx volume
    pub gain: f32,
}

impl Tone {
    const fn note(freq: f32, wave: Wave, delay: f64, duration: f64, gain: f32) -> Self {
        Self {
            freq,
            glide_to: None,
            wave,
            delay,
            duration,
            gain,
        }
    }

    const fn glide(mut self, to: f32) -> Self {
        self.glide_to = Some(to);
        self
    }
}

const START: [Tone; 3] = [
    Tone::note(523.0, Wave::Square, 0.0, 0.08, 0.15),
    Tone::note(659.0, Wave::Square, 0.08, 0.08, 0.15),
    Tone::note(784.0, Wave::Square, 0.16, 0.16, 0.15),
];
const OPEN: [Tone; 1] = [Tone::note(180.0, Wave::Triangle, 0.0, 0.06, 0.3).glide(90.0)];
const CORRECT: [Tone; 2] = [
    Tone::note(880.0, Wave::Sine, 0.0, 0.06, 0.3),
    Tone::note(1320.0, Wave::Sine, 0.06, 0.1, 0.3),
];
const WRONG: [Tone; 1] = [Tone::note(220.0, Wave::Square, 0.0, 0.2, 0.15).glide(110.0)];
const COMPLETE: [Tone; 4] = [
    Tone::note(400.0, Wave::Triangle, 0.0, 0.4, 0.3),
    Tone::note(500.0, Wave::Triangle, 0.1, 0.4, 0.3),
    Tone::note(600.0, Wave::Triangle, 0.2, 0.4, 0.3),
    Tone::note(800.0, Wave::Triangle, 0.3, 0.5, 0.3),
];

/// Tones making up a clip
pub fn tones(clip: SoundClip) -> &'static [Tone] {
    match clip {
        SoundClip::Start => &START,
        SoundClip::Open => &OPEN,
        SoundClip::Correct => &CORRECT,
        SoundClip::Wrong => &WRONG,
        SoundClip::Complete => &COMPLETE,
    }
}

/// Master * sfx volume, or zero when muted
pub fn effective_volume(master: f32, sfx: f32, muted: bool) -> f32 {
    if muted {
        0.0
    } else {
        master.clamp(0.0, 1.0) * sfx.clamp(0.0, 1.0)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(not(target_arch = "wasm32"))]
pub use native::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Tone, Wave, effective_volume, tones};
    use crate::sim::SoundClip;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl AudioManager {
        pub fn new(master_volume: f32, sfx_volume: f32, muted: bool) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume,
                sfx_volume,
                muted,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        /// Fire and forget
        pub fn play_one_shot(&mut self, clip: SoundClip) {
            let vol = effective_volume(self.master_volume, self.sfx_volume, self.muted);
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in tones(clip) {
                play_tone(ctx, tone, vol);
            }
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_tone(ctx: &AudioContext, tone: &Tone, vol: f32) {
        let osc_type = match tone.wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Square => OscillatorType::Square,
            Wave::Triangle => OscillatorType::Triangle,
        };
        let Some((osc, gain)) = create_osc(ctx, tone.freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + tone.delay;
        let end = t + tone.duration;

        gain.gain().set_value_at_time(vol * tone.gain, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
        if let Some(to) = tone.glide_to {
            osc.frequency().set_value_at_time(tone.freq, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(to, end).ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(end + 0.05).ok();
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{effective_volume, tones};
    use crate::sim::SoundClip;

    /// Headless stand-in: clips are logged, nothing is played
    #[derive(Debug, Default)]
    pub struct AudioManager {
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
        played: u64,
    }

    impl AudioManager {
        pub fn new(master_volume: f32, sfx_volume: f32, muted: bool) -> Self {
            Self {
                master_volume,
                sfx_volume,
                muted,
                played: 0,
            }
        }

        pub fn resume(&self) {}

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        pub fn play_one_shot(&mut self, clip: SoundClip) {
            let vol = effective_volume(self.master_volume, self.sfx_volume, self.muted);
            if vol <= 0.0 {
                return;
            }
            self.played += 1;
            log::debug!("Sound {:?} ({} tones, volume {:.2})", clip, tones(clip).len(), vol);
        }

        /// Clips that would have been audible so far
        pub fn played(&self) -> u64 {
            self.played
        }
    }
}
