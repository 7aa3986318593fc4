//! Audio cue sinks
//!
//! The simulation never touches audio directly. The session turns game
//! events into `AudioCue`s and keeps the sink informed of the current march
//! tempo; what a sink does with them is up to the platform.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Player fired
    Shoot,
    /// Enemy destroyed
    EnemyExplosion,
    /// Player cannon destroyed
    PlayerExplosion,
    /// Bonus unit started crossing the field
    BonusAppear,
    /// Bonus unit destroyed
    BonusHit,
    /// Extra life granted
    ExtraLife,
    /// Formation cleared
    LevelComplete,
    /// Game over
    GameOver,
}

/// Receiver for audio cues
pub trait AudioSink {
    /// Play a one-shot effect
    fn play(&mut self, cue: AudioCue);

    /// Seconds between march beats, or `None` to stop the march
    fn set_march_tempo(&mut self, interval: Option<f32>);

    /// Called once per host frame with the real elapsed time
    fn advance(&mut self, _dt: f32) {}

    /// Pick up changed volume/mute preferences
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: AudioCue) {}

    fn set_march_tempo(&mut self, _interval: Option<f32>) {}
}

/// Writes cues to the log (headless runs)
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    /// Cues played so far
    pub played: usize,
    pub march_tempo: Option<f32>,
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        self.played += 1;
        log::debug!("audio cue: {cue:?}");
    }

    fn set_march_tempo(&mut self, interval: Option<f32>) {
        if interval != self.march_tempo {
            match interval {
                Some(secs) => log::debug!("march tempo: {:.0} ms", secs * 1000.0),
                None => log::debug!("march stopped"),
            }
        }
        self.march_tempo = interval;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    //! Procedurally generated sound effects through the Web Audio API

    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, AudioSink};
    use crate::settings::Settings;

    /// Bass notes cycled by the march (A1, G1, F#1, E1)
    const MARCH_NOTES: [f32; 4] = [55.0, 49.0, 46.0, 41.0];
    /// Fastest the march beat is allowed to go
    const MIN_MARCH_INTERVAL: f32 = 0.1;

    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
        march_enabled: bool,
        march_interval: Option<f32>,
        march_timer: f32,
        march_index: usize,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new(&Settings::default())
        }
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let mut audio = Self {
                ctx,
                master_volume: 0.0,
                sfx_volume: 0.0,
                muted: false,
                march_enabled: true,
                march_interval: None,
                march_timer: 0.0,
                march_index: 0,
            };
            audio.apply_settings(settings);
            audio
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Context ready to play, with the volume to play at
        fn output(&self) -> Option<(&AudioContext, f32)> {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return None;
            }
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some((ctx, vol))
        }

        /// Oscillator routed through its own gain node
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

        /// A single decaying note, optionally sweeping to `end_freq`
        fn tone(
            ctx: &AudioContext,
            osc_type: OscillatorType,
            freq: f32,
            end_freq: Option<f32>,
            level: f32,
            delay: f64,
            duration: f64,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;

            gain.gain().set_value_at_time(level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();
            if let Some(end) = end_freq {
                osc.frequency().set_value_at_time(freq, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end, t + duration)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + duration + 0.05).ok();
        }

        /// Wavering hum for the bonus unit: sine carrier with an 8 Hz LFO
        fn play_bonus_appear(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 400.0, OscillatorType::Sine) else {
                return;
            };
            let Some((lfo, lfo_gain)) = ctx
                .create_oscillator()
                .ok()
                .zip(ctx.create_gain().ok())
            else {
                return;
            };
            let t = ctx.current_time();

            lfo.frequency().set_value(8.0);
            lfo_gain.gain().set_value(50.0);
            lfo.connect_with_audio_node(&lfo_gain).ok();
            lfo_gain.connect_with_audio_param(&osc.frequency()).ok();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.0)
                .ok();

            osc.start().ok();
            lfo.start().ok();
            osc.stop_with_when(t + 1.05).ok();
            lfo.stop_with_when(t + 1.05).ok();
        }

        fn play_march_beat(&mut self) {
            let note = MARCH_NOTES[self.march_index];
            self.march_index = (self.march_index + 1) % MARCH_NOTES.len();
            if let Some((ctx, vol)) = self.output() {
                Self::tone(ctx, OscillatorType::Square, note, None, vol * 0.4, 0.0, 0.1);
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: AudioCue) {
            let Some((ctx, vol)) = self.output() else {
                return;
            };
            use OscillatorType::{Sawtooth, Sine, Square, Triangle};

            match cue {
                AudioCue::Shoot => {
                    Self::tone(ctx, Square, 1500.0, Some(500.0), vol * 0.5, 0.0, 0.1);
                }
                AudioCue::EnemyExplosion => {
                    Self::tone(ctx, Sawtooth, 220.0, Some(40.0), vol * 0.4, 0.0, 0.15);
                }
                AudioCue::PlayerExplosion => {
                    Self::tone(ctx, Sawtooth, 100.0, Some(30.0), vol * 0.6, 0.0, 0.5);
                    Self::tone(ctx, Square, 1500.0, None, vol * 0.2, 0.0, 0.1);
                }
                AudioCue::BonusAppear => Self::play_bonus_appear(ctx, vol),
                AudioCue::BonusHit => {
                    for (i, freq) in [800.0, 600.0, 400.0].iter().enumerate() {
                        Self::tone(ctx, Triangle, *freq, None, vol * 0.3, i as f64 * 0.06, 0.12);
                    }
                }
                AudioCue::ExtraLife => {
                    for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
                        Self::tone(ctx, Square, *freq, None, vol * 0.4, i as f64 * 0.1, 0.15);
                    }
                }
                AudioCue::LevelComplete => {
                    for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
                        Self::tone(ctx, Triangle, *freq, None, vol * 0.3, i as f64 * 0.1, 0.4);
                    }
                }
                AudioCue::GameOver => {
                    for (i, freq) in [392.0, 349.0, 330.0, 294.0].iter().enumerate() {
                        Self::tone(ctx, Sine, *freq, None, vol * 0.4, i as f64 * 0.25, 0.3);
                    }
                }
            }
        }

        fn set_march_tempo(&mut self, interval: Option<f32>) {
            if self.march_interval.is_none() {
                self.march_timer = 0.0;
            }
            self.march_interval = interval.map(|secs| secs.max(MIN_MARCH_INTERVAL));
        }

        fn advance(&mut self, dt: f32) {
            let Some(interval) = self.march_interval else {
                return;
            };
            if !self.march_enabled {
                return;
            }
            self.march_timer += dt;
            if self.march_timer >= interval {
                self.march_timer = 0.0;
                self.play_march_beat();
            }
        }

        fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.muted = settings.muted;
            self.march_enabled = settings.march_enabled;
        }
    }
}
