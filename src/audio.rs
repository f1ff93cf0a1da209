//! Audio playback collaborator
//!
//! The simulation only ever holds an [`AudioHandle`] for sounds it asked to
//! start; the backend owns the actual voices. On the web, sounds are
//! synthesized with the Web Audio API - no external files needed.

use serde::{Deserialize, Serialize};

/// Sounds the game can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundId {
    /// Player fires
    Shot,
    /// Looping growl attached to a live zombie
    ZombieGroan,
}

/// Opaque reference to a playing voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioHandle(pub u32);

/// What the game needs from an audio system
///
/// Every method is infallible from the caller's side: failures are logged by
/// the backend and the game carries on silently.
pub trait AudioBackend {
    /// Start a sound. `None` when audio is unavailable.
    fn play(&mut self, sound: SoundId, volume: f32, looping: bool) -> Option<AudioHandle>;
    /// Ramp a voice to `volume` over `ramp_secs`
    fn set_volume(&mut self, handle: AudioHandle, volume: f32, ramp_secs: f64);
    /// Stop and release a voice. Unknown handles are ignored.
    fn stop(&mut self, handle: AudioHandle);
    /// Pause all output (game paused / over)
    fn suspend(&mut self);
    /// Resume output
    fn resume(&mut self);
}

/// Silent backend for native builds and headless runs
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play(&mut self, _sound: SoundId, _volume: f32, _looping: bool) -> Option<AudioHandle> {
        None
    }
    fn set_volume(&mut self, _handle: AudioHandle, _volume: f32, _ramp_secs: f64) {}
    fn stop(&mut self, _handle: AudioHandle) {}
    fn suspend(&mut self) {}
    fn resume(&mut self) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::collections::HashMap;

    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioBackend, AudioHandle, SoundId};

    /// Web Audio backend with oscillator-synthesized sounds
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        /// Looping voices still owned by a zombie
        voices: HashMap<AudioHandle, (OscillatorNode, GainNode)>,
        next_handle: u32,
        volume_scale: f32,
    }

    impl WebAudio {
        pub fn new(volume_scale: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                voices: HashMap::new(),
                next_handle: 1,
                volume_scale,
            }
        }

        /// Unlock the context after a user gesture
        pub fn unlock(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        /// Create an oscillator routed through its own gain node
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

        /// Gunshot - sharp descending crack
        fn play_shot(ctx: &AudioContext, vol: f32) -> Option<()> {
            let (osc, gain) = Self::create_osc(ctx, 900.0, OscillatorType::Sawtooth)?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok()?;
            osc.frequency().set_value_at_time(900.0, t).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(120.0, t + 0.12)
                .ok()?;

            osc.start().ok()?;
            osc.stop_with_when(t + 0.15).ok()?;
            Some(())
        }

        /// Groan - low wobbling drone that runs until stopped
        fn start_groan(ctx: &AudioContext, vol: f32) -> Option<(OscillatorNode, GainNode)> {
            let (osc, gain) = Self::create_osc(ctx, 70.0, OscillatorType::Sawtooth)?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol, t).ok()?;
            // Slight random pitch so a crowd doesn't phase into one tone
            let detune = 55.0 + js_sys::Math::random() as f32 * 30.0;
            osc.frequency().set_value_at_time(detune, t).ok()?;

            osc.start().ok()?;
            Some((osc, gain))
        }
    }

    impl AudioBackend for WebAudio {
        fn play(&mut self, sound: SoundId, volume: f32, looping: bool) -> Option<AudioHandle> {
            let ctx = self.ctx.as_ref()?;
            let vol = volume * self.volume_scale;

            let handle = AudioHandle(self.next_handle);
            self.next_handle = self.next_handle.wrapping_add(1);

            match (sound, looping) {
                (SoundId::ZombieGroan, true) => {
                    let Some(voice) = Self::start_groan(ctx, vol) else {
                        log::warn!("Failed to start groan voice");
                        return None;
                    };
                    self.voices.insert(handle, voice);
                }
                (SoundId::Shot, _) | (SoundId::ZombieGroan, false) => {
                    if Self::play_shot(ctx, vol).is_none() {
                        log::warn!("Failed to play {:?}", sound);
                        return None;
                    }
                }
            }
            Some(handle)
        }

        fn set_volume(&mut self, handle: AudioHandle, volume: f32, ramp_secs: f64) {
            let (Some(ctx), Some((_, gain))) = (&self.ctx, self.voices.get(&handle)) else {
                return;
            };
            if ctx.state() != AudioContextState::Running {
                return;
            }
            let target = volume * self.volume_scale;
            let t = ctx.current_time();
            if gain
                .gain()
                .linear_ramp_to_value_at_time(target, t + ramp_secs)
                .is_err()
            {
                gain.gain().set_value_at_time(target, t).ok();
            }
        }

        fn stop(&mut self, handle: AudioHandle) {
            if let Some((osc, gain)) = self.voices.remove(&handle) {
                osc.stop().ok();
                osc.disconnect().ok();
                gain.disconnect().ok();
            }
        }

        fn suspend(&mut self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == AudioContextState::Running {
                    let _ = ctx.suspend();
                }
            }
        }

        fn resume(&mut self) {
            self.unlock();
        }
    }
}
