//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and a looping background tune - no
//! external files needed. On native targets the manager is silent.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Snake changed direction
    Turn,
    /// Food or ruby eaten
    Eat,
    /// Run ended
    Die,
    /// Food timer running low
    Beep,
}

/// A single oscillator note, optionally sweeping in pitch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration_s: f64,
    pub gain: f32,
}

impl SoundEffect {
    /// The effect a simulation event should trigger, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Turned => Some(SoundEffect::Turn),
            GameEvent::AteFood | GameEvent::AteRuby => Some(SoundEffect::Eat),
            GameEvent::Died { .. } | GameEvent::TimedOut => Some(SoundEffect::Die),
            GameEvent::LowTimeWarning { .. } => Some(SoundEffect::Beep),
            _ => None,
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            SoundEffect::Turn => Tone {
                start_hz: 440.0,
                end_hz: 440.0,
                duration_s: 0.05,
                gain: 0.05,
            },
            SoundEffect::Eat => Tone {
                start_hz: 660.0,
                end_hz: 660.0,
                duration_s: 0.08,
                gain: 0.08,
            },
            SoundEffect::Beep => Tone {
                start_hz: 880.0,
                end_hz: 880.0,
                duration_s: 0.1,
                gain: 0.1,
            },
            // Falling two octaves
            SoundEffect::Die => Tone {
                start_hz: 440.0,
                end_hz: 110.0,
                duration_s: 0.5,
                gain: 0.2,
            },
        }
    }
}

/// Background tune: C4 D4 E4 C4, one note per second, 0.4 s each
pub const BGM_NOTES: [f32; 4] = [262.0, 294.0, 330.0, 262.0];
pub const BGM_NOTE_SECONDS: f32 = 0.4;
pub const BGM_AMPLITUDE: f32 = 0.03;

/// One loop (4 s, mono) of the background tune
pub fn bgm_samples(sample_rate: u32) -> Vec<f32> {
    let beat = sample_rate as usize;
    let note_len = (sample_rate as f32 * BGM_NOTE_SECONDS) as usize;
    let mut data = vec![0.0; beat * BGM_NOTES.len()];
    for (i, freq) in BGM_NOTES.iter().enumerate() {
        for j in 0..note_len {
            let t = j as f32 / sample_rate as f32;
            data[i * beat + j] = (std::f32::consts::TAU * freq * t).sin() * BGM_AMPLITUDE;
        }
    }
    data
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<web_sys::AudioContext>,
    #[cfg(target_arch = "wasm32")]
    bgm: Option<web_sys::AudioBufferSourceNode>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    /// Backend missing; mute cannot be lifted
    unavailable: bool,
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context or on very old browsers
        let ctx = web_sys::AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let unavailable = ctx.is_none();
        let mut manager = Self {
            ctx,
            bgm: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            unavailable,
        };
        manager.apply_settings(settings);
        manager
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(settings: &Settings) -> Self {
        let mut manager = Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            unavailable: false,
        };
        manager.apply_settings(settings);
        manager
    }

    /// A manager with no backend, permanently muted
    pub fn disabled() -> Self {
        let mut manager = Self::new(&Settings::default());
        manager.force_disable();
        manager
    }

    fn force_disable(&mut self) {
        self.stop_music();
        #[cfg(target_arch = "wasm32")]
        {
            self.ctx = None;
        }
        self.unavailable = true;
        self.muted = true;
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.set_muted(settings.muted);
    }

    pub fn is_available(&self) -> bool {
        !self.unavailable
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Mute/unmute all audio. Muting also stops the music.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted || self.unavailable;
        if self.muted {
            self.stop_music();
        }
    }

    fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Play whatever sounds a batch of simulation events calls for
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Resume audio context (required after user gesture)
    #[cfg(target_arch = "wasm32")]
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn resume(&self) {}

    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.sfx_gain();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        if web::play_tone(ctx, effect.tone(), vol).is_none() {
            log::debug!("Could not play {:?}", effect);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, effect: SoundEffect) {
        if self.sfx_gain() > 0.0 {
            log::trace!("sfx {:?}", effect);
        }
    }

    /// Start (or restart) the looping background tune
    #[cfg(target_arch = "wasm32")]
    pub fn start_music(&mut self) {
        self.stop_music();
        let vol = self.music_gain();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.bgm = web::start_loop(ctx, vol);
        if self.bgm.is_none() {
            log::warn!("Background music unavailable");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn start_music(&mut self) {
        if self.music_gain() > 0.0 {
            log::trace!("music on");
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn stop_music(&mut self) {
        if let Some(src) = self.bgm.take() {
            let _ = src.stop();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn stop_music(&mut self) {}
}

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioBufferSourceNode, AudioContext, GainNode};

    use super::{Tone, bgm_samples};

    fn gain_node(ctx: &AudioContext, gain: f32) -> Option<GainNode> {
        let node = ctx.create_gain().ok()?;
        node.gain().set_value(gain);
        node.connect_with_audio_node(&ctx.destination()).ok()?;
        Some(node)
    }

    pub(super) fn play_tone(ctx: &AudioContext, tone: Tone, vol: f32) -> Option<()> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = gain_node(ctx, tone.gain * vol)?;
        osc.connect_with_audio_node(&gain).ok()?;

        let t = ctx.current_time();
        osc.frequency().set_value_at_time(tone.start_hz, t).ok()?;
        if tone.end_hz != tone.start_hz {
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.end_hz, t + tone.duration_s)
                .ok()?;
        }

        osc.start().ok()?;
        osc.stop_with_when(t + tone.duration_s).ok()
    }

    pub(super) fn start_loop(ctx: &AudioContext, vol: f32) -> Option<AudioBufferSourceNode> {
        let sample_rate = ctx.sample_rate();
        let mut samples = bgm_samples(sample_rate as u32);
        let buffer = ctx
            .create_buffer(1, samples.len() as u32, sample_rate)
            .ok()?;
        buffer.copy_to_channel(&mut samples, 0).ok()?;

        let src = ctx.create_buffer_source().ok()?;
        src.set_buffer(Some(&buffer));
        src.set_loop(true);
        let gain = gain_node(ctx, vol)?;
        src.connect_with_audio_node(&gain).ok()?;
        src.start().ok()?;
        Some(src)
    }
}
