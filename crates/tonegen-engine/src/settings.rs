//! User-facing tone settings and engine timing constants.

use tonegen_core::{Waveform, clamp_duration_ms, clamp_frequency, clamp_volume};

/// Oscillator slot addressed by frequency changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The primary tone, always present while sounding.
    Primary,
    /// The optional second tone.
    Secondary,
}

/// Settings owned by the [`ToneEngine`](crate::ToneEngine).
///
/// Every setter clamps its input and returns the value actually stored, so the
/// invariants (frequencies in [20, 20000] Hz, volumes in [0, 1], durations
/// non-negative) hold at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSettings {
    frequency1: f32,
    frequency2: f32,
    waveform: Waveform,
    volume1: f32,
    volume2: f32,
    attack_ms: f32,
    release_ms: f32,
    dual_enabled: bool,
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            frequency1: 440.0,
            frequency2: 554.0,
            waveform: Waveform::Sine,
            volume1: 0.5,
            volume2: 0.5,
            attack_ms: 10.0,
            release_ms: 50.0,
            dual_enabled: false,
        }
    }
}

impl ToneSettings {
    /// Frequency of a slot in Hz.
    pub fn frequency(&self, slot: Slot) -> f32 {
        match slot {
            Slot::Primary => self.frequency1,
            Slot::Secondary => self.frequency2,
        }
    }

    /// Primary frequency in Hz.
    pub fn frequency1(&self) -> f32 {
        self.frequency1
    }

    /// Secondary frequency in Hz.
    pub fn frequency2(&self) -> f32 {
        self.frequency2
    }

    /// Waveform shared by both voices.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Master volume.
    pub fn volume1(&self) -> f32 {
        self.volume1
    }

    /// Secondary voice level.
    pub fn volume2(&self) -> f32 {
        self.volume2
    }

    /// Attack duration in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Release duration in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Whether the secondary voice is enabled.
    pub fn dual_enabled(&self) -> bool {
        self.dual_enabled
    }

    /// Attack duration in seconds.
    pub fn attack_seconds(&self) -> f64 {
        f64::from(self.attack_ms) / 1000.0
    }

    /// Release duration in seconds.
    pub fn release_seconds(&self) -> f64 {
        f64::from(self.release_ms) / 1000.0
    }

    /// Store a clamped frequency for `slot`.
    pub fn set_frequency(&mut self, slot: Slot, hz: f32) -> f32 {
        let hz = clamp_frequency(hz);
        match slot {
            Slot::Primary => self.frequency1 = hz,
            Slot::Secondary => self.frequency2 = hz,
        }
        hz
    }

    /// Store the waveform.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Store a clamped master volume.
    pub fn set_volume1(&mut self, volume: f32) -> f32 {
        self.volume1 = clamp_volume(volume);
        self.volume1
    }

    /// Store a clamped secondary level.
    pub fn set_volume2(&mut self, volume: f32) -> f32 {
        self.volume2 = clamp_volume(volume);
        self.volume2
    }

    /// Store a clamped attack duration.
    pub fn set_attack_ms(&mut self, ms: f32) -> f32 {
        self.attack_ms = clamp_duration_ms(ms);
        self.attack_ms
    }

    /// Store a clamped release duration.
    pub fn set_release_ms(&mut self, ms: f32) -> f32 {
        self.release_ms = clamp_duration_ms(ms);
        self.release_ms
    }

    /// Store the dual-tone flag.
    pub fn set_dual_enabled(&mut self, enabled: bool) {
        self.dual_enabled = enabled;
    }
}

/// Fixed timing constants of the engine, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineTiming {
    /// Extra delay after a release ramp before the voice is destroyed.
    pub release_guard: f64,
    /// Time constant of master volume glides.
    pub master_glide: f64,
    /// Time constant of secondary level glides.
    pub volume2_glide: f64,
    /// Time constant of frequency glides.
    pub retune_glide: f64,
    /// Fade-out length when the secondary voice is disabled.
    pub dual_fade: f64,
    /// Delay before a disabled secondary voice is destroyed.
    pub dual_teardown: f64,
}

impl Default for EngineTiming {
    fn default() -> Self {
        Self {
            release_guard: 0.05,
            master_glide: 0.05,
            volume2_glide: 0.05,
            retune_glide: 0.01,
            dual_fade: 0.05,
            dual_teardown: 0.1,
        }
    }
}
