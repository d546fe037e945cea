//! Control-side handle for one oscillator voice.

use tonegen_core::{Waveform, clamp_frequency};
use tonegen_synth::{ParamTarget, RenderCommand, VoiceId};

use crate::envelope::EnvelopeScheduler;
use crate::lane::ParamLane;
use crate::settings::Slot;
use crate::sink::AutomationSink;

/// A periodic signal source gated through its own gain stage.
///
/// The handle owns mirrors of the voice's gain and pitch curves; the sound
/// itself lives in the renderer under the same [`VoiceId`]. Once stopped, a
/// voice ignores further changes and only waits for its teardown.
#[derive(Debug, Clone)]
pub struct OscillatorVoice {
    id: VoiceId,
    slot: Slot,
    frequency: f32,
    waveform: Waveform,
    running: bool,
    gain: ParamLane,
    pitch: ParamLane,
}

impl OscillatorVoice {
    /// Allocate a running voice with a silent gain stage.
    ///
    /// The frequency is clamped. Amplitude comes up only through an envelope
    /// ramp issued by the owner.
    pub fn start(
        id: VoiceId,
        slot: Slot,
        frequency: f32,
        waveform: Waveform,
        sink: &mut dyn AutomationSink,
    ) -> Self {
        let frequency = clamp_frequency(frequency);
        sink.submit(RenderCommand::StartVoice {
            id,
            frequency,
            waveform,
        });
        tracing::debug!(voice = %id, ?slot, frequency, %waveform, "voice started");
        Self {
            id,
            slot,
            frequency,
            waveform,
            running: true,
            gain: ParamLane::new(ParamTarget::VoiceGain(id), 0.0),
            pitch: ParamLane::new(ParamTarget::VoiceFrequency(id), frequency),
        }
    }

    /// Instance identity.
    pub fn id(&self) -> VoiceId {
        self.id
    }

    /// Slot this voice was started for.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Last requested frequency in Hz (the glide target).
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Current waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// False once [`stop`](Self::stop) has been called.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Gain of the private gain stage at clock time `t`.
    pub fn gain_at(&self, t: f64) -> f32 {
        self.gain.value_at(t)
    }

    /// Frequency at clock time `t`, following any glide in progress.
    pub fn frequency_at(&self, t: f64) -> f32 {
        self.pitch.value_at(t)
    }

    /// The gain lane, for envelope scheduling by the owner.
    pub fn gain_lane_mut(&mut self) -> &mut ParamLane {
        &mut self.gain
    }

    /// Glide to a new (clamped) frequency while sounding.
    pub fn retune(
        &mut self,
        hz: f32,
        envelope: &EnvelopeScheduler,
        time_constant: f64,
        now: f64,
        sink: &mut dyn AutomationSink,
    ) {
        if !self.running {
            return;
        }
        self.frequency = clamp_frequency(hz);
        envelope.glide(&mut self.pitch, sink, self.frequency, time_constant, now);
    }

    /// Switch waveform without touching the gain; applies at the next cycle.
    pub fn set_waveform(&mut self, waveform: Waveform, sink: &mut dyn AutomationSink) {
        if !self.running || waveform == self.waveform {
            return;
        }
        self.waveform = waveform;
        sink.submit(RenderCommand::SetWaveform {
            id: self.id,
            waveform,
        });
    }

    /// Begin the release: fade the gain from its current value to 0 over
    /// `release` seconds.
    ///
    /// Returns the clock time at which the owner should tear the voice down,
    /// or `None` if the voice was already stopped.
    pub fn stop(
        &mut self,
        envelope: &EnvelopeScheduler,
        release: f64,
        now: f64,
        sink: &mut dyn AutomationSink,
    ) -> Option<f64> {
        if !self.running {
            return None;
        }
        self.running = false;
        let due = envelope.fade_out(&mut self.gain, sink, release, now);
        tracing::debug!(voice = %self.id, release, due, "voice releasing");
        Some(due)
    }
}
