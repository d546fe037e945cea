//! Audio-side voice: oscillator gated through its own gain stage.

use tonegen_core::{AutomationCurve, Waveform, clamp_frequency};

use crate::command::VoiceId;
use crate::oscillator::Oscillator;

/// One sounding voice as the renderer sees it.
///
/// Gain starts at 0; the control side brings it up with automation events.
/// Pitch follows its own curve, re-clamped to the playable range on every
/// sample.
#[derive(Debug, Clone)]
pub struct RenderVoice {
    id: VoiceId,
    oscillator: Oscillator,
    gain: AutomationCurve,
    pitch: AutomationCurve,
}

impl RenderVoice {
    /// Create a silent voice.
    pub fn new(id: VoiceId, sample_rate: f32, frequency: f32, waveform: Waveform) -> Self {
        let frequency = clamp_frequency(frequency);
        let mut oscillator = Oscillator::new(sample_rate);
        oscillator.set_frequency(frequency);
        oscillator.set_waveform_immediate(waveform);
        Self {
            id,
            oscillator,
            gain: AutomationCurve::new(0.0),
            pitch: AutomationCurve::new(frequency),
        }
    }

    /// Reuse this voice as a fresh, silent instance.
    ///
    /// Equivalent to [`new`](Self::new) at the same sample rate, without
    /// allocating.
    pub fn restart(&mut self, id: VoiceId, frequency: f32, waveform: Waveform) {
        let frequency = clamp_frequency(frequency);
        self.id = id;
        self.oscillator.reset();
        self.oscillator.set_frequency(frequency);
        self.oscillator.set_waveform_immediate(waveform);
        self.gain.reset(0.0);
        self.pitch.reset(frequency);
    }

    /// Voice identity.
    pub fn id(&self) -> VoiceId {
        self.id
    }

    /// Gain curve.
    pub fn gain_mut(&mut self) -> &mut AutomationCurve {
        &mut self.gain
    }

    /// Pitch curve, in Hz.
    pub fn pitch_mut(&mut self) -> &mut AutomationCurve {
        &mut self.pitch
    }

    /// Gain at clock time `t`.
    pub fn gain_at(&self, t: f64) -> f32 {
        self.gain.value_at(t)
    }

    /// Oscillator, for inspection.
    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    /// Change waveform at the next cycle boundary.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.oscillator.set_waveform(waveform);
    }

    /// Render one sample at clock time `t`.
    #[inline]
    pub fn render(&mut self, t: f64) -> f32 {
        let hz = clamp_frequency(self.pitch.value_at(t));
        if hz != self.oscillator.frequency() {
            self.oscillator.set_frequency(hz);
        }
        self.oscillator.advance() * self.gain.value_at(t)
    }
}
