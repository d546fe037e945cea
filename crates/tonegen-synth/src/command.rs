//! Control → audio command protocol.

use core::fmt;
use tonegen_core::{ParamEvent, Waveform};

/// Identity of one voice instance.
///
/// IDs are assigned sequentially by the engine and never reused, so a stale
/// reference to a torn-down voice can never match a newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(u32);

impl VoiceId {
    /// Wrap a raw identifier.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "voice#{}", self.0)
    }
}

/// Which automation curve an event is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamTarget {
    /// Master output gain, applied after the voice mix.
    MasterGain,
    /// Private gain stage of one voice.
    VoiceGain(VoiceId),
    /// Frequency of one voice, in Hz.
    VoiceFrequency(VoiceId),
}

/// Instruction sent from the control thread to the [`Renderer`](crate::Renderer).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderCommand {
    /// Allocate a running voice with a silent gain stage.
    StartVoice {
        /// Identity of the new voice.
        id: VoiceId,
        /// Initial frequency in Hz.
        frequency: f32,
        /// Initial waveform.
        waveform: Waveform,
    },
    /// Destroy a voice. Unknown IDs are ignored.
    StopVoice {
        /// Voice to destroy.
        id: VoiceId,
    },
    /// Change the waveform of a voice at its next cycle.
    SetWaveform {
        /// Voice to change.
        id: VoiceId,
        /// New waveform.
        waveform: Waveform,
    },
    /// Apply an automation event to a curve.
    Automate {
        /// Curve to modify.
        target: ParamTarget,
        /// Event to apply.
        event: ParamEvent,
    },
}
