//! Realtime mixer.
//!
//! The [`Renderer`] lives inside the audio callback. Each buffer it:
//!
//! 1. drains pending [`RenderCommand`]s with `try_recv` (never blocks),
//! 2. renders every voice at the absolute clock time of each frame and mixes
//!    them through the master gain curve,
//! 3. copies the mono mix to every output channel and the scope tap,
//! 4. advances the shared [`SampleClock`].
//!
//! Commands are only seen at the start of a buffer, and automation events
//! carry absolute times. An event anchored inside a buffer that was already
//! rendered would jump the curve, so the control side anchors its events at
//! least one buffer ahead of the clock.

use crossbeam_channel::Receiver;
use tonegen_core::{AutomationCurve, SampleClock, Waveform};

use crate::command::{ParamTarget, RenderCommand, VoiceId};
use crate::scope::ScopeWriter;
use crate::voice::RenderVoice;

/// Voices preallocated so starting one never allocates on the audio thread in
/// normal use (two live voices plus a few releasing).
const VOICE_CAPACITY: usize = 8;

/// Audio-thread mixer driven by control commands.
///
/// Voices come from a pool built in [`new`](Self::new); a stopped voice goes
/// back to the pool with its curve storage intact.
pub struct Renderer {
    clock: SampleClock,
    commands: Receiver<RenderCommand>,
    voices: Vec<RenderVoice>,
    pool: Vec<RenderVoice>,
    master: AutomationCurve,
    scope: ScopeWriter,
    channels: usize,
}

impl Renderer {
    /// Create a renderer writing `channels` interleaved channels.
    ///
    /// The master gain starts silent until the control side sets it.
    pub fn new(
        clock: SampleClock,
        commands: Receiver<RenderCommand>,
        scope: ScopeWriter,
        channels: usize,
    ) -> Self {
        let sample_rate = clock.sample_rate();
        let pool = (0..VOICE_CAPACITY)
            .map(|_| RenderVoice::new(VoiceId::new(0), sample_rate, 440.0, Waveform::Sine))
            .collect();
        Self {
            clock,
            commands,
            voices: Vec::with_capacity(VOICE_CAPACITY),
            pool,
            master: AutomationCurve::new(0.0),
            scope,
            channels: channels.max(1),
        }
    }

    /// Number of voices currently allocated.
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Number of idle voices ready to be started without allocating.
    pub fn pooled_voices(&self) -> usize {
        self.pool.len()
    }

    /// Identities of the allocated voices.
    pub fn voice_ids(&self) -> impl Iterator<Item = VoiceId> + '_ {
        self.voices.iter().map(RenderVoice::id)
    }

    /// Look up a voice.
    pub fn voice(&self, id: VoiceId) -> Option<&RenderVoice> {
        self.voices.iter().find(|v| v.id() == id)
    }

    /// Master gain at clock time `t`.
    pub fn master_gain_at(&self, t: f64) -> f32 {
        self.master.value_at(t)
    }

    /// Shared clock.
    pub fn clock(&self) -> &SampleClock {
        &self.clock
    }

    /// Apply every queued command.
    pub fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }
    }

    /// Apply one command.
    pub fn apply(&mut self, command: RenderCommand) {
        match command {
            RenderCommand::StartVoice {
                id,
                frequency,
                waveform,
            } => {
                let voice = match self.pool.pop() {
                    Some(mut voice) => {
                        voice.restart(id, frequency, waveform);
                        voice
                    }
                    None => RenderVoice::new(id, self.clock.sample_rate(), frequency, waveform),
                };
                self.voices.push(voice);
            }
            RenderCommand::StopVoice { id } => {
                if let Some(index) = self.voices.iter().position(|v| v.id() == id) {
                    let voice = self.voices.swap_remove(index);
                    self.pool.push(voice);
                }
            }
            RenderCommand::SetWaveform { id, waveform } => {
                if let Some(voice) = self.voice_mut(id) {
                    voice.set_waveform(waveform);
                }
            }
            RenderCommand::Automate { target, event } => match target {
                ParamTarget::MasterGain => self.master.apply(event),
                ParamTarget::VoiceGain(id) => {
                    if let Some(voice) = self.voice_mut(id) {
                        voice.gain_mut().apply(event);
                    }
                }
                ParamTarget::VoiceFrequency(id) => {
                    if let Some(voice) = self.voice_mut(id) {
                        voice.pitch_mut().apply(event);
                    }
                }
            },
        }
    }

    fn voice_mut(&mut self, id: VoiceId) -> Option<&mut RenderVoice> {
        self.voices.iter_mut().find(|v| v.id() == id)
    }

    /// Fill an interleaved output buffer and advance the clock.
    ///
    /// A trailing partial frame (length not a multiple of the channel count)
    /// is zeroed.
    pub fn process(&mut self, output: &mut [f32]) {
        self.drain_commands();

        let start = self.clock.frames();
        let mut frames = 0u64;
        let mut chunks = output.chunks_exact_mut(self.channels);
        for frame in &mut chunks {
            let t = self.clock.time_of(start + frames);
            let mut mix = 0.0;
            for voice in &mut self.voices {
                mix += voice.render(t);
            }
            let sample = mix * self.master.value_at(t);
            frame.fill(sample);
            self.scope.push(sample);
            frames += 1;
        }
        chunks.into_remainder().fill(0.0);

        self.clock.advance(frames);
    }
}
