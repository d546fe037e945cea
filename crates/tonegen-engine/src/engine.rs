//! The tone engine state machine.
//!
//! ```text
//!            play()                      stop()
//!   Idle ───────────▶ Sounding ───────────────────▶ Releasing ──▶ Idle
//!    ▲                   ▲                           │  (teardown fired
//!    │                   └──────── play() ───────────┘   for every voice)
//!    └──────────────── detach() / attach() ───────────────────────────┘
//! ```
//!
//! `is_playing()` reflects intent and flips synchronously; ramps and teardowns
//! complete later on the synthesis clock. A `play()` during `Releasing` starts
//! fresh voice instances while the old ones finish fading, and the old
//! instances' teardowns only ever destroy the instances they were scheduled
//! for.
//!
//! The engine is detached until an output is attached. While detached,
//! settings are still recorded but nothing sounds.

use tonegen_core::{NoteLabel, ParamEvent, SampleClock, Waveform, frequency_to_note};
use tonegen_synth::{ParamTarget, RenderCommand, VoiceId};

use crate::envelope::EnvelopeScheduler;
use crate::lane::ParamLane;
use crate::presets::{Interval, Preset};
use crate::settings::{EngineTiming, Slot, ToneSettings};
use crate::sink::AutomationSink;
use crate::teardown::TeardownQueue;
use crate::voice::OscillatorVoice;

/// Observable engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No voices.
    Idle,
    /// Primary voice active, secondary optional.
    Sounding,
    /// Stopped, with at least one voice still fading before teardown.
    Releasing,
}

/// Audio path the engine is attached to.
struct Output {
    sink: Box<dyn AutomationSink>,
    clock: SampleClock,
    master: ParamLane,
    /// Seconds between the clock and the first frame a command sent now is
    /// guaranteed to reach.
    lookahead: f64,
}

impl Output {
    /// Clock time new automation is anchored at.
    fn anchor(&self) -> f64 {
        self.clock.now() + self.lookahead
    }
}

/// One- or two-voice tone generator with click-free start, stop and retune.
///
/// # Example
///
/// ```rust
/// use tonegen_core::SampleClock;
/// use tonegen_engine::{EngineState, ToneEngine};
/// use tonegen_synth::RenderCommand;
///
/// let mut engine = ToneEngine::default();
/// engine.attach(Box::new(Vec::<RenderCommand>::new()), SampleClock::new(48000.0));
///
/// engine.play();
/// assert_eq!(engine.state(), EngineState::Sounding);
/// engine.stop();
/// assert_eq!(engine.state(), EngineState::Releasing);
/// ```
pub struct ToneEngine {
    settings: ToneSettings,
    timing: EngineTiming,
    envelope: EnvelopeScheduler,
    dual_envelope: EnvelopeScheduler,
    output: Option<Output>,
    primary: Option<OscillatorVoice>,
    secondary: Option<OscillatorVoice>,
    releasing: Vec<OscillatorVoice>,
    teardowns: TeardownQueue,
    next_voice: u32,
    playing: bool,
}

impl Default for ToneEngine {
    fn default() -> Self {
        Self::new(ToneSettings::default(), EngineTiming::default())
    }
}

impl std::fmt::Debug for ToneEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneEngine")
            .field("state", &self.state())
            .field("settings", &self.settings)
            .field("attached", &self.output.is_some())
            .field("releasing", &self.releasing.len())
            .finish_non_exhaustive()
    }
}

fn next_id(counter: &mut u32) -> VoiceId {
    let id = VoiceId::new(*counter);
    *counter = counter.wrapping_add(1);
    id
}

impl ToneEngine {
    /// Create a detached engine.
    pub fn new(settings: ToneSettings, timing: EngineTiming) -> Self {
        let dual_guard = (timing.dual_teardown - timing.dual_fade).max(0.0);
        Self {
            settings,
            timing,
            envelope: EnvelopeScheduler::new(timing.release_guard),
            dual_envelope: EnvelopeScheduler::new(dual_guard),
            output: None,
            primary: None,
            secondary: None,
            releasing: Vec::new(),
            teardowns: TeardownQueue::new(),
            next_voice: 0,
            playing: false,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Attach to an audio path, replacing any previous one.
    ///
    /// All voices are dropped (the new renderer has none) and the master gain
    /// is set to the current master volume. The engine is left idle.
    ///
    /// Automation is anchored at the clock's current frame, which suits a
    /// renderer driven between control calls. A renderer running on its own
    /// thread should be attached with
    /// [`attach_with_lookahead`](Self::attach_with_lookahead).
    pub fn attach(&mut self, sink: Box<dyn AutomationSink>, clock: SampleClock) {
        self.attach_with_lookahead(sink, clock, 0);
    }

    /// Attach to an audio path whose commands may reach the renderer up to
    /// `lookahead_frames` after the clock reading.
    ///
    /// The clock marks the start of the buffer being rendered, and commands
    /// sent mid-buffer are only drained at the next one. Anchoring every ramp
    /// one buffer ahead keeps it from starting in frames that were already
    /// rendered from the old curve.
    pub fn attach_with_lookahead(
        &mut self,
        mut sink: Box<dyn AutomationSink>,
        clock: SampleClock,
        lookahead_frames: u64,
    ) {
        self.drop_voices();
        #[allow(clippy::cast_precision_loss)]
        let lookahead = lookahead_frames as f64 / f64::from(clock.sample_rate());
        let now = clock.now() + lookahead;
        let mut master = ParamLane::new(ParamTarget::MasterGain, 0.0);
        master.apply(
            sink.as_mut(),
            ParamEvent::SetValue {
                value: self.settings.volume1(),
                time: now,
            },
        );
        self.output = Some(Output {
            sink,
            clock,
            master,
            lookahead,
        });
        tracing::info!(
            volume = self.settings.volume1(),
            lookahead_frames,
            "engine attached"
        );
    }

    /// Detach from the audio path. Every later control call only records
    /// settings until [`attach`](Self::attach) is called again.
    pub fn detach(&mut self) {
        self.drop_voices();
        if self.output.take().is_some() {
            tracing::info!("engine detached");
        }
    }

    /// Whether an audio path is attached.
    pub fn is_attached(&self) -> bool {
        self.output.is_some()
    }

    fn drop_voices(&mut self) {
        self.primary = None;
        self.secondary = None;
        self.releasing.clear();
        self.teardowns.clear();
        self.playing = false;
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    /// Start sounding. No-op if already sounding or detached.
    ///
    /// The primary voice ramps from 0 to full over the attack time; if dual
    /// tone is enabled the secondary ramps to `volume2` over the same window.
    pub fn play(&mut self) {
        if self.playing {
            tracing::debug!("play ignored: already sounding");
            return;
        }
        let Some(output) = self.output.as_mut() else {
            tracing::debug!("play ignored: no audio output");
            return;
        };

        let now = output.anchor();
        let attack = self.settings.attack_seconds();
        let waveform = self.settings.waveform();

        let mut primary = OscillatorVoice::start(
            next_id(&mut self.next_voice),
            Slot::Primary,
            self.settings.frequency1(),
            waveform,
            output.sink.as_mut(),
        );
        self.envelope
            .fade_in(primary.gain_lane_mut(), output.sink.as_mut(), 1.0, attack, now);
        self.primary = Some(primary);

        if self.settings.dual_enabled() {
            let mut secondary = OscillatorVoice::start(
                next_id(&mut self.next_voice),
                Slot::Secondary,
                self.settings.frequency2(),
                waveform,
                output.sink.as_mut(),
            );
            self.envelope.fade_in(
                secondary.gain_lane_mut(),
                output.sink.as_mut(),
                self.settings.volume2(),
                attack,
                now,
            );
            self.secondary = Some(secondary);
        }

        self.playing = true;
        tracing::info!(
            frequency = self.settings.frequency1(),
            waveform = %waveform,
            dual = self.settings.dual_enabled(),
            "tone started"
        );
    }

    /// Stop sounding. No-op if not sounding.
    ///
    /// Every active voice fades from its current gain to 0 over the release
    /// time and is torn down `release + guard` later by [`poll`](Self::poll).
    pub fn stop(&mut self) {
        if !self.playing {
            tracing::debug!("stop ignored: not sounding");
            return;
        }
        self.playing = false;
        let Some(output) = self.output.as_mut() else {
            self.primary = None;
            self.secondary = None;
            return;
        };

        let now = output.anchor();
        let release = self.settings.release_seconds();
        for mut voice in [self.primary.take(), self.secondary.take()]
            .into_iter()
            .flatten()
        {
            if let Some(due) = voice.stop(&self.envelope, release, now, output.sink.as_mut()) {
                self.teardowns.schedule(voice.id(), due);
            }
            self.releasing.push(voice);
        }
        tracing::info!(release_ms = self.settings.release_ms(), "tone stopped");
    }

    /// Play if idle, stop if sounding.
    pub fn toggle(&mut self) {
        if self.playing {
            self.stop();
        } else {
            self.play();
        }
    }

    /// Run due teardown tasks against the synthesis clock.
    ///
    /// A task only destroys the exact voice instance it was scheduled for; a
    /// task whose voice is already gone does nothing. Returns the number of
    /// voices destroyed.
    pub fn poll(&mut self) -> usize {
        let Some(output) = self.output.as_mut() else {
            return 0;
        };
        let now = output.clock.now();
        let mut destroyed = 0;
        for task in self.teardowns.take_due(now) {
            match self.releasing.iter().position(|v| v.id() == task.voice) {
                Some(index) => {
                    self.releasing.remove(index);
                    output
                        .sink
                        .submit(RenderCommand::StopVoice { id: task.voice });
                    destroyed += 1;
                    tracing::debug!(voice = %task.voice, "voice torn down");
                }
                None => tracing::debug!(voice = %task.voice, "stale teardown ignored"),
            }
        }
        destroyed
    }

    // -----------------------------------------------------------------------
    // Parameters
    // -----------------------------------------------------------------------

    /// Set a slot's frequency (clamped to [20, 20000] Hz), retuning the live
    /// voice with a short glide if sounding.
    ///
    /// Returns the note label when the primary frequency changed.
    pub fn set_frequency(&mut self, hz: f32, slot: Slot) -> Option<NoteLabel> {
        let hz = self.settings.set_frequency(slot, hz);

        if self.playing
            && let Some(output) = self.output.as_mut()
        {
            let voice = match slot {
                Slot::Primary => self.primary.as_mut(),
                Slot::Secondary => self.secondary.as_mut(),
            };
            if let Some(voice) = voice {
                let now = output.anchor();
                voice.retune(
                    hz,
                    &self.envelope,
                    self.timing.retune_glide,
                    now,
                    output.sink.as_mut(),
                );
            }
        }

        match slot {
            Slot::Primary => Some(self.note_label()),
            Slot::Secondary => None,
        }
    }

    /// Shift the primary frequency by `delta_hz` (fine tuning).
    pub fn nudge_frequency(&mut self, delta_hz: f32) -> NoteLabel {
        let target = self.settings.frequency1() + delta_hz;
        self.set_frequency(target, Slot::Primary);
        self.note_label()
    }

    /// Change the waveform of every active voice without restarting them.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.settings.set_waveform(waveform);
        if !self.playing {
            return;
        }
        if let Some(output) = self.output.as_mut() {
            for voice in [self.primary.as_mut(), self.secondary.as_mut()]
                .into_iter()
                .flatten()
            {
                voice.set_waveform(waveform, output.sink.as_mut());
            }
        }
    }

    /// Set the master volume (clamped to [0, 1]).
    ///
    /// Glides while anything is audible; jumps while fully idle so the next
    /// `play()` starts at the new level.
    pub fn set_master_volume(&mut self, volume: f32) {
        let volume = self.settings.set_volume1(volume);
        let audible = self.playing || !self.releasing.is_empty();
        let Some(output) = self.output.as_mut() else {
            return;
        };
        let now = output.anchor();
        let time_constant = if audible {
            self.timing.master_glide
        } else {
            0.0
        };
        self.envelope.glide(
            &mut output.master,
            output.sink.as_mut(),
            volume,
            time_constant,
            now,
        );
    }

    /// Set the secondary voice level (clamped to [0, 1]), gliding the live
    /// secondary gain if it is sounding.
    pub fn set_volume2(&mut self, volume: f32) {
        let volume = self.settings.set_volume2(volume);
        if !(self.playing && self.settings.dual_enabled()) {
            return;
        }
        if let (Some(output), Some(voice)) = (self.output.as_mut(), self.secondary.as_mut()) {
            let now = output.anchor();
            self.envelope.glide(
                voice.gain_lane_mut(),
                output.sink.as_mut(),
                volume,
                self.timing.volume2_glide,
                now,
            );
        }
    }

    /// Enable or disable the secondary voice.
    ///
    /// While sounding, enabling starts the secondary and ramps it to `volume2`
    /// over the attack time; disabling fades it out and tears it down after a
    /// fixed short delay. While idle only the flag changes.
    pub fn enable_dual_tone(&mut self, enabled: bool) {
        self.settings.set_dual_enabled(enabled);

        if enabled {
            if !self.playing || self.secondary.is_some() {
                return;
            }
            let Some(output) = self.output.as_mut() else {
                return;
            };
            let now = output.anchor();
            let mut secondary = OscillatorVoice::start(
                next_id(&mut self.next_voice),
                Slot::Secondary,
                self.settings.frequency2(),
                self.settings.waveform(),
                output.sink.as_mut(),
            );
            self.envelope.fade_in(
                secondary.gain_lane_mut(),
                output.sink.as_mut(),
                self.settings.volume2(),
                self.settings.attack_seconds(),
                now,
            );
            self.secondary = Some(secondary);
            tracing::info!(frequency = self.settings.frequency2(), "dual tone on");
        } else if let Some(mut voice) = self.secondary.take() {
            if let Some(output) = self.output.as_mut() {
                let now = output.anchor();
                if let Some(due) = voice.stop(
                    &self.dual_envelope,
                    self.timing.dual_fade,
                    now,
                    output.sink.as_mut(),
                ) {
                    self.teardowns.schedule(voice.id(), due);
                }
                self.releasing.push(voice);
            }
            tracing::info!("dual tone off");
        }
    }

    /// Set the attack duration in milliseconds (clamped to be non-negative).
    pub fn set_attack(&mut self, ms: f32) {
        self.settings.set_attack_ms(ms);
    }

    /// Set the release duration in milliseconds (clamped to be non-negative).
    pub fn set_release(&mut self, ms: f32) {
        self.settings.set_release_ms(ms);
    }

    /// Tune the primary voice to a preset, starting playback if idle.
    pub fn apply_preset(&mut self, preset: Preset) -> NoteLabel {
        self.set_frequency(preset.frequency(), Slot::Primary);
        if !self.playing {
            self.play();
        }
        tracing::debug!(preset = %preset, "preset applied");
        self.note_label()
    }

    /// Set the secondary frequency to `frequency1 × ratio` and enable dual
    /// tone.
    ///
    /// The product is clamped like any other frequency, so an out-of-range
    /// ratio silently lands on the range edge. Returns the frequency actually
    /// applied.
    pub fn set_interval_from_base(&mut self, ratio: f32) -> f32 {
        let requested = self.settings.frequency1() * ratio;
        self.set_frequency(requested, Slot::Secondary);
        let applied = self.settings.frequency2();
        if applied != requested {
            tracing::debug!(requested, applied, "interval clamped to playable range");
        }
        if !self.settings.dual_enabled() || self.secondary.is_none() {
            self.enable_dual_tone(true);
        }
        applied
    }

    /// [`set_interval_from_base`](Self::set_interval_from_base) with a named
    /// interval.
    pub fn set_interval(&mut self, interval: Interval) -> f32 {
        self.set_interval_from_base(interval.ratio())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Current state.
    pub fn state(&self) -> EngineState {
        if self.playing {
            EngineState::Sounding
        } else if self.releasing.is_empty() {
            EngineState::Idle
        } else {
            EngineState::Releasing
        }
    }

    /// True while sounding (intent, not ramp completion).
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Note label of the primary frequency.
    pub fn note_label(&self) -> NoteLabel {
        frequency_to_note(self.settings.frequency1())
    }

    /// Current settings.
    pub fn settings(&self) -> &ToneSettings {
        &self.settings
    }

    /// Timing constants.
    pub fn timing(&self) -> &EngineTiming {
        &self.timing
    }

    /// The live voice in `slot`, if any.
    pub fn voice(&self, slot: Slot) -> Option<&OscillatorVoice> {
        match slot {
            Slot::Primary => self.primary.as_ref(),
            Slot::Secondary => self.secondary.as_ref(),
        }
    }

    /// Number of live (not releasing) voices.
    pub fn active_voices(&self) -> usize {
        usize::from(self.primary.is_some()) + usize::from(self.secondary.is_some())
    }

    /// Voices faded out but not yet torn down.
    pub fn releasing_voices(&self) -> &[OscillatorVoice] {
        &self.releasing
    }

    /// Number of pending teardown tasks.
    pub fn pending_teardowns(&self) -> usize {
        self.teardowns.len()
    }

    /// Clock time at which the next teardown becomes due.
    pub fn next_teardown(&self) -> Option<f64> {
        self.teardowns.next_due()
    }

    /// Current synthesis clock time, if attached.
    pub fn now(&self) -> Option<f64> {
        self.output.as_ref().map(|o| o.clock.now())
    }

    /// Master gain at the current clock time, if attached.
    pub fn master_gain(&self) -> Option<f32> {
        self.output
            .as_ref()
            .map(|o| o.master.value_at(o.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const SR: f32 = 48000.0;

    /// Sink that shares its log with the test.
    #[derive(Clone, Default)]
    struct SharedLog(Arc<Mutex<Vec<RenderCommand>>>);

    impl AutomationSink for SharedLog {
        fn submit(&mut self, command: RenderCommand) {
            self.0.lock().unwrap().push(command);
        }
    }

    impl SharedLog {
        fn stopped(&self) -> Vec<VoiceId> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter_map(|c| match c {
                    RenderCommand::StopVoice { id } => Some(*id),
                    _ => None,
                })
                .collect()
        }
        fn started(&self) -> Vec<VoiceId> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter_map(|c| match c {
                    RenderCommand::StartVoice { id, .. } => Some(*id),
                    _ => None,
                })
                .collect()
        }
    }

    fn attached() -> (ToneEngine, SharedLog, SampleClock) {
        let log = SharedLog::default();
        let clock = SampleClock::new(SR);
        let mut engine = ToneEngine::default();
        engine.attach(Box::new(log.clone()), clock.clone());
        (engine, log, clock)
    }

    fn advance_ms(clock: &SampleClock, ms: f64) {
        clock.advance((ms * f64::from(SR) / 1000.0) as u64);
    }

    #[test]
    fn test_play_is_idempotent() {
        let (mut engine, log, _clock) = attached();
        engine.play();
        engine.play();
        assert_eq!(log.started().len(), 1);
        assert_eq!(engine.state(), EngineState::Sounding);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let (mut engine, log, _clock) = attached();
        let before = log.0.lock().unwrap().len();
        engine.stop();
        assert_eq!(log.0.lock().unwrap().len(), before);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_stop_schedules_teardown_after_release_and_guard() {
        let (mut engine, log, clock) = attached();
        engine.play();
        engine.stop();
        assert!(!engine.is_playing());
        assert_eq!(engine.state(), EngineState::Releasing);
        // 50 ms release + 50 ms guard
        let due = engine.next_teardown().unwrap();
        assert!((due - 0.1).abs() < 1e-9, "due at {due}");

        advance_ms(&clock, 99.0);
        assert_eq!(engine.poll(), 0);
        advance_ms(&clock, 1.0);
        assert_eq!(engine.poll(), 1);
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(log.stopped(), vec![VoiceId::new(0)]);
    }

    #[test]
    fn test_stale_teardown_spares_new_voice() {
        let (mut engine, log, clock) = attached();
        engine.play();
        engine.stop();
        advance_ms(&clock, 20.0);
        engine.play();
        let fresh = engine.voice(Slot::Primary).unwrap().id();

        advance_ms(&clock, 200.0);
        engine.poll();
        assert_eq!(log.stopped(), vec![VoiceId::new(0)]);
        assert_ne!(fresh, VoiceId::new(0));
        assert!(engine.is_playing());
        assert_eq!(engine.voice(Slot::Primary).unwrap().id(), fresh);
    }

    #[test]
    fn test_release_starts_from_actual_gain() {
        let (mut engine, _log, clock) = attached();
        engine.play();
        advance_ms(&clock, 2.5); // quarter of the 10 ms attack
        let gain_at_stop = engine.voice(Slot::Primary).unwrap().gain_at(clock.now());
        engine.stop();
        let releasing = &engine.releasing_voices()[0];
        let after = releasing.gain_at(clock.now());
        assert!((gain_at_stop - 0.25).abs() < 1e-3, "got {gain_at_stop}");
        assert!((after - gain_at_stop).abs() < 1e-6);
    }

    #[test]
    fn test_detached_engine_records_settings_only() {
        let mut engine = ToneEngine::default();
        engine.play();
        assert!(!engine.is_playing());
        engine.set_frequency(880.0, Slot::Primary);
        engine.set_master_volume(0.9);
        assert_eq!(engine.settings().frequency1(), 880.0);
        assert_eq!(engine.settings().volume1(), 0.9);
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.poll(), 0);
    }

    #[test]
    fn test_frequency_clamping() {
        let (mut engine, _log, _clock) = attached();
        engine.set_frequency(50_000.0, Slot::Primary);
        assert_eq!(engine.settings().frequency1(), 20_000.0);
        engine.set_frequency(-5.0, Slot::Primary);
        assert_eq!(engine.settings().frequency1(), 20.0);
    }

    #[test]
    fn test_set_frequency_returns_label_for_primary_only() {
        let (mut engine, _log, _clock) = attached();
        let label = engine.set_frequency(261.63, Slot::Primary).unwrap();
        assert_eq!(label.to_string(), "C4");
        assert!(engine.set_frequency(300.0, Slot::Secondary).is_none());
    }

    #[test]
    fn test_dual_tone_enable_while_sounding() {
        let (mut engine, _log, _clock) = attached();
        engine.play();
        engine.enable_dual_tone(true);
        assert_eq!(engine.active_voices(), 2);
        engine.enable_dual_tone(true);
        assert_eq!(engine.active_voices(), 2);
    }

    #[test]
    fn test_dual_tone_disable_uses_fixed_teardown() {
        let (mut engine, _log, clock) = attached();
        engine.set_release(2000.0);
        engine.enable_dual_tone(true);
        engine.play();
        engine.enable_dual_tone(false);
        assert_eq!(engine.active_voices(), 1);
        let due = engine.next_teardown().unwrap();
        assert!((due - 0.1).abs() < 1e-9, "due at {due}");
        advance_ms(&clock, 100.0);
        assert_eq!(engine.poll(), 1);
        assert!(engine.is_playing());
    }

    #[test]
    fn test_dual_tone_flag_while_idle() {
        let (mut engine, log, _clock) = attached();
        engine.enable_dual_tone(true);
        assert!(log.started().is_empty());
        engine.play();
        assert_eq!(log.started().len(), 2);
    }

    #[test]
    fn test_interval_from_base() {
        let (mut engine, _log, _clock) = attached();
        let applied = engine.set_interval_from_base(1.5);
        assert_eq!(applied, 660.0);
        assert_eq!(engine.settings().frequency2(), 660.0);
        assert!(engine.settings().dual_enabled());
    }

    #[test]
    fn test_interval_out_of_range_clamps() {
        let (mut engine, _log, _clock) = attached();
        engine.set_frequency(15_000.0, Slot::Primary);
        assert_eq!(engine.set_interval(Interval::Octave), 20_000.0);
    }

    #[test]
    fn test_preset_autoplays_when_idle() {
        let (mut engine, _log, _clock) = attached();
        let label = engine.apply_preset(Preset::Bass);
        assert!(engine.is_playing());
        assert_eq!(engine.settings().frequency1(), 100.0);
        assert_eq!(label.name, "G");
    }

    #[test]
    fn test_toggle() {
        let (mut engine, _log, _clock) = attached();
        engine.toggle();
        assert!(engine.is_playing());
        engine.toggle();
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_master_volume_jumps_when_idle_and_glides_when_sounding() {
        let (mut engine, _log, clock) = attached();
        engine.set_master_volume(0.8);
        assert_eq!(engine.master_gain(), Some(0.8));

        engine.play();
        engine.set_master_volume(0.2);
        advance_ms(&clock, 5.0);
        let g = engine.master_gain().unwrap();
        assert!(g < 0.8 && g > 0.2, "Expected glide in progress, got {g}");
    }

    #[test]
    fn test_reattach_resets_voices() {
        let (mut engine, _log, _clock) = attached();
        engine.play();
        engine.stop();
        let log = SharedLog::default();
        engine.attach(Box::new(log.clone()), SampleClock::new(SR));
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.pending_teardowns(), 0);
    }

    #[test]
    fn test_nudge() {
        let (mut engine, _log, _clock) = attached();
        engine.nudge_frequency(10.0);
        assert_eq!(engine.settings().frequency1(), 450.0);
        engine.nudge_frequency(-1.0);
        assert_eq!(engine.settings().frequency1(), 449.0);
    }
}
