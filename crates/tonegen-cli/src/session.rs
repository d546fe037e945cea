//! Line commands for the interactive `play` session.
//!
//! Parsing is separate from execution so both can be tested without an audio
//! device: [`parse_command`] turns a line into a [`Command`], and
//! [`Session::handle_line`] applies it to a [`ToneEngine`].

use thiserror::Error;
use tonegen_core::{ParseWaveformError, Waveform};
use tonegen_engine::{
    EngineState, Interval, Preset, SampleSource, ScopeFrame, ScopeLoop, Slot, ToneEngine,
    UnknownInterval, UnknownPreset,
};

use crate::display::{
    format_frequency, format_note, format_secondary, format_volume, format_waveform_info,
};

/// Default step of `up`/`down`, in Hz.
pub const FINE_STEP_HZ: f32 = 1.0;

/// Interval argument: a named interval or a raw frequency ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntervalArg {
    /// Named musical interval.
    Named(Interval),
    /// Ratio applied to the primary frequency.
    Ratio(f32),
}

/// One parsed session command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Start sounding.
    Play,
    /// Stop sounding.
    Stop,
    /// Play if idle, stop if sounding.
    Toggle,
    /// Set the primary frequency.
    Frequency(f32),
    /// Set the secondary frequency.
    Frequency2(f32),
    /// Nudge the primary frequency by a signed amount.
    Nudge(f32),
    /// Change the waveform.
    Wave(Waveform),
    /// Master volume in percent.
    Volume(f32),
    /// Secondary volume in percent.
    Volume2(f32),
    /// Enable or disable the secondary tone.
    Dual(bool),
    /// Set the secondary tone relative to the primary.
    Interval(IntervalArg),
    /// Tune to a preset.
    Preset(Preset),
    /// Attack in milliseconds.
    Attack(f32),
    /// Release in milliseconds.
    Release(f32),
    /// Print the current state.
    Status,
    /// Show or hide the live scope line.
    Scope(bool),
    /// Reopen the audio output.
    Reinit,
    /// Print the command list.
    Help,
    /// Leave the session.
    Quit,
}

/// Errors from [`parse_command`].
#[derive(Debug, Error, PartialEq)]
pub enum ParseCommandError {
    /// First word is not a command.
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    /// A required argument is absent.
    #[error("'{command}' needs {what}")]
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// Description of the expected argument.
        what: &'static str,
    },

    /// An argument is not a finite number.
    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    /// An on/off argument is something else.
    #[error("expected 'on' or 'off', got '{0}'")]
    InvalidSwitch(String),

    /// Unknown waveform name.
    #[error(transparent)]
    Waveform(#[from] ParseWaveformError),

    /// Unknown preset name.
    #[error(transparent)]
    Preset(#[from] UnknownPreset),

    /// Unknown interval name.
    #[error(transparent)]
    Interval(#[from] UnknownInterval),
}

fn number(arg: &str) -> Result<f32, ParseCommandError> {
    arg.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseCommandError::InvalidNumber(arg.to_string()))
}

fn switch(arg: &str) -> Result<bool, ParseCommandError> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "1" | "true" => Ok(true),
        "off" | "0" | "false" => Ok(false),
        _ => Err(ParseCommandError::InvalidSwitch(arg.to_string())),
    }
}

/// Parse one input line. An empty line toggles playback.
pub fn parse_command(line: &str) -> Result<Command, ParseCommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Toggle);
    };
    let arg = words.next();
    let head = head.to_ascii_lowercase();

    let need = |command: &'static str, what: &'static str| {
        arg.ok_or(ParseCommandError::MissingArgument { command, what })
    };

    Ok(match head.as_str() {
        "play" => Command::Play,
        "stop" => Command::Stop,
        "toggle" | "space" => Command::Toggle,
        "freq" | "f" => Command::Frequency(number(need("freq", "a frequency in Hz")?)?),
        "freq2" | "f2" => Command::Frequency2(number(need("freq2", "a frequency in Hz")?)?),
        "up" => Command::Nudge(arg.map_or(Ok(FINE_STEP_HZ), number)?.abs()),
        "down" => Command::Nudge(-arg.map_or(Ok(FINE_STEP_HZ), number)?.abs()),
        "wave" | "w" => Command::Wave(need("wave", "a waveform name")?.parse()?),
        "vol" | "volume" => Command::Volume(number(need("vol", "a percentage")?)?),
        "vol2" => Command::Volume2(number(need("vol2", "a percentage")?)?),
        "dual" => Command::Dual(switch(need("dual", "on or off")?)?),
        "interval" | "i" => {
            let value = need("interval", "an interval name or ratio")?;
            match value.parse::<Interval>() {
                Ok(interval) => Command::Interval(IntervalArg::Named(interval)),
                Err(err) => match value.parse::<f32>() {
                    Ok(ratio) if ratio.is_finite() && ratio > 0.0 => {
                        Command::Interval(IntervalArg::Ratio(ratio))
                    }
                    _ => return Err(err.into()),
                },
            }
        }
        "preset" | "p" => Command::Preset(need("preset", "a preset name")?.parse()?),
        "attack" => Command::Attack(number(need("attack", "milliseconds")?)?),
        "release" => Command::Release(number(need("release", "milliseconds")?)?),
        "status" | "s" => Command::Status,
        "scope" => Command::Scope(switch(need("scope", "on or off")?)?),
        "reinit" => Command::Reinit,
        "help" | "?" | "h" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(ParseCommandError::Unknown(head)),
    })
}

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  play | stop | toggle (or empty line)
  freq <hz>          primary frequency (20-20000)
  freq2 <hz>         secondary frequency
  up [hz] | down [hz]  fine tune (default 1 Hz)
  wave <name>        sine, square, sawtooth, triangle
  vol <0-100>        master volume
  vol2 <0-100>       secondary volume
  dual on|off        secondary tone
  interval <name|ratio>  unison, minor-third, major-third, fourth, fifth, octave
  preset <name>      a440, middleC, bass, treble
  attack <ms> | release <ms>
  scope on|off       live waveform line
  status | reinit | help | quit";

/// What the caller should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Print this text (may be empty) and continue.
    Reply(String),
    /// Reopen the audio output, then continue.
    Reinit,
    /// Leave the session.
    Quit,
}

/// An engine plus the session's view state.
pub struct Session<S> {
    engine: ToneEngine,
    scope: ScopeLoop<S>,
    show_scope: bool,
    /// Redraw the idle preview on the next tick.
    preview_pending: bool,
}

impl<S: SampleSource> Session<S> {
    /// Wrap an (already attached) engine and its scope loop.
    ///
    /// The first tick draws the idle preview of the selected waveform.
    pub fn new(engine: ToneEngine, scope: ScopeLoop<S>) -> Self {
        Self {
            engine,
            scope,
            show_scope: false,
            preview_pending: true,
        }
    }

    /// The engine.
    pub fn engine(&self) -> &ToneEngine {
        &self.engine
    }

    /// Mutable engine access, for attach/detach on output changes.
    pub fn engine_mut(&mut self) -> &mut ToneEngine {
        &mut self.engine
    }

    /// Replace the scope loop after the output was reopened.
    pub fn replace_scope(&mut self, scope: ScopeLoop<S>) {
        self.scope = scope;
    }

    /// Whether live scope lines are shown.
    pub fn show_scope(&self) -> bool {
        self.show_scope
    }

    /// Parse and apply one line.
    pub fn handle_line(&mut self, line: &str) -> Step {
        match parse_command(line) {
            Ok(command) => self.execute(command),
            Err(err) => Step::Reply(format!("error: {err}")),
        }
    }

    /// Apply one command.
    pub fn execute(&mut self, command: Command) -> Step {
        let engine = &mut self.engine;
        let reply = match command {
            Command::Play => {
                engine.play();
                self.playing_reply()
            }
            Command::Stop => {
                engine.stop();
                "stopped".to_string()
            }
            Command::Toggle => {
                engine.toggle();
                if engine.is_playing() {
                    self.playing_reply()
                } else {
                    "stopped".to_string()
                }
            }
            Command::Frequency(hz) => {
                engine.set_frequency(hz, Slot::Primary);
                self.frequency_reply()
            }
            Command::Frequency2(hz) => {
                engine.set_frequency(hz, Slot::Secondary);
                format!("secondary {}", format_secondary(engine.settings().frequency2()))
            }
            Command::Nudge(delta) => {
                engine.nudge_frequency(delta);
                self.frequency_reply()
            }
            Command::Wave(waveform) => {
                engine.set_waveform(waveform);
                self.preview_pending = true;
                let settings = engine.settings();
                format_waveform_info(settings.waveform(), settings.frequency1())
            }
            Command::Volume(percent) => {
                engine.set_master_volume(percent / 100.0);
                format!("volume {}", format_volume(engine.settings().volume1()))
            }
            Command::Volume2(percent) => {
                engine.set_volume2(percent / 100.0);
                format!("volume2 {}", format_volume(engine.settings().volume2()))
            }
            Command::Dual(on) => {
                engine.enable_dual_tone(on);
                if on {
                    format!("dual on, {}", format_secondary(engine.settings().frequency2()))
                } else {
                    "dual off".to_string()
                }
            }
            Command::Interval(arg) => {
                let applied = match arg {
                    IntervalArg::Named(interval) => engine.set_interval(interval),
                    IntervalArg::Ratio(ratio) => engine.set_interval_from_base(ratio),
                };
                format!("secondary {}", format_secondary(applied))
            }
            Command::Preset(preset) => {
                engine.apply_preset(preset);
                format!("preset {preset}: {}", self.frequency_reply())
            }
            Command::Attack(ms) => {
                engine.set_attack(ms);
                format!("attack {} ms", engine.settings().attack_ms())
            }
            Command::Release(ms) => {
                engine.set_release(ms);
                format!("release {} ms", engine.settings().release_ms())
            }
            Command::Status => self.status(),
            Command::Scope(on) => {
                self.show_scope = on;
                self.preview_pending |= on;
                format!("scope {}", if on { "on" } else { "off" })
            }
            Command::Help => HELP.to_string(),
            Command::Reinit => return Step::Reinit,
            Command::Quit => return Step::Quit,
        };
        if self.engine.is_playing() && !self.scope.is_running() {
            self.scope.start();
        }
        Step::Reply(reply)
    }

    /// One refresh tick: run due teardowns and produce a scope frame.
    ///
    /// While idle a frame is only produced when the preview changed: at
    /// startup, after a stop, a waveform change or `scope on`.
    pub fn tick(&mut self) -> Option<ScopeFrame> {
        self.engine.poll();
        if let Some(frame) = self.scope.tick(&self.engine) {
            self.preview_pending = false;
            return Some(frame);
        }
        if self.preview_pending && !self.engine.is_playing() {
            self.preview_pending = false;
            let waveform = self.engine.settings().waveform();
            return Some(ScopeFrame::Preview(self.scope.preview_frame(waveform)));
        }
        None
    }

    fn playing_reply(&self) -> String {
        let settings = self.engine.settings();
        format!(
            "playing {}",
            format_waveform_info(settings.waveform(), settings.frequency1())
        )
    }

    fn frequency_reply(&self) -> String {
        let label = self.engine.note_label();
        format!(
            "{}  {}",
            format_frequency(self.engine.settings().frequency1()),
            format_note(&label)
        )
    }

    /// Multi-line state summary.
    pub fn status(&self) -> String {
        let engine = &self.engine;
        let settings = engine.settings();
        let state = match engine.state() {
            EngineState::Idle => "idle",
            EngineState::Sounding => "playing",
            EngineState::Releasing => "releasing",
        };
        let output = if engine.is_attached() {
            "attached"
        } else {
            "detached (type 'reinit')"
        };
        let dual = if settings.dual_enabled() {
            format!(
                "{} at {}",
                format_secondary(settings.frequency2()),
                format_volume(settings.volume2())
            )
        } else {
            "off".to_string()
        };
        format!(
            "State:     {state}\n\
             Output:    {output}\n\
             Frequency: {}\n\
             Waveform:  {}\n\
             Volume:    {}\n\
             Dual:      {dual}\n\
             Envelope:  attack {} ms, release {} ms",
            self.frequency_reply(),
            format_waveform_info(settings.waveform(), settings.frequency1()),
            format_volume(settings.volume1()),
            settings.attack_ms(),
            settings.release_ms(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonegen_core::{SampleClock, preview};
    use tonegen_synth::RenderCommand;

    struct Flat;

    impl SampleSource for Flat {
        fn byte_frame(&self, out: &mut [u8]) {
            out.fill(128);
        }
    }

    fn session() -> Session<Flat> {
        let mut engine = ToneEngine::default();
        engine.attach(Box::new(Vec::<RenderCommand>::new()), SampleClock::new(48000.0));
        Session::new(engine, ScopeLoop::new(Flat, 16, 16))
    }

    // --- parsing ---

    #[test]
    fn test_parses_basic_commands() {
        assert_eq!(parse_command(""), Ok(Command::Toggle));
        assert_eq!(parse_command("  PLAY "), Ok(Command::Play));
        assert_eq!(parse_command("freq 880"), Ok(Command::Frequency(880.0)));
        assert_eq!(parse_command("wave saw"), Ok(Command::Wave(Waveform::Sawtooth)));
        assert_eq!(parse_command("dual on"), Ok(Command::Dual(true)));
        assert_eq!(parse_command("preset middleC"), Ok(Command::Preset(Preset::MiddleC)));
    }

    #[test]
    fn test_nudge_defaults_to_one_hz() {
        assert_eq!(parse_command("up"), Ok(Command::Nudge(1.0)));
        assert_eq!(parse_command("down"), Ok(Command::Nudge(-1.0)));
        assert_eq!(parse_command("down 10"), Ok(Command::Nudge(-10.0)));
    }

    #[test]
    fn test_parses_interval_names_and_ratios() {
        assert_eq!(
            parse_command("interval fifth"),
            Ok(Command::Interval(IntervalArg::Named(Interval::Fifth)))
        );
        assert_eq!(
            parse_command("interval 1.25"),
            Ok(Command::Interval(IntervalArg::Ratio(1.25)))
        );
        assert!(matches!(
            parse_command("interval -2"),
            Err(ParseCommandError::Interval(_))
        ));
    }

    #[test]
    fn test_reports_parse_errors() {
        assert_eq!(
            parse_command("bogus"),
            Err(ParseCommandError::Unknown("bogus".into()))
        );
        assert!(matches!(
            parse_command("freq"),
            Err(ParseCommandError::MissingArgument { command: "freq", .. })
        ));
        assert_eq!(
            parse_command("freq abc"),
            Err(ParseCommandError::InvalidNumber("abc".into()))
        );
        assert_eq!(
            parse_command("freq NaN"),
            Err(ParseCommandError::InvalidNumber("NaN".into()))
        );
        assert!(matches!(parse_command("wave noise"), Err(ParseCommandError::Waveform(_))));
        assert_eq!(
            parse_command("scope maybe"),
            Err(ParseCommandError::InvalidSwitch("maybe".into()))
        );
    }

    // --- execution ---

    #[test]
    fn test_play_and_stop_replies() {
        let mut s = session();
        assert_eq!(s.handle_line("play"), Step::Reply("playing Sine @ 440.0 Hz".into()));
        assert!(s.engine().is_playing());
        assert_eq!(s.handle_line(""), Step::Reply("stopped".into()));
    }

    #[test]
    fn test_frequency_reply_includes_note() {
        let mut s = session();
        assert_eq!(
            s.handle_line("freq 445"),
            Step::Reply("445.0 Hz  A4 (+20 cents)".into())
        );
        assert_eq!(
            s.handle_line("freq 99999"),
            Step::Reply("20000.0 Hz  D#10 (+8 cents)".into())
        );
    }

    #[test]
    fn test_volume_is_percent() {
        let mut s = session();
        assert_eq!(s.handle_line("vol 75"), Step::Reply("volume 75%".into()));
        assert_eq!(s.handle_line("vol 150"), Step::Reply("volume 100%".into()));
        assert_eq!(s.engine().settings().volume1(), 1.0);
    }

    #[test]
    fn test_interval_enables_dual() {
        let mut s = session();
        assert_eq!(
            s.handle_line("interval octave"),
            Step::Reply("secondary 880.0 Hz (A5)".into())
        );
        assert!(s.engine().settings().dual_enabled());
    }

    #[test]
    fn test_errors_are_replies() {
        let mut s = session();
        let Step::Reply(text) = s.handle_line("wave noise") else {
            panic!("Expected reply");
        };
        assert!(text.starts_with("error:"), "got {text}");
    }

    #[test]
    fn test_control_steps() {
        let mut s = session();
        assert_eq!(s.handle_line("reinit"), Step::Reinit);
        assert_eq!(s.handle_line("quit"), Step::Quit);
    }

    #[test]
    fn test_scope_runs_while_playing_and_previews_after_stop() {
        let mut s = session();
        assert_eq!(s.tick(), Some(ScopeFrame::Preview(preview(Waveform::Sine, 16))));
        assert!(s.tick().is_none());
        s.handle_line("play");
        assert_eq!(s.tick(), Some(ScopeFrame::Live(vec![128; 16])));
        s.handle_line("stop");
        assert!(matches!(s.tick(), Some(ScopeFrame::Preview(_))));
        assert!(s.tick().is_none());
    }

    #[test]
    fn test_idle_preview_follows_waveform() {
        let mut s = session();
        s.handle_line("scope on");
        assert_eq!(s.tick(), Some(ScopeFrame::Preview(preview(Waveform::Sine, 16))));
        assert!(s.tick().is_none());

        s.handle_line("wave saw");
        let Some(ScopeFrame::Preview(points)) = s.tick() else {
            panic!("Expected a preview after the waveform change");
        };
        assert_eq!(points, preview(Waveform::Sawtooth, 16));
        assert!(s.tick().is_none());

        s.handle_line("scope off");
        s.handle_line("scope on");
        assert_eq!(
            s.tick(),
            Some(ScopeFrame::Preview(preview(Waveform::Sawtooth, 16)))
        );
    }

    #[test]
    fn test_waveform_change_while_playing_keeps_live_frames() {
        let mut s = session();
        s.handle_line("play");
        s.handle_line("wave square");
        assert_eq!(s.tick(), Some(ScopeFrame::Live(vec![128; 16])));
        s.handle_line("stop");
        assert_eq!(
            s.tick(),
            Some(ScopeFrame::Preview(preview(Waveform::Square, 16)))
        );
        assert!(s.tick().is_none());
    }

    #[test]
    fn test_status_lists_settings() {
        let mut s = session();
        s.handle_line("dual on");
        let status = s.status();
        assert!(status.contains("State:     idle"), "got {status}");
        assert!(status.contains("440.0 Hz  A4 (0 cents)"), "got {status}");
        assert!(status.contains("554.0 Hz (C#5) at 50%"), "got {status}");
        assert!(status.contains("attack 10 ms, release 50 ms"), "got {status}");
    }
}
