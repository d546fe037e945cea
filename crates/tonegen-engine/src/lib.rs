//! Control side of tonegen.
//!
//! The [`ToneEngine`] owns up to two oscillator voices, the master gain and
//! the play/stop/retune state machine. It never touches audio directly: every
//! change is scheduled as sample-accurate automation and sent through an
//! [`AutomationSink`] to a [`Renderer`](tonegen_synth::Renderer).
//!
//! ## Modules
//!
//! - [`settings`]: clamped user-facing parameters and timing constants
//! - [`envelope`]: linear attack/release ramps and exponential glides
//! - [`voice`]: one oscillator voice with its gain and pitch lanes
//! - [`teardown`]: delayed, instance-checked voice destruction
//! - [`engine`]: the state machine
//! - [`scope`]: per-tick visualization frames
//! - [`presets`]: frequency presets and musical intervals
//!
//! ## Example
//!
//! ```rust
//! use tonegen_engine::{ToneEngine, link};
//!
//! let (output, mut renderer) = link(48000.0, 1, 1024);
//! let mut engine = ToneEngine::default();
//! engine.attach(Box::new(output.sink), output.clock.clone());
//! engine.play();
//!
//! let mut buffer = vec![0.0f32; 4800];
//! renderer.process(&mut buffer);
//! engine.poll();
//!
//! let peak = buffer.iter().fold(0.0f32, |m, s| m.max(s.abs()));
//! assert!(peak > 0.4 && peak <= 0.5);
//! ```

pub mod engine;
pub mod envelope;
pub mod lane;
pub mod output;
pub mod presets;
pub mod scope;
pub mod settings;
pub mod sink;
pub mod teardown;
pub mod voice;

pub use engine::{EngineState, ToneEngine};
pub use envelope::EnvelopeScheduler;
pub use lane::ParamLane;
pub use output::{OutputLink, link};
pub use presets::{Interval, Preset, UnknownInterval, UnknownPreset};
pub use scope::{SampleSource, ScopeFrame, ScopeLoop};
pub use settings::{EngineTiming, Slot, ToneSettings};
pub use sink::{AutomationSink, ChannelSink};
pub use teardown::{Teardown, TeardownQueue};
pub use voice::OscillatorVoice;
