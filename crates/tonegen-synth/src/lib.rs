//! Realtime synthesis for tonegen.
//!
//! Everything in this crate runs on the audio thread. The control side never
//! touches it directly: it sends [`RenderCommand`]s over a channel and the
//! [`Renderer`] drains them at the start of each buffer.
//!
//! - [`Oscillator`]: PolyBLEP band-limited periodic oscillator
//! - [`RenderVoice`]: oscillator plus its gain and pitch automation curves
//! - [`Renderer`]: applies commands, mixes voices through the master gain and
//!   advances the shared [`SampleClock`](tonegen_core::SampleClock)
//! - [`scope_tap`]: lock-free history of the mixed output for visualization
//!
//! ## Example
//!
//! ```rust
//! use crossbeam_channel::unbounded;
//! use tonegen_core::{ParamEvent, SampleClock, Waveform};
//! use tonegen_synth::{ParamTarget, RenderCommand, Renderer, VoiceId, scope_tap};
//!
//! let clock = SampleClock::new(48000.0);
//! let (tx, rx) = unbounded();
//! let (writer, _reader) = scope_tap(2048);
//! let mut renderer = Renderer::new(clock, rx, writer, 1);
//!
//! let id = VoiceId::new(0);
//! tx.send(RenderCommand::StartVoice { id, frequency: 440.0, waveform: Waveform::Sine }).unwrap();
//! tx.send(RenderCommand::Automate {
//!     target: ParamTarget::VoiceGain(id),
//!     event: ParamEvent::SetValue { value: 1.0, time: 0.0 },
//! }).unwrap();
//!
//! let mut buffer = [0.0f32; 256];
//! renderer.process(&mut buffer);
//! assert_eq!(renderer.voice_count(), 1);
//! ```

pub mod command;
pub mod oscillator;
pub mod renderer;
pub mod scope;
pub mod voice;

pub use command::{ParamTarget, RenderCommand, VoiceId};
pub use oscillator::Oscillator;
pub use renderer::Renderer;
pub use scope::{SCOPE_CENTER, ScopeReader, ScopeWriter, sample_to_byte, scope_tap};
pub use voice::RenderVoice;
