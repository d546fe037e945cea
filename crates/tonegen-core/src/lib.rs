//! Core primitives for the tonegen tone generator.
//!
//! This crate holds everything that is pure computation and shared between the
//! control thread and the realtime audio path:
//!
//! - [`frequency_to_note`]: frequency → nearest tempered pitch, octave and cents
//! - [`Waveform`]: the closed set of periodic shapes plus a static preview
//! - [`AutomationCurve`]: a deterministic parameter timeline (set, linear ramp,
//!   exponential target, cancel-and-hold) evaluated at absolute clock times
//! - [`SampleClock`]: the shared monotonic synthesis clock
//! - [`limits`]: clamping rules for frequencies, volumes and durations
//!
//! ## no_std Support
//!
//! The crate builds without `std` (it still needs `alloc` for curve storage and
//! the preview buffer). All math goes through `libm`.
//!
//! ```toml
//! [dependencies]
//! tonegen-core = { version = "0.1", default-features = false }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tonegen_core::{AutomationCurve, ParamEvent, frequency_to_note};
//!
//! let label = frequency_to_note(440.0);
//! assert_eq!(label.to_string(), "A4");
//! assert_eq!(label.cents, 0);
//!
//! let mut gain = AutomationCurve::new(0.0);
//! gain.apply(ParamEvent::SetValue { value: 0.0, time: 0.0 });
//! gain.apply(ParamEvent::LinearRamp { value: 1.0, end_time: 0.01 });
//! assert!((gain.value_at(0.005) - 0.5).abs() < 1e-5);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod automation;
pub mod clock;
pub mod limits;
pub mod note;
pub mod waveform;

pub use automation::{AutomationCurve, ParamEvent};
pub use clock::SampleClock;
pub use limits::{
    FREQ_MAX_HZ, FREQ_MIN_HZ, clamp_duration_ms, clamp_frequency, clamp_volume,
};
pub use note::{NOTE_NAMES, NoteLabel, frequency_to_note};
pub use waveform::{PREVIEW_CYCLES, ParseWaveformError, Waveform, preview, preview_sample};
