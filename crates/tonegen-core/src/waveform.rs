//! Periodic waveform shapes and the static preview.
//!
//! [`Waveform`] is the closed set of shapes a voice can play. The oscillator and
//! the preview generator are the only places that branch on it.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::f32::consts::PI;
use core::fmt;
use core::str::FromStr;
use libm::{asinf, floorf, sinf};

/// Number of cycles drawn by [`preview`].
pub const PREVIEW_CYCLES: f32 = 3.0;

/// Periodic waveform played by a voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Pure sine.
    #[default]
    Sine,
    /// Square, 50% duty cycle.
    Square,
    /// Rising sawtooth.
    Sawtooth,
    /// Symmetric triangle.
    Triangle,
}

impl Waveform {
    /// All waveforms in display order.
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    /// Lowercase identifier, as accepted by [`FromStr`].
    pub fn id(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }

    /// Human-readable name, e.g. `"Sawtooth"`.
    pub fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Square => "Square",
            Waveform::Sawtooth => "Sawtooth",
            Waveform::Triangle => "Triangle",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown waveform name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWaveformError;

impl fmt::Display for ParseWaveformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown waveform (expected sine, square, sawtooth or triangle)")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseWaveformError {}

impl FromStr for Waveform {
    type Err = ParseWaveformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("sine") || s.eq_ignore_ascii_case("sin") {
            Ok(Waveform::Sine)
        } else if s.eq_ignore_ascii_case("square") || s.eq_ignore_ascii_case("sqr") {
            Ok(Waveform::Square)
        } else if s.eq_ignore_ascii_case("sawtooth") || s.eq_ignore_ascii_case("saw") {
            Ok(Waveform::Sawtooth)
        } else if s.eq_ignore_ascii_case("triangle") || s.eq_ignore_ascii_case("tri") {
            Ok(Waveform::Triangle)
        } else {
            Err(ParseWaveformError)
        }
    }
}

/// Ideal (non-band-limited) waveform value at `phase`, measured in cycles.
///
/// Used for the static preview only; audio goes through the band-limited
/// oscillator in `tonegen-synth`.
#[inline]
pub fn preview_sample(waveform: Waveform, phase: f32) -> f32 {
    let radians = phase * 2.0 * PI;
    match waveform {
        Waveform::Sine => sinf(radians),
        Waveform::Square => {
            if sinf(radians) > 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => {
            let frac = phase - floorf(phase);
            2.0 * frac - 1.0
        }
        Waveform::Triangle => ((2.0 / PI) * asinf(sinf(radians))).clamp(-1.0, 1.0),
    }
}

/// Static reference shape for `waveform`: [`PREVIEW_CYCLES`] cycles spread over
/// `width` points, values in [-1, 1].
///
/// This is what the scope shows while nothing is sounding.
pub fn preview(waveform: Waveform, width: usize) -> Vec<f32> {
    if width == 0 {
        return Vec::new();
    }
    let span = width as f32;
    (0..width)
        .map(|x| preview_sample(waveform, x as f32 / span * PREVIEW_CYCLES))
        .collect()
}
