//! Frequency to musical note mapping.
//!
//! Maps an arbitrary frequency onto twelve-tone equal temperament with A4 at
//! 440 Hz (continuous pitch number 69):
//!
//! ```text
//! n      = 12 · log2(f / 440) + 69
//! index  = round(n) mod 12
//! octave = floor(round(n) / 12) - 1
//! cents  = round((n - round(n)) · 100)        ∈ [-50, 50]
//! ```
//!
//! Rounding is half-up (`floor(x + 0.5)`), so a frequency exactly between two
//! pitches reports the upper one with -50 cents.

use core::fmt;
use libm::{floor, log2};

use crate::limits::FREQ_MIN_HZ;

/// Pitch names indexed by pitch class, C = 0.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Reference frequency for pitch number 69 (A4).
const REFERENCE_HZ: f64 = 440.0;
const REFERENCE_PITCH: f64 = 69.0;

/// The nearest tempered pitch to a frequency.
///
/// Derived on demand from a frequency and never stored as authoritative state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteLabel {
    /// One of [`NOTE_NAMES`].
    pub name: &'static str,
    /// Octave number, where middle C is octave 4.
    pub octave: i32,
    /// Signed deviation from the named pitch in cents, within [-50, 50].
    pub cents: i32,
}

impl NoteLabel {
    /// Cents deviation formatted for display: `"0 cents"`, `"+12 cents"`,
    /// `"-7 cents"`.
    pub fn cents_display(&self) -> CentsDisplay {
        CentsDisplay(self.cents)
    }
}

impl fmt::Display for NoteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

/// Display adapter returned by [`NoteLabel::cents_display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentsDisplay(i32);

impl fmt::Display for CentsDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{} cents", self.0)
        } else {
            write!(f, "{} cents", self.0)
        }
    }
}

#[inline]
fn round_half_up(x: f64) -> f64 {
    floor(x + 0.5)
}

/// Map a frequency in Hz to the nearest note name, octave and cent deviation.
///
/// Callers are expected to pass a positive frequency (engine frequencies are
/// already clamped to at least 20 Hz). Non-positive or `NaN` input is treated
/// as the lowest playable frequency rather than producing garbage.
///
/// # Example
///
/// ```rust
/// use tonegen_core::frequency_to_note;
///
/// let c4 = frequency_to_note(261.63);
/// assert_eq!((c4.name, c4.octave, c4.cents), ("C", 4, 0));
/// ```
pub fn frequency_to_note(freq: f32) -> NoteLabel {
    let freq = if freq > 0.0 { freq } else { FREQ_MIN_HZ };
    let pitch = 12.0 * log2(f64::from(freq) / REFERENCE_HZ) + REFERENCE_PITCH;
    let nearest = round_half_up(pitch);

    let index = (nearest as i64).rem_euclid(12) as usize;
    let octave = floor(nearest / 12.0) as i32 - 1;
    let cents = round_half_up((pitch - nearest) * 100.0) as i32;

    NoteLabel {
        name: NOTE_NAMES[index],
        octave,
        cents,
    }
}
