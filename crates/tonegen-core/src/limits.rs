//! Clamping rules for user-facing numeric inputs.
//!
//! Out-of-range input is never an error in tonegen: frequencies, volumes and
//! envelope durations are pulled back into their valid range. Non-finite input
//! is handled too, so a stray `NaN` from a parser or a division can never reach
//! an oscillator.

/// Lowest frequency a voice will play, in Hz.
pub const FREQ_MIN_HZ: f32 = 20.0;

/// Highest frequency a voice will play, in Hz.
pub const FREQ_MAX_HZ: f32 = 20_000.0;

/// Clamp a frequency to [`FREQ_MIN_HZ`, `FREQ_MAX_HZ`].
///
/// `NaN` maps to [`FREQ_MIN_HZ`]; infinities map to the nearest bound.
#[inline]
pub fn clamp_frequency(hz: f32) -> f32 {
    if hz.is_nan() {
        return FREQ_MIN_HZ;
    }
    hz.clamp(FREQ_MIN_HZ, FREQ_MAX_HZ)
}

/// Clamp a linear volume to [0, 1]. `NaN` maps to silence.
#[inline]
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}

/// Clamp an envelope duration in milliseconds to be non-negative and finite.
///
/// `NaN` and negative values map to 0. Durations are capped at one minute so a
/// ramp always finishes.
#[inline]
pub fn clamp_duration_ms(ms: f32) -> f32 {
    const MAX_DURATION_MS: f32 = 60_000.0;
    if ms.is_nan() {
        return 0.0;
    }
    ms.clamp(0.0, MAX_DURATION_MS)
}
