//! Lock-free history of the mixed output.
//!
//! The renderer writes every output sample into a fixed ring of atomics; any
//! number of readers copy the most recent samples without blocking the audio
//! thread. Reads racing a write may mix samples from adjacent buffers, which
//! is harmless for a display.
//!
//! Byte frames follow the usual analyser convention: unsigned 8-bit, centred on
//! [`SCOPE_CENTER`], `byte = clamp(floor(128 · (1 + s)), 0, 255)`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Byte value of a zero sample.
pub const SCOPE_CENTER: u8 = 128;

#[derive(Debug)]
struct ScopeShared {
    /// f32 samples stored as raw bits
    samples: Box<[AtomicU32]>,
    /// Total samples written (monotonic, wraps at usize::MAX)
    written: AtomicUsize,
}

/// Create a connected writer/reader pair holding `history` samples.
///
/// # Panics
///
/// Panics if `history` is 0.
pub fn scope_tap(history: usize) -> (ScopeWriter, ScopeReader) {
    assert!(history > 0, "scope history must hold at least one sample");
    let samples = (0..history)
        .map(|_| AtomicU32::new(0.0f32.to_bits()))
        .collect::<Vec<_>>()
        .into_boxed_slice();
    let shared = Arc::new(ScopeShared {
        samples,
        written: AtomicUsize::new(0),
    });
    (
        ScopeWriter {
            shared: Arc::clone(&shared),
        },
        ScopeReader { shared },
    )
}

/// Audio-thread half of the scope tap.
#[derive(Debug)]
pub struct ScopeWriter {
    shared: Arc<ScopeShared>,
}

impl ScopeWriter {
    /// Append one sample.
    #[inline]
    pub fn push(&self, sample: f32) {
        let written = self.shared.written.load(Ordering::Relaxed);
        let slot = written % self.shared.samples.len();
        self.shared.samples[slot].store(sample.to_bits(), Ordering::Relaxed);
        self.shared
            .written
            .store(written.wrapping_add(1), Ordering::Release);
    }
}

/// Reader half of the scope tap. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ScopeReader {
    shared: Arc<ScopeShared>,
}

impl ScopeReader {
    /// Number of samples retained.
    pub fn history(&self) -> usize {
        self.shared.samples.len()
    }

    /// Total samples written so far.
    pub fn samples_written(&self) -> usize {
        self.shared.written.load(Ordering::Acquire)
    }

    /// Copy the most recent `out.len()` samples, oldest first.
    ///
    /// Positions older than the retained history (or older than the first
    /// write) read as silence.
    pub fn float_time_domain_data(&self, out: &mut [f32]) {
        let written = self.shared.written.load(Ordering::Acquire);
        let len = self.shared.samples.len();
        let n = out.len();
        for (i, slot) in out.iter_mut().enumerate() {
            let age = n - i;
            *slot = if age > len || age > written {
                0.0
            } else {
                let index = (written - age) % len;
                f32::from_bits(self.shared.samples[index].load(Ordering::Relaxed))
            };
        }
    }

    /// Copy the most recent `out.len()` samples as centred unsigned bytes.
    pub fn byte_time_domain_data(&self, out: &mut [u8]) {
        let written = self.shared.written.load(Ordering::Acquire);
        let len = self.shared.samples.len();
        let n = out.len();
        for (i, slot) in out.iter_mut().enumerate() {
            let age = n - i;
            *slot = if age > len || age > written {
                SCOPE_CENTER
            } else {
                let index = (written - age) % len;
                sample_to_byte(f32::from_bits(
                    self.shared.samples[index].load(Ordering::Relaxed),
                ))
            };
        }
    }
}

/// Convert a sample in [-1, 1] to a centred unsigned byte.
#[inline]
pub fn sample_to_byte(sample: f32) -> u8 {
    let scaled = libm::floorf(128.0 * (1.0 + sample));
    if scaled.is_nan() {
        return SCOPE_CENTER;
    }
    scaled.clamp(0.0, 255.0) as u8
}
