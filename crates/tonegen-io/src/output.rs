//! Engine-facing output stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tonegen_engine::{OutputLink, ToneEngine, link};
use tonegen_synth::ScopeReader;

use crate::Result;
use crate::backend::{AudioBackend, BackendStreamConfig, StreamHandle};

/// A running output stream with a renderer inside its callback.
///
/// Dropping it stops the stream. After a stream error
/// [`has_failed`](Self::has_failed) turns true and stays true; the owner is
/// expected to detach the engine and open a new output.
pub struct ToneOutput {
    _handle: StreamHandle,
    link: OutputLink,
    failed: Arc<AtomicBool>,
    /// Largest buffer (in frames) the callback has been handed so far.
    largest_buffer: Arc<AtomicU64>,
    requested_buffer: u32,
    sample_rate: u32,
    channels: u16,
}

impl std::fmt::Debug for ToneOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneOutput")
            .field("sample_rate", &self.sample_rate)
            .field("channels", &self.channels)
            .field("failed", &self.has_failed())
            .finish_non_exhaustive()
    }
}

/// Open an output stream rendering tonegen voices.
///
/// The renderer is created at the backend's actual sample rate and moved into
/// the audio callback. `scope_history` sizes the visualization tap.
pub fn open_output(
    backend: &dyn AudioBackend,
    config: &BackendStreamConfig,
    scope_history: usize,
) -> Result<ToneOutput> {
    let sample_rate = backend.actual_sample_rate(config);
    let channels = config.channels.max(1);
    let (link, mut renderer) = link(
        sample_rate as f32,
        usize::from(channels),
        scope_history.max(1),
    );

    let failed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&failed);
    let largest_buffer = Arc::new(AtomicU64::new(0));
    let largest = Arc::clone(&largest_buffer);
    let frame_width = usize::from(channels);
    let handle = backend.build_output_stream(
        config,
        Box::new(move |buffer: &mut [f32]| {
            largest.fetch_max((buffer.len() / frame_width) as u64, Ordering::Relaxed);
            renderer.process(buffer);
        }),
        Box::new(move |message: &str| {
            if !flag.swap(true, Ordering::AcqRel) {
                tracing::error!(error = message, "audio output failed");
            }
        }),
    )?;

    tracing::debug!(
        backend = backend.name(),
        sample_rate,
        channels,
        "tone output opened"
    );
    Ok(ToneOutput {
        _handle: handle,
        link,
        failed,
        largest_buffer,
        requested_buffer: config.buffer_size,
        sample_rate,
        channels,
    })
}

impl ToneOutput {
    /// Attach `engine` to this output.
    ///
    /// Automation is anchored one buffer ahead of the clock (see
    /// [`ToneEngine::attach_with_lookahead`]), using the larger of the
    /// requested buffer size and the largest buffer seen so far.
    pub fn attach(&self, engine: &mut ToneEngine) {
        engine.attach_with_lookahead(
            Box::new(self.link.sink.clone()),
            self.link.clock.clone(),
            self.lookahead_frames(),
        );
    }

    /// Frames of lookahead used when attaching an engine.
    pub fn lookahead_frames(&self) -> u64 {
        u64::from(self.requested_buffer).max(self.largest_buffer.load(Ordering::Relaxed))
    }

    /// Reader for the visualization tap.
    pub fn scope(&self) -> ScopeReader {
        self.link.scope.clone()
    }

    /// Whether the stream has reported an error.
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    /// Sample rate the renderer runs at.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}
