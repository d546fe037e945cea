//! Wiring between a [`ToneEngine`](crate::ToneEngine) and a [`Renderer`].
//!
//! [`link`] builds both halves of the audio path: the control half the engine
//! attaches to, and the renderer that belongs inside an audio callback (or an
//! offline render loop).

use crossbeam_channel::unbounded;
use tonegen_core::SampleClock;
use tonegen_synth::{Renderer, ScopeReader, scope_tap};

use crate::sink::ChannelSink;

/// Control half of an audio path.
#[derive(Debug, Clone)]
pub struct OutputLink {
    /// Command route into the renderer.
    pub sink: ChannelSink,
    /// Synthesis clock advanced by the renderer.
    pub clock: SampleClock,
    /// Scope history of the mixed output.
    pub scope: ScopeReader,
}

/// Create a connected control half and renderer.
///
/// # Panics
///
/// Panics if `sample_rate` is not positive or `scope_history` is zero.
pub fn link(sample_rate: f32, channels: usize, scope_history: usize) -> (OutputLink, Renderer) {
    let clock = SampleClock::new(sample_rate);
    let (tx, rx) = unbounded();
    let (writer, reader) = scope_tap(scope_history);
    let renderer = Renderer::new(clock.clone(), rx, writer, channels);
    let link = OutputLink {
        sink: ChannelSink::new(tx),
        clock,
        scope: reader,
    };
    (link, renderer)
}
