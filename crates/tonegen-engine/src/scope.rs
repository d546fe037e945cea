//! Snapshot sampling for waveform visualization.
//!
//! A [`ScopeLoop`] is driven by the UI at its refresh cadence. While the
//! engine is sounding every [`tick`](ScopeLoop::tick) yields a fresh frame of
//! the mixed output. The first tick after the engine stops yields the static
//! preview of the selected waveform and ends the loop; [`start`](ScopeLoop::start)
//! restarts it.

use tonegen_core::{Waveform, preview};
use tonegen_synth::{SCOPE_CENTER, ScopeReader};

use crate::engine::ToneEngine;

/// Anything that can fill a byte frame of recent output.
///
/// Bytes are unsigned and centered at
/// [`SCOPE_CENTER`].
pub trait SampleSource {
    /// Copy the most recent `out.len()` samples into `out`, oldest first.
    fn byte_frame(&self, out: &mut [u8]);
}

impl SampleSource for ScopeReader {
    fn byte_frame(&self, out: &mut [u8]) {
        self.byte_time_domain_data(out);
    }
}

/// No source reads as a flat line.
impl<S: SampleSource> SampleSource for Option<S> {
    fn byte_frame(&self, out: &mut [u8]) {
        match self {
            Some(source) => source.byte_frame(out),
            None => out.fill(SCOPE_CENTER),
        }
    }
}

/// One visualization frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeFrame {
    /// Live snapshot of the mixed output.
    Live(Vec<u8>),
    /// Static few-cycle preview in [-1, 1] for the selected waveform.
    Preview(Vec<f32>),
}

/// Restartable per-tick frame producer.
#[derive(Debug)]
pub struct ScopeLoop<S> {
    source: S,
    frame_size: usize,
    preview_width: usize,
    running: bool,
}

impl<S: SampleSource> ScopeLoop<S> {
    /// Create a stopped loop producing `frame_size`-byte live frames and
    /// `preview_width`-point previews.
    pub fn new(source: S, frame_size: usize, preview_width: usize) -> Self {
        Self {
            source,
            frame_size,
            preview_width,
            running: false,
        }
    }

    /// (Re)start frame production.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Whether the loop will produce a frame on the next tick.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Preview shape for `waveform` at this loop's width.
    pub fn preview_frame(&self, waveform: Waveform) -> Vec<f32> {
        preview(waveform, self.preview_width)
    }

    /// Advance one refresh tick.
    pub fn tick(&mut self, engine: &ToneEngine) -> Option<ScopeFrame> {
        if !self.running {
            return None;
        }
        if engine.is_playing() {
            let mut frame = vec![0u8; self.frame_size];
            self.source.byte_frame(&mut frame);
            Some(ScopeFrame::Live(frame))
        } else {
            self.running = false;
            Some(ScopeFrame::Preview(
                self.preview_frame(engine.settings().waveform()),
            ))
        }
    }
}
