//! Deferred voice teardown.
//!
//! Each pending teardown names the exact voice instance it was scheduled for.
//! When it fires, the owner only destroys a voice with that identity; if the
//! voice is already gone (or the slot now holds a newer instance) the task is
//! a no-op.

use tonegen_synth::VoiceId;

/// One-shot teardown task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teardown {
    /// Voice instance to destroy.
    pub voice: VoiceId,
    /// Clock time in seconds at which the task becomes due.
    pub due: f64,
}

/// Pending teardown tasks ordered by due time.
#[derive(Debug, Clone, Default)]
pub struct TeardownQueue {
    pending: Vec<Teardown>,
}

impl TeardownQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `voice` for destruction at clock time `due`.
    pub fn schedule(&mut self, voice: VoiceId, due: f64) {
        let at = self.pending.partition_point(|t| t.due <= due);
        self.pending.insert(at, Teardown { voice, due });
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: f64) -> Vec<Teardown> {
        let split = self.pending.partition_point(|t| t.due <= now);
        self.pending.drain(..split).collect()
    }

    /// Earliest due time, if any.
    pub fn next_due(&self) -> Option<f64> {
        self.pending.first().map(|t| t.due)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
