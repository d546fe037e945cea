//! Envelope scheduling.
//!
//! Turns "fade this gain in/out" into automation events anchored to the
//! synthesis clock. All ramps are linear. Every schedule starts with a
//! cancel-and-hold at the anchor time, so a new ramp never inherits a glide
//! from an earlier one, and the explicit start value is pinned before the ramp
//! begins.

use tonegen_core::ParamEvent;

use crate::lane::ParamLane;
use crate::sink::AutomationSink;

/// Issues gain ramps and glides against the synthesis clock.
///
/// `guard` is the delay added after a fade-out before the voice may be
/// destroyed, so the ramp has audibly finished when the source disappears.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeScheduler {
    guard: f64,
}

impl Default for EnvelopeScheduler {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl EnvelopeScheduler {
    /// Create a scheduler with a teardown guard in seconds.
    pub fn new(guard: f64) -> Self {
        Self {
            guard: guard.max(0.0),
        }
    }

    /// Teardown guard in seconds.
    pub fn guard(&self) -> f64 {
        self.guard
    }

    /// Linear ramp from `from` to `to` over `duration` seconds starting at
    /// clock time `start`.
    ///
    /// A zero (or negative) duration is an instantaneous set at `start`.
    pub fn ramp_gain(
        &self,
        lane: &mut ParamLane,
        sink: &mut dyn AutomationSink,
        from: f32,
        to: f32,
        duration: f64,
        start: f64,
    ) {
        let end_time = start + duration.max(0.0);
        lane.apply(sink, ParamEvent::CancelAndHold { time: start });
        lane.apply(sink, ParamEvent::SetValue { value: from, time: start });
        lane.apply(sink, ParamEvent::LinearRamp { value: to, end_time });
    }

    /// Attack: ramp from silence to `level`.
    pub fn fade_in(
        &self,
        lane: &mut ParamLane,
        sink: &mut dyn AutomationSink,
        level: f32,
        duration: f64,
        now: f64,
    ) {
        self.ramp_gain(lane, sink, 0.0, level, duration, now);
    }

    /// Release: ramp from the gain's actual value at `now` down to 0.
    ///
    /// Returns the clock time after which the voice may be torn down
    /// (`now + duration + guard`).
    pub fn fade_out(
        &self,
        lane: &mut ParamLane,
        sink: &mut dyn AutomationSink,
        duration: f64,
        now: f64,
    ) -> f64 {
        let from = lane.value_at(now);
        self.ramp_gain(lane, sink, from, 0.0, duration, now);
        now + duration.max(0.0) + self.guard
    }

    /// Short exponential glide towards `target`, starting from the current
    /// value. A non-positive time constant sets the value immediately.
    pub fn glide(
        &self,
        lane: &mut ParamLane,
        sink: &mut dyn AutomationSink,
        target: f32,
        time_constant: f64,
        now: f64,
    ) {
        lane.apply(sink, ParamEvent::CancelAndHold { time: now });
        if time_constant > 0.0 {
            lane.apply(
                sink,
                ParamEvent::SetTarget {
                    target,
                    start_time: now,
                    time_constant,
                },
            );
        } else {
            lane.apply(sink, ParamEvent::SetValue { value: target, time: now });
        }
    }
}
