//! Deterministic parameter automation.
//!
//! An [`AutomationCurve`] is a timeline of [`ParamEvent`]s anchored to absolute
//! clock times (seconds on the [`SampleClock`](crate::SampleClock)). It can be
//! evaluated at any time with [`AutomationCurve::value_at`], and the result
//! depends only on the events applied, never on when they were applied. That
//! lets the control thread keep an exact mirror of a curve it hands to the
//! audio thread: both sides apply the same events and see the same value.
//!
//! ## Event Semantics
//!
//! - **SetValue**: jump to `value` at `time`.
//! - **LinearRamp**: interpolate linearly from the previous event (its time and
//!   value) to `value` at `end_time`. A ramp that ends at or before the
//!   previous event acts as an instant set.
//! - **SetTarget**: from `start_time`, approach `target` exponentially with
//!   `time_constant` seconds (`v = target + (v0 - target)·e^(-Δt/τ)`), until the
//!   next event takes over. A non-positive time constant jumps immediately.
//! - **CancelAndHold**: evaluate the curve at `time`, drop every event and pin
//!   that value at `time`. Curves stay short because every scheduling call
//!   starts with one.
//!
//! ```rust
//! use tonegen_core::{AutomationCurve, ParamEvent};
//!
//! let mut gain = AutomationCurve::new(0.0);
//! gain.set_value_at(1.0, 0.0);
//! gain.linear_ramp_to(1.1, 1.0);
//! // Interrupt halfway: the hold starts from the actual value, not the target.
//! let held = gain.cancel_and_hold(1.05);
//! assert!((held - 0.5).abs() < 1e-4);
//! assert!((gain.value_at(2.0) - 0.5).abs() < 1e-4);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use libm::exp;

/// A single automation instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamEvent {
    /// Jump to `value` at `time`.
    SetValue {
        /// New value.
        value: f32,
        /// Clock time in seconds.
        time: f64,
    },
    /// Linear ramp from the previous event to `value`, arriving at `end_time`.
    LinearRamp {
        /// Value reached at `end_time`.
        value: f32,
        /// Clock time in seconds at which the ramp completes.
        end_time: f64,
    },
    /// Exponential approach towards `target` starting at `start_time`.
    SetTarget {
        /// Value approached asymptotically.
        target: f32,
        /// Clock time in seconds at which the approach begins.
        start_time: f64,
        /// Time constant in seconds (≈63% of the way after one constant).
        time_constant: f64,
    },
    /// Freeze the curve at its value at `time`, discarding all events.
    CancelAndHold {
        /// Clock time in seconds.
        time: f64,
    },
}

impl ParamEvent {
    /// The clock time this event is ordered by.
    pub fn time(&self) -> f64 {
        match *self {
            ParamEvent::SetValue { time, .. } | ParamEvent::CancelAndHold { time } => time,
            ParamEvent::LinearRamp { end_time, .. } => end_time,
            ParamEvent::SetTarget { start_time, .. } => start_time,
        }
    }
}

/// A parameter timeline evaluated at absolute clock times.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationCurve {
    /// Value before the first event.
    initial: f32,
    /// Events sorted by [`ParamEvent::time`]; never contains `CancelAndHold`.
    events: Vec<ParamEvent>,
}

impl AutomationCurve {
    /// Create a curve holding `initial` until the first event.
    pub fn new(initial: f32) -> Self {
        Self {
            initial,
            events: Vec::with_capacity(4),
        }
    }

    /// Drop every event and hold `initial`, keeping the event storage.
    pub fn reset(&mut self, initial: f32) {
        self.initial = initial;
        self.events.clear();
    }

    /// Apply an event to the timeline.
    ///
    /// Events with equal times keep their application order.
    pub fn apply(&mut self, event: ParamEvent) {
        if let ParamEvent::CancelAndHold { time } = event {
            self.cancel_and_hold(time);
            return;
        }
        let at = self.events.partition_point(|e| e.time() <= event.time());
        self.events.insert(at, event);
    }

    /// Schedule a jump to `value` at `time`.
    pub fn set_value_at(&mut self, time: f64, value: f32) {
        self.apply(ParamEvent::SetValue { value, time });
    }

    /// Schedule a linear ramp from the previous event to `value` at `end_time`.
    pub fn linear_ramp_to(&mut self, end_time: f64, value: f32) {
        self.apply(ParamEvent::LinearRamp { value, end_time });
    }

    /// Schedule an exponential approach to `target` from `start_time`.
    pub fn set_target_at(&mut self, start_time: f64, target: f32, time_constant: f64) {
        self.apply(ParamEvent::SetTarget {
            target,
            start_time,
            time_constant,
        });
    }

    /// Pin the curve at its value at `time` and drop all scheduled events.
    ///
    /// Returns the held value.
    pub fn cancel_and_hold(&mut self, time: f64) -> f32 {
        let held = self.value_at(time);
        self.events.clear();
        self.initial = held;
        self.events.push(ParamEvent::SetValue { value: held, time });
        held
    }

    /// Scheduled events, in time order.
    pub fn events(&self) -> &[ParamEvent] {
        &self.events
    }

    /// Evaluate the curve at clock time `t` (seconds).
    pub fn value_at(&self, t: f64) -> f32 {
        let mut value = self.initial;
        // Time and value of the last event that has fully taken effect.
        let mut since = 0.0_f64;

        for (i, event) in self.events.iter().enumerate() {
            match *event {
                ParamEvent::SetValue { value: v, time } => {
                    if time > t {
                        break;
                    }
                    value = v;
                    since = time;
                }
                ParamEvent::LinearRamp {
                    value: target,
                    end_time,
                } => {
                    if end_time <= t {
                        value = target;
                        since = end_time;
                        continue;
                    }
                    if end_time <= since || t <= since {
                        return value;
                    }
                    let progress = (t - since) / (end_time - since);
                    return value + (target - value) * progress as f32;
                }
                ParamEvent::SetTarget {
                    target,
                    start_time,
                    time_constant,
                } => {
                    if start_time > t {
                        break;
                    }
                    let end = match self.events.get(i + 1) {
                        Some(ParamEvent::LinearRamp { .. }) => start_time,
                        Some(next) => next.time(),
                        None => f64::INFINITY,
                    };
                    if t < end {
                        return approach(value, target, t - start_time, time_constant);
                    }
                    value = approach(value, target, end - start_time, time_constant);
                    since = end;
                }
                // Never stored; `apply` resolves it immediately.
                ParamEvent::CancelAndHold { .. } => {}
            }
        }

        value
    }
}

/// One-pole exponential approach from `from` towards `target` after `elapsed`
/// seconds.
#[inline]
fn approach(from: f32, target: f32, elapsed: f64, time_constant: f64) -> f32 {
    if time_constant <= 0.0 {
        return target;
    }
    let remaining = exp(-elapsed.max(0.0) / time_constant) as f32;
    target + (from - target) * remaining
}
