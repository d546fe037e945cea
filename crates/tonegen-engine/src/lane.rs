//! Control-side mirror of an automation curve.

use tonegen_core::{AutomationCurve, ParamEvent};
use tonegen_synth::{ParamTarget, RenderCommand};

use crate::sink::AutomationSink;

/// An automation curve the engine writes to the audio path.
///
/// Every event is applied to a local [`AutomationCurve`] and forwarded to the
/// sink, so `value_at` answers "what is the renderer producing at time t"
/// exactly, without a round trip to the audio thread.
#[derive(Debug, Clone)]
pub struct ParamLane {
    target: ParamTarget,
    curve: AutomationCurve,
}

impl ParamLane {
    /// Create a lane whose curve starts at `initial`, matching the renderer's
    /// initial value for `target`.
    pub fn new(target: ParamTarget, initial: f32) -> Self {
        Self {
            target,
            curve: AutomationCurve::new(initial),
        }
    }

    /// The curve this lane drives.
    pub fn target(&self) -> ParamTarget {
        self.target
    }

    /// Apply locally and forward to the renderer.
    pub fn apply(&mut self, sink: &mut dyn AutomationSink, event: ParamEvent) {
        self.curve.apply(event);
        sink.submit(RenderCommand::Automate {
            target: self.target,
            event,
        });
    }

    /// Value of the curve at clock time `t`.
    pub fn value_at(&self, t: f64) -> f32 {
        self.curve.value_at(t)
    }

    /// Local copy of the curve.
    pub fn curve(&self) -> &AutomationCurve {
        &self.curve
    }
}
