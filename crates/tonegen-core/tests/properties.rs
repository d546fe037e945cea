//! Property-based tests for tonegen-core primitives.
//!
//! Covers note mapping totality, clamping and automation curve continuity.

use proptest::prelude::*;
use tonegen_core::{
    AutomationCurve, FREQ_MAX_HZ, FREQ_MIN_HZ, NOTE_NAMES, ParamEvent, clamp_frequency,
    clamp_volume, frequency_to_note,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every playable frequency maps to a table name, a sane octave and cents
    /// within [-50, 50].
    #[test]
    fn note_mapping_is_total(freq in FREQ_MIN_HZ..=FREQ_MAX_HZ) {
        let label = frequency_to_note(freq);
        prop_assert!(NOTE_NAMES.contains(&label.name), "unknown name {}", label.name);
        prop_assert!((0..=10).contains(&label.octave), "octave {} for {} Hz", label.octave, freq);
        prop_assert!((-50..=50).contains(&label.cents), "cents {} for {} Hz", label.cents, freq);
    }

    /// Doubling a frequency keeps the pitch name and raises the octave by one.
    #[test]
    fn octave_doubling(freq in 30.0f32..9000.0) {
        let low = frequency_to_note(freq);
        let high = frequency_to_note(freq * 2.0);
        // Skip values sitting on a rounding boundary.
        prop_assume!(low.cents.abs() < 49);
        prop_assert_eq!(low.name, high.name);
        prop_assert_eq!(low.octave + 1, high.octave);
    }

    /// Clamped frequencies always land inside the playable range.
    #[test]
    fn frequency_clamp_in_range(freq in proptest::num::f32::ANY) {
        let clamped = clamp_frequency(freq);
        prop_assert!((FREQ_MIN_HZ..=FREQ_MAX_HZ).contains(&clamped), "got {}", clamped);
    }

    /// Clamped volumes always land in [0, 1].
    #[test]
    fn volume_clamp_in_range(volume in proptest::num::f32::ANY) {
        let clamped = clamp_volume(volume);
        prop_assert!((0.0..=1.0).contains(&clamped), "got {}", clamped);
    }

    /// A ramp interrupted by cancel-and-hold continues from the interrupted
    /// value: no jump at the hold point.
    #[test]
    fn hold_is_continuous(
        from in 0.0f32..=1.0,
        to in 0.0f32..=1.0,
        duration in 0.0f64..0.5,
        cut in 0.0f64..1.0,
    ) {
        let mut curve = AutomationCurve::new(from);
        curve.apply(ParamEvent::SetValue { value: from, time: 0.0 });
        curve.apply(ParamEvent::LinearRamp { value: to, end_time: duration });

        let hold_time = cut * duration;
        let before = curve.value_at(hold_time);
        curve.apply(ParamEvent::CancelAndHold { time: hold_time });
        let after = curve.value_at(hold_time);

        prop_assert!((before - after).abs() < 1e-6, "jump {} -> {}", before, after);
        prop_assert!(after.is_finite());
    }

    /// Linear ramps stay between their endpoints.
    #[test]
    fn ramp_stays_between_endpoints(
        from in 0.0f32..=1.0,
        to in 0.0f32..=1.0,
        duration in 0.0f64..0.5,
        t in 0.0f64..1.0,
    ) {
        let mut curve = AutomationCurve::new(0.0);
        curve.apply(ParamEvent::SetValue { value: from, time: 0.0 });
        curve.apply(ParamEvent::LinearRamp { value: to, end_time: duration });
        let v = curve.value_at(t);
        let (lo, hi) = if from < to { (from, to) } else { (to, from) };
        prop_assert!(v >= lo - 1e-6 && v <= hi + 1e-6, "{} outside [{}, {}]", v, lo, hi);
    }
}
