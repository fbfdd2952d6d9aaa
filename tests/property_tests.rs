//! Property tests for the filter model invariants.

use proptest::prelude::*;
use rc_filter_chip::filter::MAX_OUTPUT_VOLTAGE;
use rc_filter_chip::{ComponentValues, FilterConfig, FilterModel};

fn arb_values() -> impl Strategy<Value = ComponentValues> {
    (0.0f64..1000.0, -3.0f64..6.0, 0.0f64..1000.0, -12.0f64..0.0)
        .prop_map(|(r, rexp, c, cexp)| ComponentValues::new(r, rexp, c, cexp))
}

proptest! {
    /// Under a constant input the distance to the input never grows.
    #[test]
    fn steady_input_converges_monotonically(
        values in arb_values(),
        input in 0.0f64..5.0,
        start in 0.0f64..1024.0,
        ticks in 1usize..50,
    ) {
        let mut model = FilterModel::new(FilterConfig::default());
        model.set_output_voltage(start);

        let mut prev_gap = (start - input).abs();
        for _ in 0..ticks {
            let out = model.tick(input, values);
            let gap = (out - input).abs();
            prop_assert!(gap <= prev_gap + 1e-9, "gap grew from {} to {}", prev_gap, gap);
            prev_gap = gap;
        }
    }

    /// A finite in-band input keeps the output finite and in band.
    #[test]
    fn output_stays_in_band(
        values in arb_values(),
        inputs in proptest::collection::vec(0.0f64..MAX_OUTPUT_VOLTAGE, 1..40),
        start in prop_oneof![Just(f64::NAN), Just(-5.0), Just(5000.0), 0.0f64..1024.0],
    ) {
        let mut model = FilterModel::default();
        model.set_output_voltage(start);

        for input in inputs {
            let out = model.tick(input, values);
            prop_assert!(out.is_finite());
            prop_assert!((0.0..=MAX_OUTPUT_VOLTAGE).contains(&out), "out of band: {}", out);
        }
    }

    /// Static component values are only ever used for one recomputation.
    #[test]
    fn static_values_compute_once(
        values in arb_values(),
        inputs in proptest::collection::vec(0.0f64..5.0, 1..40),
    ) {
        let mut model = FilterModel::default();
        model.tick(0.0, values);
        let tau = model.time_constant().to_bits();
        let frac = model.fractional_approach().to_bits();

        for input in inputs {
            model.tick(input, values);
        }

        prop_assert_eq!(model.recompute_count(), 1);
        prop_assert_eq!(model.time_constant().to_bits(), tau);
        prop_assert_eq!(model.fractional_approach().to_bits(), frac);
    }

    /// A NaN output is replaced by the input on the very next tick.
    #[test]
    fn nan_output_recovers_to_input(
        values in arb_values(),
        input in 0.0f64..5.0,
    ) {
        let mut model = FilterModel::default();
        model.set_output_voltage(f64::NAN);
        prop_assert_eq!(model.tick(input, values), input);
    }
}
