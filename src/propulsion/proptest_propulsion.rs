//! Property-based tests for the rocket-equation engine using proptest.
//!
//! These verify inverse consistency and monotonicity across a wide range
//! of plausible propulsion states.

use proptest::prelude::*;

use super::{LifetimeStatus, SpacecraftPropulsion};

fn arb_propulsion() -> impl Strategy<Value = SpacecraftPropulsion> {
    (
        100.0f64..5000.0,  // dry mass
        10.0f64..500.0,    // initial propellant
        0.1f64..0.95,      // current fraction of initial
        150.0f64..450.0,   // Isp
        0.5f64..400.0,     // thrust
        0.0f64..0.2,       // reserve fraction of initial
    )
        .prop_map(|(dry, initial, fill, isp, thrust, reserve_frac)| SpacecraftPropulsion {
            dry_mass_kg: dry,
            propellant_kg: initial * fill,
            initial_propellant_kg: initial,
            specific_impulse_s: isp,
            thrust_n: thrust,
            min_reserve_kg: initial * reserve_frac,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Δv followed by the inverse rocket equation recovers the burned mass.
    #[test]
    fn prop_rocket_equation_round_trip(
        propulsion in arb_propulsion(),
        used_fraction in 0.01f64..0.99,
    ) {
        let used = propulsion.propellant_kg * used_fraction;
        let dv = propulsion.delta_v(used).expect("burn within the available load");
        let recovered = propulsion.propellant_required(dv);

        let error = (recovered - used).abs() / used.max(1e-12);
        prop_assert!(
            error < 1e-9,
            "round trip drifted: used {used}, recovered {recovered}"
        );
    }

    /// Δv is strictly monotone in the propellant burned.
    #[test]
    fn prop_delta_v_monotone_in_burn(
        propulsion in arb_propulsion(),
        f1 in 0.01f64..0.95,
        f2 in 0.01f64..0.95,
    ) {
        prop_assume!((f1 - f2).abs() > 1e-6);
        let (small, large) = if f1 < f2 { (f1, f2) } else { (f2, f1) };

        let dv_small = propulsion.delta_v(propulsion.propellant_kg * small).unwrap();
        let dv_large = propulsion.delta_v(propulsion.propellant_kg * large).unwrap();
        prop_assert!(dv_large > dv_small);
    }

    /// Burning past the available load is always an explicit error, never
    /// an infinite or NaN Δv.
    #[test]
    fn prop_overdraw_is_an_error(
        propulsion in arb_propulsion(),
        excess in 1.0f64..10.0,
    ) {
        let result = propulsion.delta_v(propulsion.propellant_kg * excess);
        prop_assert!(result.is_err());
    }

    /// Capacity never exceeds the Δv of burning every usable drop, and the
    /// required propellant for that capacity fits the usable load.
    #[test]
    fn prop_capacity_fits_usable_load(propulsion in arb_propulsion()) {
        let capacity = propulsion.total_delta_v_capacity();
        prop_assert!(capacity >= 0.0);
        prop_assert!(capacity.is_finite());

        if capacity > 0.0 {
            let needed = propulsion.propellant_required(capacity);
            let usable = propulsion.propellant_kg - propulsion.min_reserve_kg;
            prop_assert!(
                needed <= usable + 1e-9,
                "capacity {capacity} needs {needed} kg but only {usable} kg usable"
            );
        }
    }

    /// The status classification is total and consistent with the margin.
    #[test]
    fn prop_status_matches_margin(
        propulsion in arb_propulsion(),
        cumulative_dv in 0.0f64..500.0,
    ) {
        let state = propulsion.mission_lifetime_state(cumulative_dv);
        prop_assert_eq!(
            state.status,
            LifetimeStatus::from_margin(state.operational_margin_pct)
        );
        prop_assert!(state.operational_margin_pct <= state.lifetime_pct + 1e-9);
        prop_assert!(state.operational_margin_pct <= state.propellant_pct + 1e-9);
        prop_assert!(state.lifetime_pct <= 100.0);
    }
}
