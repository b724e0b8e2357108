//! Integration tests for the thermal simulation.

mod common;

use leorisk::server::{run_simulation, SimulationParams};
use leorisk::thermal::{
    run_thermal_simulation, MitigationKind, OrbitalState, RiskLevel, SpacecraftClass,
    ThermalConfig, DEFAULT_STEP_SECONDS, INITIAL_TEMPERATURE_K,
};

use common::epoch;

#[test]
fn test_three_hour_reference_run() {
    // mass 1000 kg, 20 m², α 0.3, ε 0.85, cp 900, 500 W internal
    let config = ThermalConfig::leo_default();
    let orbit = OrbitalState::circular(400.0, 0.9, 0.3);

    let prediction =
        run_thermal_simulation(&config, &orbit, epoch(), 10_800.0, 60.0).unwrap();

    // floor(10800/60) + 1 entries
    assert_eq!(prediction.timeline.len(), 181);
    assert_eq!(prediction.timeline[0].temperature_k, INITIAL_TEMPERATURE_K);
    for entry in &prediction.timeline {
        assert!(
            entry.temperature_k.is_finite(),
            "temperature must stay finite throughout the run"
        );
        assert!(entry.temperature_k > 0.0);
    }
    assert!(prediction.risk_score <= 100);
}

#[test]
fn test_leo_orbit_sees_both_sun_and_shadow() {
    let config = ThermalConfig::leo_default();
    let orbit = OrbitalState::circular(400.0, 0.9, 0.3);

    // Two full orbits at 400 km
    let prediction =
        run_thermal_simulation(&config, &orbit, epoch(), 11_200.0, 60.0).unwrap();

    let eclipsed = prediction.timeline.iter().filter(|e| e.in_eclipse).count();
    let sunlit = prediction.timeline.len() - eclipsed;
    assert!(eclipsed > 0, "a 400 km near-equinox orbit must cross the shadow");
    assert!(sunlit > eclipsed, "most of a LEO orbit is sunlit");

    // Direct solar flux must vanish exactly in eclipse and return outside
    for entry in &prediction.timeline {
        if entry.in_eclipse {
            assert_eq!(entry.solar_flux, 0.0);
        } else {
            assert!(entry.solar_flux > 0.0);
        }
    }
}

#[test]
fn test_identical_runs_are_bit_identical() {
    let config = SpacecraftClass::CubeSat.config();
    let orbit = OrbitalState::circular(500.0, 0.9, 0.3);

    let a = run_thermal_simulation(&config, &orbit, epoch(), 10_800.0, 60.0).unwrap();
    let b = run_thermal_simulation(&config, &orbit, epoch(), 10_800.0, 60.0).unwrap();

    assert_eq!(a.timeline, b.timeline);
    assert_eq!(a.risk_score, b.risk_score);
    assert_eq!(a.time_to_overheat_s, b.time_to_overheat_s);
    assert_eq!(a.windows.len(), b.windows.len());
}

#[test]
fn test_risk_windows_are_exclusive_and_ordered() {
    // The cubesat's small thermal mass produces plenty of transitions.
    let config = SpacecraftClass::CubeSat.config();
    let orbit = OrbitalState::circular(400.0, 0.9, 0.3);

    let prediction =
        run_thermal_simulation(&config, &orbit, epoch(), 21_600.0, 30.0).unwrap();

    for window in &prediction.windows {
        assert!(window.start <= window.end);
        assert!(window.peak_temperature_k.is_finite());
    }
    for pair in prediction.windows.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "at most one risk window may be open at any timestamp"
        );
    }
}

#[test]
fn test_hot_spacecraft_gets_hot_mitigations() {
    // High absorptivity, low emissivity, small thermal mass: runs hot.
    let config = ThermalConfig {
        mass_kg: 5.0,
        surface_area_m2: 0.4,
        absorptivity: 0.9,
        emissivity: 0.3,
        specific_heat: 600.0,
        internal_power_w: 60.0,
        min_temperature_k: 253.15,
        max_temperature_k: 323.15,
    };
    let orbit = OrbitalState::circular(400.0, 0.9, 0.3);

    let prediction =
        run_thermal_simulation(&config, &orbit, epoch(), 10_800.0, 30.0).unwrap();

    assert!(prediction.peak_temperature_k > config.max_temperature_k);
    assert!(prediction.time_to_overheat_s.is_some());

    let kinds: Vec<MitigationKind> = prediction.mitigations.iter().map(|m| m.kind).collect();
    assert!(kinds.contains(&MitigationKind::AttitudeSlew));
    assert!(kinds.contains(&MitigationKind::DutyCycle));

    // The timeline must flag the breach steps as critical
    assert!(prediction
        .timeline
        .iter()
        .any(|e| e.risk == RiskLevel::Critical));
}

#[test]
fn test_station_class_damps_the_orbit_cycle() {
    // 420 t of thermal mass keeps the three-hour swing to a few kelvin,
    // far inside the band a cubesat sweeps over the same orbits.
    let station = run_thermal_simulation(
        &SpacecraftClass::Station.config(),
        &OrbitalState::circular(420.0, 0.9, 0.3),
        epoch(),
        10_800.0,
        60.0,
    )
    .unwrap();
    let cubesat = run_thermal_simulation(
        &SpacecraftClass::CubeSat.config(),
        &OrbitalState::circular(420.0, 0.9, 0.3),
        epoch(),
        10_800.0,
        60.0,
    )
    .unwrap();

    let station_swing = station.peak_temperature_k - station.min_temperature_k;
    let cubesat_swing = cubesat.peak_temperature_k - cubesat.min_temperature_k;
    assert!(
        station_swing < 10.0,
        "station-class thermal mass should damp the orbit cycle, swing was {station_swing} K"
    );
    assert!(station_swing < cubesat_swing / 2.0);
}

#[test]
fn test_http_wrapper_round_trip() {
    let params = SimulationParams {
        altitude: 400.0,
        inclination: 0.9,
        beta_angle: 0.3,
        duration: 10_800.0,
        spacecraft_type: SpacecraftClass::Default,
    };

    let response = run_simulation(params, epoch()).unwrap();
    assert!(response.success);

    // The wrapper must agree with a direct engine run at the default step.
    let direct = run_thermal_simulation(
        &SpacecraftClass::Default.config(),
        &OrbitalState::circular(400.0, 0.9, 0.3),
        epoch(),
        10_800.0,
        DEFAULT_STEP_SECONDS,
    )
    .unwrap();

    assert_eq!(response.data.risk_score, direct.risk_score);
    assert_eq!(
        response.data.peak_temperature.kelvin,
        direct.peak_temperature_k
    );
    assert_eq!(response.data.mitigations.len(), direct.mitigations.len());
}
