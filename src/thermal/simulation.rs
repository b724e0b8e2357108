//! The per-step simulation loop, risk-window state machine and aggregate
//! scoring.

use chrono::{DateTime, Duration, Utc};

use crate::orbit;

use super::flux::{compute_heat_fluxes, propagate_temperature};
use super::mitigation::generate_mitigations;
use super::{
    OrbitalState, RiskLevel, RiskWindow, RiskWindowKind, ThermalConfig, ThermalError,
    ThermalPrediction, ThermalState, WindowSeverity,
};

/// Temperature every run starts from (K).
pub const INITIAL_TEMPERATURE_K: f64 = 293.15;

/// Default integration step (s). Validated as stable for all shipped
/// presets; smaller thermal masses need proportionally smaller steps.
pub const DEFAULT_STEP_SECONDS: f64 = 60.0;

/// Margin to an operational limit below which a step is critical (K).
const CRITICAL_MARGIN_K: f64 = 10.0;

/// Margin to an operational limit below which a step is a warning (K).
const WARNING_MARGIN_K: f64 = 30.0;

/// Continuous sunlit time that opens a prolonged-sun window (s).
const PROLONGED_SUN_SECONDS: f64 = 3600.0;

/// |beta| above this opens a high-beta window (rad, 60°).
const HIGH_BETA_RAD: f64 = 60.0 * std::f64::consts::PI / 180.0;

/// A window closing within this margin of the max limit is critical (K).
const CRITICAL_WINDOW_MARGIN_K: f64 = 20.0;

/// Classify one timestep against the operational limits.
fn classify_risk(config: &ThermalConfig, temperature_k: f64) -> RiskLevel {
    let margin = (config.max_temperature_k - temperature_k).min(temperature_k - config.min_temperature_k);
    if margin < CRITICAL_MARGIN_K {
        RiskLevel::Critical
    } else if margin < WARNING_MARGIN_K {
        RiskLevel::Warning
    } else {
        RiskLevel::Nominal
    }
}

/// A risk window that has been opened but not yet closed.
struct OpenWindow {
    start: DateTime<Utc>,
    kind: RiskWindowKind,
    peak_temperature_k: f64,
}

impl OpenWindow {
    fn close(self, end: DateTime<Utc>, config: &ThermalConfig) -> RiskWindow {
        let severity = if self.peak_temperature_k > config.max_temperature_k - CRITICAL_WINDOW_MARGIN_K
        {
            WindowSeverity::Critical
        } else {
            WindowSeverity::Warning
        };
        let description = match self.kind {
            RiskWindowKind::EclipseExit => {
                "Rapid heating after eclipse exit; thermal gradients peak".to_string()
            }
            RiskWindowKind::EclipseEntry => {
                "Cooling transient after eclipse entry; cold-side limits approached".to_string()
            }
            RiskWindowKind::HighBeta => {
                "High beta angle; continuous sun exposure with little eclipse relief".to_string()
            }
            RiskWindowKind::ProlongedSun => {
                "Extended sunlit arc; heat soak exceeds one hour".to_string()
            }
        };
        RiskWindow {
            start: self.start,
            end,
            kind: self.kind,
            severity,
            peak_temperature_k: self.peak_temperature_k,
            description,
        }
    }
}

/// Aggregate risk score for one run, clamped to [0, 100].
///
/// Temperature-range term: 50 · max(0, (peak−max+50)/100, (min_limit−min+50)/100);
/// plus 15 per critical window and 8 per warning window.
fn aggregate_risk_score(
    config: &ThermalConfig,
    peak_k: f64,
    min_k: f64,
    windows: &[RiskWindow],
) -> u32 {
    let over = (peak_k - config.max_temperature_k + 50.0) / 100.0;
    let under = (config.min_temperature_k - min_k + 50.0) / 100.0;
    let range_term = 50.0 * over.max(under).max(0.0);

    let window_term: f64 = windows
        .iter()
        .map(|w| match w.severity {
            WindowSeverity::Critical => 15.0,
            WindowSeverity::Warning => 8.0,
        })
        .sum();

    (range_term + window_term).min(100.0).round() as u32
}

/// Run one thermal simulation.
///
/// Produces `floor(duration/step) + 1` timeline entries: the initial state
/// plus one per completed step. The run is fully deterministic for a fixed
/// `start_time`.
///
/// Per step:
/// 1. Re-derive the circular-orbit position and the sun direction.
/// 2. Compute the flux breakdown and classify the risk level
///    (margins: <10 K critical, <30 K warning).
/// 3. Feed the risk-window state machine: windows open on eclipse
///    transitions, a sunlit arc exceeding one hour, or |beta| > 60°, and
///    close when the risk level returns to nominal. Only one window can be
///    open at a time; concurrent triggers do not stack.
/// 4. Stamp the first breach of either operational limit.
/// 5. Integrate the temperature forward one Euler step.
pub fn run_thermal_simulation(
    config: &ThermalConfig,
    orbit_state: &OrbitalState,
    start_time: DateTime<Utc>,
    duration_s: f64,
    step_s: f64,
) -> Result<ThermalPrediction, ThermalError> {
    config.validate()?;
    if !(step_s > 0.0) {
        return Err(ThermalError::InvalidStep(step_s));
    }
    if !(duration_s > 0.0) {
        return Err(ThermalError::InvalidDuration(duration_s));
    }

    let steps = (duration_s / step_s).floor() as usize;
    let mut timeline = Vec::with_capacity(steps + 1);
    let mut windows = Vec::new();

    let mut temperature = INITIAL_TEMPERATURE_K;
    let mut peak_k = temperature;
    let mut min_k = temperature;
    let mut time_to_overheat_s = None;
    let mut time_to_underheat_s = None;

    let mut open_window: Option<OpenWindow> = None;
    let mut prev_eclipse: Option<bool> = None;
    let mut sunlit_run_s = 0.0;
    let mut prolonged_sun_latched = false;
    let mut high_beta_latched = false;
    let mut last_time = start_time;

    for i in 0..=steps {
        let elapsed_s = i as f64 * step_s;
        let time = start_time + Duration::milliseconds((elapsed_s * 1000.0).round() as i64);
        last_time = time;

        let step_state = OrbitalState {
            position_km: orbit::circular_position(
                orbit_state.altitude_km,
                orbit_state.inclination_rad,
                elapsed_s,
            ),
            ..*orbit_state
        };
        let sun = orbit::sun_direction(time);
        let fluxes = compute_heat_fluxes(config, &step_state, sun, temperature);

        peak_k = peak_k.max(temperature);
        min_k = min_k.min(temperature);
        if temperature > config.max_temperature_k && time_to_overheat_s.is_none() {
            time_to_overheat_s = Some(elapsed_s);
        }
        if temperature < config.min_temperature_k && time_to_underheat_s.is_none() {
            time_to_underheat_s = Some(elapsed_s);
        }

        let risk = classify_risk(config, temperature);
        timeline.push(ThermalState {
            time,
            temperature_k: temperature,
            solar_flux: fluxes.solar,
            albedo_flux: fluxes.albedo,
            earth_ir_flux: fluxes.earth_ir,
            internal_flux: fluxes.internal,
            net_flux: fluxes.net,
            in_eclipse: fluxes.in_eclipse,
            risk,
        });

        // Track the continuous sunlit arc; eclipse resets it and re-arms
        // the prolonged-sun trigger.
        if fluxes.in_eclipse {
            sunlit_run_s = 0.0;
            prolonged_sun_latched = false;
        } else if i > 0 {
            sunlit_run_s += step_s;
        }

        // Trigger detection. Conditions that fire while a window is
        // already open are dropped, not queued.
        let mut trigger = None;
        if let Some(prev) = prev_eclipse {
            if prev && !fluxes.in_eclipse {
                trigger = Some(RiskWindowKind::EclipseExit);
            } else if !prev && fluxes.in_eclipse {
                trigger = Some(RiskWindowKind::EclipseEntry);
            }
        }
        if trigger.is_none() && !prolonged_sun_latched && sunlit_run_s > PROLONGED_SUN_SECONDS {
            trigger = Some(RiskWindowKind::ProlongedSun);
            prolonged_sun_latched = true;
        }
        if trigger.is_none() && !high_beta_latched && orbit_state.beta_angle_rad.abs() > HIGH_BETA_RAD
        {
            trigger = Some(RiskWindowKind::HighBeta);
            high_beta_latched = true;
        }

        let mut close_now = false;
        if let Some(window) = open_window.as_mut() {
            window.peak_temperature_k = window.peak_temperature_k.max(temperature);
            close_now = risk == RiskLevel::Nominal;
        }
        if close_now {
            if let Some(window) = open_window.take() {
                windows.push(window.close(time, config));
            }
        } else if open_window.is_none() {
            if let Some(kind) = trigger {
                open_window = Some(OpenWindow {
                    start: time,
                    kind,
                    peak_temperature_k: temperature,
                });
            }
        }
        prev_eclipse = Some(fluxes.in_eclipse);

        if i < steps {
            temperature = propagate_temperature(config, temperature, fluxes.net, step_s);
        }
    }

    // A window still open when the run ends closes at the final timestamp.
    if let Some(window) = open_window {
        windows.push(window.close(last_time, config));
    }

    let risk_score = aggregate_risk_score(config, peak_k, min_k, &windows);
    let mitigations = generate_mitigations(config, peak_k, min_k, &windows);

    Ok(ThermalPrediction {
        peak_temperature_k: peak_k,
        min_temperature_k: min_k,
        time_to_overheat_s,
        time_to_underheat_s,
        risk_score,
        windows,
        mitigations,
        timeline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-20T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_classify_risk_margins() {
        let config = ThermalConfig::leo_default();
        let mid = (config.min_temperature_k + config.max_temperature_k) / 2.0;
        assert_eq!(classify_risk(&config, mid), RiskLevel::Nominal);

        // 25 K below the max limit: warning
        assert_eq!(
            classify_risk(&config, config.max_temperature_k - 25.0),
            RiskLevel::Warning
        );
        // 5 K below the max limit: critical
        assert_eq!(
            classify_risk(&config, config.max_temperature_k - 5.0),
            RiskLevel::Critical
        );
        // Past the limit is still critical
        assert_eq!(
            classify_risk(&config, config.max_temperature_k + 40.0),
            RiskLevel::Critical
        );
        // Near the cold limit
        assert_eq!(
            classify_risk(&config, config.min_temperature_k + 12.0),
            RiskLevel::Warning
        );
    }

    #[test]
    fn test_timeline_length_and_finiteness() {
        let config = ThermalConfig::leo_default();
        let orbit_state = OrbitalState::circular(400.0, 0.9, 0.3);

        let prediction =
            run_thermal_simulation(&config, &orbit_state, start(), 10_800.0, 60.0).unwrap();

        assert_eq!(prediction.timeline.len(), 10_800 / 60 + 1);
        for entry in &prediction.timeline {
            assert!(entry.temperature_k.is_finite());
            assert!(entry.net_flux.is_finite());
        }
        assert!(prediction.peak_temperature_k >= prediction.min_temperature_k);
    }

    #[test]
    fn test_duration_shorter_than_step_yields_single_entry() {
        let config = ThermalConfig::leo_default();
        let orbit_state = OrbitalState::circular(400.0, 0.9, 0.3);
        let prediction =
            run_thermal_simulation(&config, &orbit_state, start(), 30.0, 60.0).unwrap();
        assert_eq!(prediction.timeline.len(), 1);
        assert_eq!(prediction.timeline[0].temperature_k, INITIAL_TEMPERATURE_K);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let orbit_state = OrbitalState::circular(400.0, 0.9, 0.3);

        let mut config = ThermalConfig::leo_default();
        config.mass_kg = -1.0;
        assert!(run_thermal_simulation(&config, &orbit_state, start(), 3600.0, 60.0).is_err());

        let config = ThermalConfig::leo_default();
        assert!(matches!(
            run_thermal_simulation(&config, &orbit_state, start(), 3600.0, 0.0),
            Err(ThermalError::InvalidStep(_))
        ));
        assert!(matches!(
            run_thermal_simulation(&config, &orbit_state, start(), -10.0, 60.0),
            Err(ThermalError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_high_beta_opens_window() {
        let config = ThermalConfig::leo_default();
        // 70° beta, above the 60° trigger
        let orbit_state = OrbitalState::circular(400.0, 0.9, 70.0_f64.to_radians());

        let prediction =
            run_thermal_simulation(&config, &orbit_state, start(), 10_800.0, 60.0).unwrap();
        assert!(
            prediction
                .windows
                .iter()
                .any(|w| w.kind == RiskWindowKind::HighBeta),
            "expected a high-beta window, got {:?}",
            prediction.windows
        );
    }

    #[test]
    fn test_windows_never_overlap() {
        let config = ThermalConfig::cubesat();
        let orbit_state = OrbitalState::circular(400.0, 0.9, 0.3);

        let prediction =
            run_thermal_simulation(&config, &orbit_state, start(), 21_600.0, 30.0).unwrap();

        for pair in prediction.windows.windows(2) {
            assert!(
                pair[0].end <= pair[1].start,
                "risk windows must not overlap: {:?} then {:?}",
                pair[0],
                pair[1]
            );
        }
        for window in &prediction.windows {
            assert!(window.start <= window.end);
        }
    }

    #[test]
    fn test_first_breach_only_is_stamped() {
        // Tiny thermal mass and heavy internal dissipation force an
        // overheat quickly; the stamp must stay at the first breach.
        let config = ThermalConfig {
            mass_kg: 2.0,
            surface_area_m2: 0.3,
            absorptivity: 0.9,
            emissivity: 0.2,
            specific_heat: 400.0,
            internal_power_w: 150.0,
            min_temperature_k: 253.15,
            max_temperature_k: 323.15,
        };
        let orbit_state = OrbitalState::circular(400.0, 0.9, 0.3);

        let prediction =
            run_thermal_simulation(&config, &orbit_state, start(), 10_800.0, 30.0).unwrap();

        let first_breach = prediction
            .timeline
            .iter()
            .position(|e| e.temperature_k > config.max_temperature_k)
            .expect("this config must overheat");
        assert_eq!(
            prediction.time_to_overheat_s,
            Some(first_breach as f64 * 30.0)
        );
        assert!(prediction.risk_score > 0);
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let config = ThermalConfig::leo_default();
        let orbit_state = OrbitalState::circular(400.0, 0.9, 0.3);

        let a = run_thermal_simulation(&config, &orbit_state, start(), 10_800.0, 60.0).unwrap();
        let b = run_thermal_simulation(&config, &orbit_state, start(), 10_800.0, 60.0).unwrap();

        assert_eq!(a.timeline, b.timeline, "identical inputs must produce bit-identical timelines");
        assert_eq!(a.risk_score, b.risk_score);
    }
}
