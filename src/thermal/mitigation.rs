//! Post-hoc mitigation generation.
//!
//! Evaluated once after a simulation run, from the peak/min temperatures
//! and the recorded risk windows; mitigations are recommendations for the
//! operator, not part of the timeline.

use serde::Serialize;

use super::{RiskWindow, RiskWindowKind, ThermalConfig};

/// How close the peak/min may get to a limit before the hot/cold rule set
/// fires (K).
const MITIGATION_MARGIN_K: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationKind {
    AttitudeSlew,
    DutyCycle,
    OrbitTiming,
    HeaterActivation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MitigationPriority {
    Required,
    Recommended,
    Optional,
}

/// One recommended action with its expected temperature effect.
#[derive(Clone, Debug, Serialize)]
pub struct Mitigation {
    pub kind: MitigationKind,
    pub description: String,
    /// Expected effect on the offending extreme (signed K).
    pub temperature_impact_k: f64,
    pub priority: MitigationPriority,
}

impl Mitigation {
    fn new(
        kind: MitigationKind,
        description: &str,
        temperature_impact_k: f64,
        priority: MitigationPriority,
    ) -> Self {
        Self {
            kind,
            description: description.to_string(),
            temperature_impact_k,
            priority,
        }
    }
}

/// Generate the mitigation list for a completed run.
///
/// Hot pair (attitude slew, duty-cycle reduction) when the peak comes
/// within 30 K of the max limit, required once the limit is actually
/// breached; cold pair (heater, attitude slew) symmetrically against the
/// min limit; an orbit-timing entry when any eclipse-transition window
/// occurred; a beta-management slew when any high-beta window occurred.
pub fn generate_mitigations(
    config: &ThermalConfig,
    peak_k: f64,
    min_k: f64,
    windows: &[RiskWindow],
) -> Vec<Mitigation> {
    let mut mitigations = Vec::new();

    if peak_k > config.max_temperature_k - MITIGATION_MARGIN_K {
        let priority = if peak_k > config.max_temperature_k {
            MitigationPriority::Required
        } else {
            MitigationPriority::Recommended
        };
        mitigations.push(Mitigation::new(
            MitigationKind::AttitudeSlew,
            "Slew to minimize the sun-facing cross-section through peak heating",
            -12.0,
            priority,
        ));
        mitigations.push(Mitigation::new(
            MitigationKind::DutyCycle,
            "Reduce payload duty cycle to cut internal dissipation",
            -8.0,
            priority,
        ));
    }

    if min_k < config.min_temperature_k + MITIGATION_MARGIN_K {
        let priority = if min_k < config.min_temperature_k {
            MitigationPriority::Required
        } else {
            MitigationPriority::Recommended
        };
        mitigations.push(Mitigation::new(
            MitigationKind::HeaterActivation,
            "Activate survival heaters ahead of eclipse entry",
            15.0,
            priority,
        ));
        mitigations.push(Mitigation::new(
            MitigationKind::AttitudeSlew,
            "Slew to maximize the absorbing area while sunlit",
            6.0,
            priority,
        ));
    }

    let has_eclipse_transition = windows.iter().any(|w| {
        matches!(
            w.kind,
            RiskWindowKind::EclipseEntry | RiskWindowKind::EclipseExit
        )
    });
    if has_eclipse_transition {
        mitigations.push(Mitigation::new(
            MitigationKind::OrbitTiming,
            "Schedule high-power operations away from eclipse transitions",
            -4.0,
            MitigationPriority::Optional,
        ));
    }

    if windows.iter().any(|w| w.kind == RiskWindowKind::HighBeta) {
        mitigations.push(Mitigation::new(
            MitigationKind::AttitudeSlew,
            "Hold a reduced-exposure attitude profile while the beta angle stays high",
            -6.0,
            MitigationPriority::Recommended,
        ));
    }

    mitigations
}
