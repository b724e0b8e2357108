//! Maneuver planning and lifetime-impact assessment.
//!
//! Plans are pure data; "applying" one means assessing it against a
//! propulsion state and, if accepted, deriving a post-burn copy of that
//! state. All timestamps are explicit arguments so planning stays
//! deterministic.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{
    LifetimeStatus, MissionLifetimeState, SpacecraftPropulsion, STATION_KEEPING_DV_PER_YEAR,
};

/// Base Δv of a collision-avoidance burn before threat and geometry
/// scaling (m/s).
const BASE_AVOIDANCE_DV: f64 = 0.5;

/// Margin-reduction (percentage points) above which a low-priority
/// maneuver is rejected outright.
const REJECT_MARGIN_POINTS: f64 = 10.0;

/// Margin-reduction above which optimization is suggested.
const OPTIMIZE_MARGIN_POINTS: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverType {
    CollisionAvoidance,
    StationKeeping,
    OrbitRaise,
    Deorbit,
    AttitudeCorrection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManeuverPriority {
    Critical,
    High,
    Medium,
    Low,
}

/// Conjunction threat classification driving avoidance sizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl ThreatLevel {
    /// Δv scaling per threat level.
    fn delta_v_multiplier(self) -> f64 {
        match self {
            ThreatLevel::Critical => 2.5,
            ThreatLevel::High => 1.8,
            ThreatLevel::Medium => 1.2,
            ThreatLevel::Low => 0.6,
        }
    }

    /// Maneuver priority mirrors the threat level.
    fn priority(self) -> ManeuverPriority {
        match self {
            ThreatLevel::Critical => ManeuverPriority::Critical,
            ThreatLevel::High => ManeuverPriority::High,
            ThreatLevel::Medium => ManeuverPriority::Medium,
            ThreatLevel::Low => ManeuverPriority::Low,
        }
    }
}

/// A planned burn.
#[derive(Clone, Debug, Serialize)]
pub struct ManeuverPlan {
    pub id: String,
    pub maneuver_type: ManeuverType,
    pub delta_v_ms: f64,
    pub propellant_required_kg: f64,
    pub execution_time: DateTime<Utc>,
    pub description: String,
    pub priority: ManeuverPriority,
}

/// Δv scaling for the predicted miss distance: tighter geometry means a
/// larger burn.
fn miss_distance_multiplier(miss_distance_km: f64) -> f64 {
    if miss_distance_km < 0.5 {
        1.5
    } else if miss_distance_km < 1.0 {
        1.2
    } else if miss_distance_km > 5.0 {
        0.7
    } else {
        1.0
    }
}

/// Plan a collision-avoidance burn for a screened conjunction.
///
/// The base Δv is scaled first by the threat level, then by the
/// miss-distance bracket; propellant comes from the inverse rocket
/// equation against the current state.
pub fn collision_avoidance_maneuver(
    propulsion: &SpacecraftPropulsion,
    threat: ThreatLevel,
    miss_distance_km: f64,
    now: DateTime<Utc>,
) -> ManeuverPlan {
    let delta_v_ms =
        BASE_AVOIDANCE_DV * threat.delta_v_multiplier() * miss_distance_multiplier(miss_distance_km);

    ManeuverPlan {
        id: format!("ca-{}", now.timestamp()),
        maneuver_type: ManeuverType::CollisionAvoidance,
        delta_v_ms,
        propellant_required_kg: propulsion.propellant_required(delta_v_ms),
        execution_time: now + Duration::hours(6),
        description: format!(
            "Collision avoidance burn for a {miss_distance_km:.2} km predicted miss distance"
        ),
        priority: threat.priority(),
    }
}

/// Plan one routine station-keeping slot (the annual budget split into
/// monthly burns).
pub fn station_keeping_maneuver(
    propulsion: &SpacecraftPropulsion,
    now: DateTime<Utc>,
) -> ManeuverPlan {
    let delta_v_ms = STATION_KEEPING_DV_PER_YEAR / 12.0;

    ManeuverPlan {
        id: format!("sk-{}", now.timestamp()),
        maneuver_type: ManeuverType::StationKeeping,
        delta_v_ms,
        propellant_required_kg: propulsion.propellant_required(delta_v_ms),
        execution_time: now + Duration::hours(24),
        description: "Monthly station-keeping burn to hold the operational box".to_string(),
        priority: ManeuverPriority::Medium,
    }
}

/// Plan the end-of-life disposal burn from the reserve allocation.
pub fn deorbit_maneuver(propulsion: &SpacecraftPropulsion, now: DateTime<Utc>) -> ManeuverPlan {
    // Δv the reserve can deliver once everything else is spent:
    // vₑ·ln((dry + reserve)/dry).
    let delta_v_ms = propulsion.exhaust_velocity()
        * ((propulsion.dry_mass_kg + propulsion.min_reserve_kg) / propulsion.dry_mass_kg).ln();

    ManeuverPlan {
        id: format!("deorbit-{}", now.timestamp()),
        maneuver_type: ManeuverType::Deorbit,
        delta_v_ms,
        propellant_required_kg: propulsion.min_reserve_kg,
        execution_time: now + Duration::hours(48),
        description: "End-of-life disposal burn from the protected reserve".to_string(),
        priority: ManeuverPriority::Critical,
    }
}

/// What the operator should do with an assessed maneuver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Execute,
    Defer,
    Optimize,
    Reject,
}

/// A lower-cost variant of a planned maneuver with its tradeoff.
#[derive(Clone, Debug, Serialize)]
pub struct AlternativeStrategy {
    pub name: String,
    pub delta_v_ms: f64,
    pub propellant_saved_kg: f64,
    pub lifetime_saved_days: f64,
    pub tradeoff: String,
}

/// A maneuver weighed against the mission budget.
#[derive(Clone, Debug, Serialize)]
pub struct ManeuverImpact {
    pub maneuver: ManeuverPlan,
    pub before: MissionLifetimeState,
    pub after: MissionLifetimeState,
    pub lifetime_reduction_days: f64,
    pub margin_reduction_pct: f64,
    pub recommendation: Recommendation,
    pub alternatives: Vec<AlternativeStrategy>,
}

/// Assess a maneuver by virtually applying its cost to the lifetime model.
///
/// Recommendation rules, evaluated in order: critical/high priority
/// executes; a low-priority maneuver costing more than 10 margin points is
/// rejected; anything costing more than 5 points should be optimized; a
/// maneuver that leaves the mission critical is deferred; otherwise
/// execute.
pub fn assess_maneuver_impact(
    propulsion: &SpacecraftPropulsion,
    maneuver: &ManeuverPlan,
    cumulative_delta_v_ms: f64,
) -> ManeuverImpact {
    let before = propulsion.mission_lifetime_state(cumulative_delta_v_ms);
    let after = propulsion
        .after_burn(maneuver.propellant_required_kg)
        .mission_lifetime_state(cumulative_delta_v_ms + maneuver.delta_v_ms);

    let lifetime_reduction_days = before.estimated_lifetime_days - after.estimated_lifetime_days;
    let margin_reduction_pct = before.operational_margin_pct - after.operational_margin_pct;

    let recommendation = if matches!(
        maneuver.priority,
        ManeuverPriority::Critical | ManeuverPriority::High
    ) {
        Recommendation::Execute
    } else if margin_reduction_pct > REJECT_MARGIN_POINTS && maneuver.priority == ManeuverPriority::Low
    {
        Recommendation::Reject
    } else if margin_reduction_pct > OPTIMIZE_MARGIN_POINTS {
        Recommendation::Optimize
    } else if after.status == LifetimeStatus::Critical {
        Recommendation::Defer
    } else {
        Recommendation::Execute
    };

    let alternatives = if maneuver.maneuver_type == ManeuverType::CollisionAvoidance {
        alternative_strategies(maneuver, lifetime_reduction_days)
    } else {
        Vec::new()
    };

    ManeuverImpact {
        maneuver: maneuver.clone(),
        before,
        after,
        lifetime_reduction_days,
        margin_reduction_pct,
        recommendation,
        alternatives,
    }
}

/// Lower-cost options for a collision-avoidance burn.
fn alternative_strategies(
    maneuver: &ManeuverPlan,
    lifetime_reduction_days: f64,
) -> Vec<AlternativeStrategy> {
    let mut alternatives = vec![
        AlternativeStrategy {
            name: "In-track timing adjustment".to_string(),
            delta_v_ms: maneuver.delta_v_ms * 0.6,
            propellant_saved_kg: maneuver.propellant_required_kg * 0.4,
            lifetime_saved_days: lifetime_reduction_days * 0.4,
            tradeoff: "Requires 24h+ lead time before the conjunction".to_string(),
        },
        AlternativeStrategy {
            name: "Cross-track offset".to_string(),
            delta_v_ms: maneuver.delta_v_ms * 0.7,
            propellant_saved_kg: maneuver.propellant_required_kg * 0.3,
            lifetime_saved_days: lifetime_reduction_days * 0.3,
            tradeoff: "Plane-change geometry; follow-up correction needed".to_string(),
        },
    ];

    // Standing down is only on the table below critical threat.
    if maneuver.priority != ManeuverPriority::Critical {
        alternatives.push(AlternativeStrategy {
            name: "Monitor only".to_string(),
            delta_v_ms: 0.0,
            propellant_saved_kg: maneuver.propellant_required_kg,
            lifetime_saved_days: lifetime_reduction_days,
            tradeoff: "Accepts the residual conjunction risk".to_string(),
        });
    }

    alternatives
}
