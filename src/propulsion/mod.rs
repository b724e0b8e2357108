//! Propellant and mission-lifetime modeling via the rocket equation.
//!
//! Closed-form evaluation only: no time-stepping. A maneuver never mutates
//! the propulsion state in place; callers derive a post-burn copy with
//! [`SpacecraftPropulsion::after_burn`].

pub mod maneuver;

#[cfg(test)]
mod proptest_propulsion;

use serde::Serialize;
use thiserror::Error;

use crate::types::G0;

/// Fixed mission constants for the annual Δv budget

/// Annual station-keeping Δv budget (m/s)
pub const STATION_KEEPING_DV_PER_YEAR: f64 = 22.0;

/// Annual drag-decay compensation Δv budget (m/s)
pub const DECAY_COMPENSATION_DV_PER_YEAR: f64 = 18.0;

/// Average Δv of one collision-avoidance maneuver (m/s)
pub const AVG_AVOIDANCE_DV: f64 = 0.35;

/// Expected collision-avoidance maneuvers per year
pub const AVOIDANCE_MANEUVERS_PER_YEAR: f64 = 4.0;

/// Nominal design lifetime (days)
pub const NOMINAL_LIFETIME_DAYS: f64 = 1825.0;

/// Days per year used by the lifetime projection
const DAYS_PER_YEAR: f64 = 365.0;

/// Expected annual Δv consumption (m/s): station keeping, decay
/// compensation and the expected collision-avoidance load.
#[inline]
pub fn annual_delta_v_budget() -> f64 {
    STATION_KEEPING_DV_PER_YEAR
        + DECAY_COMPENSATION_DV_PER_YEAR
        + AVG_AVOIDANCE_DV * AVOIDANCE_MANEUVERS_PER_YEAR
}

#[derive(Debug, Error, PartialEq)]
pub enum PropulsionError {
    /// The requested burn would take the final mass to or below the dry
    /// mass. The sentinel-infinity answer of the naive rocket equation is
    /// replaced by this explicit error.
    #[error("propellant request of {requested_kg} kg exceeds the {available_kg} kg available")]
    PropellantExceedsAvailable {
        requested_kg: f64,
        available_kg: f64,
    },
}

/// Propulsion state of one spacecraft.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SpacecraftPropulsion {
    pub dry_mass_kg: f64,
    /// Current propellant load (kg).
    pub propellant_kg: f64,
    /// Beginning-of-life propellant load (kg).
    pub initial_propellant_kg: f64,
    pub specific_impulse_s: f64,
    pub thrust_n: f64,
    /// Propellant held back for safe end-of-life disposal (kg).
    pub min_reserve_kg: f64,
}

impl SpacecraftPropulsion {
    /// Current total mass (kg).
    #[inline]
    pub fn wet_mass_kg(&self) -> f64 {
        self.dry_mass_kg + self.propellant_kg
    }

    /// Effective exhaust velocity, Isp·g₀ (m/s).
    #[inline]
    pub fn exhaust_velocity(&self) -> f64 {
        self.specific_impulse_s * G0
    }

    /// Δv produced by burning the given propellant mass (m/s).
    ///
    /// Tsiolkovsky: Δv = Isp·g₀·ln(m₀/m₁). Errors when the burn would take
    /// the final mass to or below the dry mass, which is a caller logic
    /// error rather than a merely expensive maneuver.
    pub fn delta_v(&self, propellant_used_kg: f64) -> Result<f64, PropulsionError> {
        let m0 = self.wet_mass_kg();
        let m1 = m0 - propellant_used_kg;
        if m1 <= self.dry_mass_kg {
            return Err(PropulsionError::PropellantExceedsAvailable {
                requested_kg: propellant_used_kg,
                available_kg: self.propellant_kg,
            });
        }
        Ok(self.exhaust_velocity() * (m0 / m1).ln())
    }

    /// Propellant needed for a given Δv from the current state (kg).
    ///
    /// Inverse rocket equation, m₀·(1 − e^(−Δv/vₑ)), clamped at zero so a
    /// negative Δv request cannot produce negative propellant.
    pub fn propellant_required(&self, delta_v_ms: f64) -> f64 {
        let mass_ratio = (delta_v_ms / self.exhaust_velocity()).exp();
        (self.wet_mass_kg() * (1.0 - 1.0 / mass_ratio)).max(0.0)
    }

    /// Δv available from the propellant above the disposal reserve (m/s).
    ///
    /// Returns 0 when nothing usable remains.
    pub fn total_delta_v_capacity(&self) -> f64 {
        let usable_kg = self.propellant_kg - self.min_reserve_kg;
        if usable_kg <= 0.0 {
            return 0.0;
        }
        self.delta_v(usable_kg).unwrap_or(0.0)
    }

    /// Burn time to deliver a given Δv at nominal thrust (s).
    ///
    /// Mass flow rate is thrust/(Isp·g₀); a degenerate non-positive thrust
    /// is a legitimate edge (unpowered spacecraft) and yields 0.
    pub fn burn_duration(&self, delta_v_ms: f64) -> f64 {
        let mass_flow_kg_s = self.thrust_n / self.exhaust_velocity();
        if mass_flow_kg_s <= 0.0 {
            return 0.0;
        }
        self.propellant_required(delta_v_ms) / mass_flow_kg_s
    }

    /// Copy of this state after burning the given propellant mass.
    pub fn after_burn(&self, propellant_used_kg: f64) -> Self {
        Self {
            propellant_kg: (self.propellant_kg - propellant_used_kg).max(0.0),
            ..*self
        }
    }

    /// Beginning-of-life copy of this state.
    fn at_beginning_of_life(&self) -> Self {
        Self {
            propellant_kg: self.initial_propellant_kg,
            ..*self
        }
    }

    /// Project the mission-lifetime state from the current propellant load
    /// and the Δv spent so far.
    pub fn mission_lifetime_state(&self, cumulative_delta_v_ms: f64) -> MissionLifetimeState {
        let remaining_capacity = self.total_delta_v_capacity();
        let total_capacity = self.at_beginning_of_life().total_delta_v_capacity();

        let estimated_lifetime_days =
            remaining_capacity / annual_delta_v_budget() * DAYS_PER_YEAR;
        let lifetime_pct = (estimated_lifetime_days / NOMINAL_LIFETIME_DAYS * 100.0).min(100.0);

        let usable_initial_kg = (self.initial_propellant_kg - self.min_reserve_kg).max(0.0);
        let propellant_pct = if usable_initial_kg > 0.0 {
            (self.propellant_kg - self.min_reserve_kg).max(0.0) / usable_initial_kg * 100.0
        } else {
            0.0
        };

        let operational_margin_pct = propellant_pct.min(lifetime_pct);

        MissionLifetimeState {
            propellant_remaining_kg: self.propellant_kg,
            propellant_used_kg: self.initial_propellant_kg - self.propellant_kg,
            cumulative_delta_v_ms,
            total_delta_v_capacity_ms: total_capacity,
            remaining_delta_v_capacity_ms: remaining_capacity,
            estimated_lifetime_days,
            nominal_lifetime_days: NOMINAL_LIFETIME_DAYS,
            lifetime_pct,
            propellant_pct,
            operational_margin_pct,
            status: LifetimeStatus::from_margin(operational_margin_pct),
        }
    }
}

/// Health classification of the remaining mission margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifetimeStatus {
    Nominal,
    Caution,
    Warning,
    Critical,
}

impl LifetimeStatus {
    /// Threshold table over the operational margin (percent):
    /// <10 critical, <25 warning, <50 caution, else nominal.
    pub fn from_margin(margin_pct: f64) -> Self {
        if margin_pct < 10.0 {
            LifetimeStatus::Critical
        } else if margin_pct < 25.0 {
            LifetimeStatus::Warning
        } else if margin_pct < 50.0 {
            LifetimeStatus::Caution
        } else {
            LifetimeStatus::Nominal
        }
    }
}

/// Snapshot of the propellant/lifetime budget.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct MissionLifetimeState {
    pub propellant_remaining_kg: f64,
    pub propellant_used_kg: f64,
    pub cumulative_delta_v_ms: f64,
    pub total_delta_v_capacity_ms: f64,
    pub remaining_delta_v_capacity_ms: f64,
    pub estimated_lifetime_days: f64,
    pub nominal_lifetime_days: f64,
    /// Remaining lifetime as a share of the nominal lifetime, capped at 100.
    pub lifetime_pct: f64,
    /// Usable propellant remaining as a share of the usable load at launch.
    pub propellant_pct: f64,
    /// min(propellant_pct, lifetime_pct): the single health indicator.
    pub operational_margin_pct: f64,
    pub status: LifetimeStatus,
}

/// One sample of the synthesized propellant-usage history.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FuelHistoryEntry {
    pub mission_day: f64,
    pub propellant_kg: f64,
    pub cumulative_delta_v_ms: f64,
}

/// Reconstruct a plausible propellant timeline from launch to now.
///
/// The spent mass is split into a steady station-keeping drain and
/// discrete collision-avoidance events at the expected cadence; samples
/// are monthly plus the exact endpoint, which always matches the current
/// propellant load and cumulative Δv.
pub fn synthesize_fuel_history(
    propulsion: &SpacecraftPropulsion,
    cumulative_delta_v_ms: f64,
    elapsed_days: f64,
) -> Vec<FuelHistoryEntry> {
    if elapsed_days <= 0.0 {
        return vec![FuelHistoryEntry {
            mission_day: 0.0,
            propellant_kg: propulsion.propellant_kg,
            cumulative_delta_v_ms,
        }];
    }

    let total_used_kg = (propulsion.initial_propellant_kg - propulsion.propellant_kg).max(0.0);

    // Discrete avoidance events, each costing the inverse-rocket-equation
    // propellant for the average avoidance Δv, capped so the steady drain
    // never goes negative.
    let event_period_days = DAYS_PER_YEAR / AVOIDANCE_MANEUVERS_PER_YEAR;
    let event_count = (elapsed_days / event_period_days).floor() as usize;
    let per_event_kg = if event_count > 0 {
        propulsion
            .at_beginning_of_life()
            .propellant_required(AVG_AVOIDANCE_DV)
            .min(total_used_kg / event_count as f64)
    } else {
        0.0
    };
    let steady_total_kg = total_used_kg - per_event_kg * event_count as f64;

    let propellant_at = |day: f64| -> f64 {
        let events_so_far = (day / event_period_days).floor().min(event_count as f64);
        propulsion.initial_propellant_kg
            - steady_total_kg * day / elapsed_days
            - per_event_kg * events_so_far
    };

    let sample_step_days = 30.0;
    let mut history = Vec::new();
    let mut day = 0.0;
    while day < elapsed_days {
        history.push(FuelHistoryEntry {
            mission_day: day,
            propellant_kg: propellant_at(day),
            cumulative_delta_v_ms: cumulative_delta_v_ms * day / elapsed_days,
        });
        day += sample_step_days;
    }
    history.push(FuelHistoryEntry {
        mission_day: elapsed_days,
        propellant_kg: propulsion.propellant_kg,
        cumulative_delta_v_ms,
    });

    history
}
