//! Pairwise conjunction screening over a tracked-object population.
//!
//! Positions and velocities arrive in Earth-radius-normalized units from the
//! upstream tracking feed. Separations are converted to kilometers by
//! scaling each component by the Earth radius before taking the Euclidean
//! norm; the discrete probability bands below were calibrated against that
//! exact formula, so it is preserved as-is rather than replaced with a
//! geodesic distance.

use glam::DVec3;
use serde::Serialize;

use crate::types::EARTH_RADIUS_KM;

/// Floor applied to relative speed when estimating time to closest
/// approach, so coincident velocities cannot divide by zero.
const MIN_RELATIVE_SPEED: f64 = 0.1;

/// Pairs at or below this probability are dropped from the risk list.
const PROBABILITY_FLOOR: f64 = 0.01;

/// One object from the tracked population, supplied per call.
///
/// Ephemeral: there is no persistent identity beyond the name.
#[derive(Clone, Debug)]
pub struct TrackedObject {
    pub name: String,
    /// Position in Earth-radius-normalized units.
    pub position: DVec3,
    /// Velocity in normalized units.
    pub velocity: DVec3,
}

impl TrackedObject {
    pub fn new(name: impl Into<String>, position: DVec3, velocity: DVec3) -> Self {
        Self {
            name: name.into(),
            position,
            velocity,
        }
    }
}

/// Closest-approach estimate for a single object pair.
#[derive(Clone, Copy, Debug)]
pub struct ApproachEstimate {
    /// Separation distance (km).
    pub distance_km: f64,
    /// Collision probability band, always in [0, 1].
    pub probability: f64,
    /// Estimated time to closest approach (s).
    pub time_to_closest_s: f64,
}

/// A screened conjunction between two named objects.
#[derive(Clone, Debug, Serialize)]
pub struct CollisionRisk {
    pub object_a: String,
    pub object_b: String,
    pub distance_km: f64,
    pub probability: f64,
    pub time_to_closest_s: f64,
}

/// Estimate the collision probability for one object pair.
///
/// The probability is a step function of separation distance, standing in
/// for a covariance-based Pc computation that is out of scope:
/// <5 km → 0.85, <25 km → 0.45, <100 km → 0.15, <500 km → 0.02, else 0.
///
/// # Arguments
/// * `pos1`, `vel1` - first object state (Earth-radius-normalized)
/// * `pos2`, `vel2` - second object state
pub fn collision_probability(
    pos1: DVec3,
    vel1: DVec3,
    pos2: DVec3,
    vel2: DVec3,
) -> ApproachEstimate {
    // Componentwise scale to km, then Euclidean norm. Valid because the
    // normalization is uniform per axis.
    let distance_km = ((pos1 - pos2) * EARTH_RADIUS_KM).length();
    let relative_speed = (vel1 - vel2).length();
    let time_to_closest_s = distance_km / relative_speed.max(MIN_RELATIVE_SPEED);

    ApproachEstimate {
        distance_km,
        probability: probability_band(distance_km),
        time_to_closest_s,
    }
}

/// Discrete probability band for a separation distance (km).
fn probability_band(distance_km: f64) -> f64 {
    if distance_km < 5.0 {
        0.85
    } else if distance_km < 25.0 {
        0.45
    } else if distance_km < 100.0 {
        0.15
    } else if distance_km < 500.0 {
        0.02
    } else {
        0.0
    }
}

/// Screen the full population for conjunction risks.
///
/// All-pairs scan, O(n²) in the object count. Pairs at or below the
/// reporting floor are dropped; the result is ordered by probability
/// descending (ties keep scan order). Fewer than two objects yields an
/// empty list.
pub fn detect_collision_risks(objects: &[TrackedObject]) -> Vec<CollisionRisk> {
    let mut risks = Vec::new();

    for i in 0..objects.len() {
        for j in (i + 1)..objects.len() {
            let a = &objects[i];
            let b = &objects[j];
            let estimate = collision_probability(a.position, a.velocity, b.position, b.velocity);

            if estimate.probability > PROBABILITY_FLOOR {
                risks.push(CollisionRisk {
                    object_a: a.name.clone(),
                    object_b: b.name.clone(),
                    distance_km: estimate.distance_km,
                    probability: estimate.probability,
                    time_to_closest_s: estimate.time_to_closest_s,
                });
            }
        }
    }

    risks.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    risks
}

/// Aggregate population risk score in [0, 100].
///
/// Weighted sum of a congestion term (object count vs. a 2000-object
/// saturation), a collision term (counts of high/moderate probability
/// pairs) and a density term (risk-list length vs. 100).
pub fn risk_score(total_objects: usize, risks: &[CollisionRisk]) -> u32 {
    let congestion = (total_objects as f64 / 2000.0).min(1.0) * 30.0;

    let high = risks.iter().filter(|r| r.probability > 0.5).count() as f64;
    let moderate = risks
        .iter()
        .filter(|r| r.probability > 0.2 && r.probability <= 0.5)
        .count() as f64;
    let collision = 10.0 * high + 5.0 * moderate;

    let density = (risks.len() as f64 / 100.0).min(1.0) * 20.0;

    (congestion + collision + density).min(100.0).round() as u32
}

/// Count orbital events flagged by the per-object snapshot heuristic.
///
/// Despite the forecast-sounding name this inspects only the current
/// snapshot, one rule per object: reentry candidates (normalized altitude
/// < 1.15), non-nominal orbital speed (normalized speed outside [6, 8]) and
/// the GEO/MEO transition band (altitude in (2.5, 6)). The literal rule set
/// is load-bearing for downstream consumers and kept as-is.
pub fn predict_orbital_events(objects: &[TrackedObject]) -> usize {
    let mut events = 0;

    for object in objects {
        let altitude = object.position.length();
        let speed = object.velocity.length();

        if altitude < 1.15 {
            events += 1;
        }
        if speed > 8.0 || speed < 6.0 {
            events += 1;
        }
        if altitude > 2.5 && altitude < 6.0 {
            events += 1;
        }
    }

    events
}
