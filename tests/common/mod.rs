//! Shared fixtures for the integration suites.

use chrono::{DateTime, Utc};
use glam::DVec3;

use leorisk::conjunction::TrackedObject;
use leorisk::propulsion::SpacecraftPropulsion;

/// Fixed epoch so every run is reproducible.
pub fn epoch() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-20T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Build a tracked object from plain arrays.
pub fn tracked(name: &str, position: [f64; 3], velocity: [f64; 3]) -> TrackedObject {
    TrackedObject::new(name, DVec3::from_array(position), DVec3::from_array(velocity))
}

/// The reference smallsat propulsion state used across the suites.
pub fn smallsat_propulsion() -> SpacecraftPropulsion {
    SpacecraftPropulsion {
        dry_mass_kg: 850.0,
        propellant_kg: 120.0,
        initial_propellant_kg: 150.0,
        specific_impulse_s: 290.0,
        thrust_n: 22.0,
        min_reserve_kg: 8.0,
    }
}
