//! Simplified circular-orbit geometry and sun direction model.
//!
//! The thermal engine models one spacecraft on a perfectly circular orbit:
//! the position at each timestep comes from the mean motion (Kepler's third
//! law) with the inclination tilting the orbital plane out of the equator.
//! The sun direction uses a solar-declination approximation keyed on day of
//! year and hour of day, not a true ephemeris.

use chrono::{DateTime, Datelike, Timelike, Utc};
use glam::DVec3;

use crate::types::{EARTH_RADIUS_KM, MU_EARTH_KM3_S2};

/// Earth's axial tilt (rad), the amplitude of the declination model.
const OBLIQUITY_RAD: f64 = 23.44 * std::f64::consts::PI / 180.0;

/// Mean motion of a circular orbit at the given altitude (rad/s).
///
/// n = sqrt(μ/a³) with a = R⊕ + altitude. Altitude is clamped at zero so a
/// degenerate input cannot produce a sub-surface radius.
#[inline]
pub fn mean_motion(altitude_km: f64) -> f64 {
    let a = EARTH_RADIUS_KM + altitude_km.max(0.0);
    (MU_EARTH_KM3_S2 / (a * a * a)).sqrt()
}

/// Orbital period of a circular orbit at the given altitude (s).
#[inline]
pub fn orbital_period(altitude_km: f64) -> f64 {
    std::f64::consts::TAU / mean_motion(altitude_km)
}

/// Position on a circular inclined orbit after `elapsed_s` seconds (km,
/// Earth-centered).
///
/// The orbit starts on the +x axis (ascending node at x) and the plane is
/// tilted about that axis by the inclination:
/// `a · (cos θ, sin θ cos i, sin θ sin i)` with θ = n·t.
pub fn circular_position(altitude_km: f64, inclination_rad: f64, elapsed_s: f64) -> DVec3 {
    let a = EARTH_RADIUS_KM + altitude_km.max(0.0);
    let theta = mean_motion(altitude_km) * elapsed_s;
    DVec3::new(
        a * theta.cos(),
        a * theta.sin() * inclination_rad.cos(),
        a * theta.sin() * inclination_rad.sin(),
    )
}

/// Solar declination for a day of year (rad).
///
/// Cosine fit with minimum at the December solstice:
/// δ = -23.44° · cos(2π (doy + 10) / 365)
#[inline]
pub fn solar_declination(day_of_year: u32) -> f64 {
    -OBLIQUITY_RAD * (std::f64::consts::TAU * (day_of_year as f64 + 10.0) / 365.0).cos()
}

/// Unit vector toward the Sun for the given UTC time.
///
/// Declination sets the out-of-plane component; the hour of day rotates the
/// in-plane component once per 24 h. This is the simplified model the whole
/// thermal engine is calibrated against, deliberately not an ephemeris.
pub fn sun_direction(time: DateTime<Utc>) -> DVec3 {
    let declination = solar_declination(time.ordinal());
    let hour = time.hour() as f64 + time.minute() as f64 / 60.0 + time.second() as f64 / 3600.0;
    let hour_angle = std::f64::consts::TAU * hour / 24.0;

    DVec3::new(
        declination.cos() * hour_angle.cos(),
        declination.cos() * hour_angle.sin(),
        declination.sin(),
    )
}
