//! Heat-flux breakdown, eclipse geometry and the Euler temperature step.

use glam::DVec3;

use crate::types::{EARTH_ALBEDO, EARTH_IR_FLUX, EARTH_RADIUS_KM, SOLAR_CONSTANT, STEFAN_BOLTZMANN};

use super::{OrbitalState, ThermalConfig};

/// Fraction of the albedo flux that survives inside eclipse.
///
/// Reflected light is reduced, not zeroed, while the satellite is in
/// shadow; the asymmetry with direct solar flux is intentional.
const ECLIPSE_ALBEDO_RESIDUAL: f64 = 0.1;

/// Flux breakdown for one timestep (all W/m², absorbed/emitted per unit
/// surface area).
#[derive(Clone, Copy, Debug)]
pub struct HeatFluxes {
    pub solar: f64,
    pub albedo: f64,
    pub earth_ir: f64,
    pub internal: f64,
    /// Radiated loss, εσT⁴.
    pub radiated: f64,
    /// Gains minus radiated loss.
    pub net: f64,
    pub in_eclipse: bool,
}

/// Cylindrical-shadow eclipse test.
///
/// The satellite is in eclipse when the angle between its position vector
/// and the anti-Sun direction is smaller than Earth's angular radius as
/// seen from the satellite's orbital radius, asin(R⊕/r).
pub fn is_in_eclipse(position_km: DVec3, sun_direction: DVec3) -> bool {
    let r = position_km.length();
    if r <= EARTH_RADIUS_KM {
        // Degenerate sub-surface radius: inside the shadow cylinder.
        return true;
    }

    let anti_sun = -sun_direction.normalize_or_zero();
    let cos_angle = (position_km / r).dot(anti_sun).clamp(-1.0, 1.0);
    let angle = cos_angle.acos();
    let earth_angular_radius = (EARTH_RADIUS_KM / r).asin();

    angle < earth_angular_radius
}

/// View factor from the spacecraft to the Earth disc at a given altitude.
///
/// F = 0.5·(1 − sqrt(1 − ρ²)) with ρ = R⊕/(R⊕ + h); governs both the
/// albedo and Earth-IR coupling.
#[inline]
pub fn earth_view_factor(altitude_km: f64) -> f64 {
    let rho = EARTH_RADIUS_KM / (EARTH_RADIUS_KM + altitude_km.max(0.0));
    0.5 * (1.0 - (1.0 - rho * rho).sqrt())
}

/// Compute the absorbed/emitted flux breakdown for one timestep.
///
/// # Arguments
/// * `config` - spacecraft thermal properties
/// * `state` - orbit geometry with the position for this step
/// * `sun_direction` - unit vector toward the Sun
/// * `temperature_k` - current surface temperature, drives the T⁴ loss
pub fn compute_heat_fluxes(
    config: &ThermalConfig,
    state: &OrbitalState,
    sun_direction: DVec3,
    temperature_k: f64,
) -> HeatFluxes {
    let in_eclipse = is_in_eclipse(state.position_km, sun_direction);
    let view_factor = earth_view_factor(state.altitude_km);

    let solar = if in_eclipse {
        0.0
    } else {
        SOLAR_CONSTANT * config.absorptivity
    };

    let mut albedo = SOLAR_CONSTANT * EARTH_ALBEDO * view_factor * config.absorptivity;
    if in_eclipse {
        albedo *= ECLIPSE_ALBEDO_RESIDUAL;
    }

    // Earth IR does not care about the shadow state.
    let earth_ir = EARTH_IR_FLUX * view_factor * config.emissivity;

    let internal = config.internal_power_w / config.surface_area_m2;

    let radiated = config.emissivity * STEFAN_BOLTZMANN * temperature_k.powi(4);

    HeatFluxes {
        solar,
        albedo,
        earth_ir,
        internal,
        radiated,
        net: solar + albedo + earth_ir + internal - radiated,
        in_eclipse,
    }
}

/// Advance the temperature one explicit forward-Euler step.
///
/// ΔT = q·A·Δt / (m·cₚ). Stability depends on the caller choosing a step
/// small enough for the spacecraft's thermal mass; the 60 s default is
/// validated as stable for all shipped presets.
#[inline]
pub fn propagate_temperature(
    config: &ThermalConfig,
    temperature_k: f64,
    net_flux: f64,
    dt_s: f64,
) -> f64 {
    temperature_k + net_flux * config.surface_area_m2 * dt_s / (config.mass_kg * config.specific_heat)
}
