//! Time-stepped thermal simulation for a spacecraft in low Earth orbit.
//!
//! One simulation run covers a simplified circular orbit: per-step heat
//! fluxes (solar, albedo, Earth IR, internal, radiated), explicit Euler
//! temperature integration, eclipse detection, a risk-window state machine
//! and post-hoc mitigation generation.
//!
//! All temperatures are Kelvin internally; Celsius exists only at the
//! presentation boundary.

mod flux;
mod mitigation;
mod simulation;

pub use flux::{compute_heat_fluxes, earth_view_factor, is_in_eclipse, propagate_temperature, HeatFluxes};
pub use mitigation::{generate_mitigations, Mitigation, MitigationKind, MitigationPriority};
pub use simulation::{run_thermal_simulation, DEFAULT_STEP_SECONDS, INITIAL_TEMPERATURE_K};

use chrono::{DateTime, Utc};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::orbit;
use crate::types::KELVIN_OFFSET;

#[derive(Debug, Error)]
pub enum ThermalError {
    #[error("spacecraft mass must be positive, got {0} kg")]
    NonPositiveMass(f64),

    #[error("surface area must be positive, got {0} m²")]
    NonPositiveArea(f64),

    #[error("specific heat must be positive, got {0} J/(kg·K)")]
    NonPositiveSpecificHeat(f64),

    #[error("simulation step must be positive, got {0} s")]
    InvalidStep(f64),

    #[error("simulation duration must be positive, got {0} s")]
    InvalidDuration(f64),
}

/// Thermal properties of one spacecraft, immutable for a simulation run.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ThermalConfig {
    pub mass_kg: f64,
    pub surface_area_m2: f64,
    /// Solar absorptivity in [0, 1].
    pub absorptivity: f64,
    /// Infrared emissivity in [0, 1].
    pub emissivity: f64,
    /// Specific heat (J/(kg·K)).
    pub specific_heat: f64,
    /// Internally dissipated power (W).
    pub internal_power_w: f64,
    /// Minimum operational temperature (K).
    pub min_temperature_k: f64,
    /// Maximum operational temperature (K).
    pub max_temperature_k: f64,
}

impl ThermalConfig {
    /// Reject non-physical configurations before they reach the
    /// integrator, where a zero mass, area or specific heat would divide
    /// by zero.
    pub fn validate(&self) -> Result<(), ThermalError> {
        if self.mass_kg <= 0.0 {
            return Err(ThermalError::NonPositiveMass(self.mass_kg));
        }
        if self.surface_area_m2 <= 0.0 {
            return Err(ThermalError::NonPositiveArea(self.surface_area_m2));
        }
        if self.specific_heat <= 0.0 {
            return Err(ThermalError::NonPositiveSpecificHeat(self.specific_heat));
        }
        Ok(())
    }

    /// Generic LEO smallsat: aluminum bus, moderate internal dissipation.
    pub fn leo_default() -> Self {
        Self {
            mass_kg: 1000.0,
            surface_area_m2: 20.0,
            absorptivity: 0.3,
            emissivity: 0.85,
            specific_heat: 900.0,
            internal_power_w: 500.0,
            min_temperature_k: -20.0 + KELVIN_OFFSET,
            max_temperature_k: 50.0 + KELVIN_OFFSET,
        }
    }

    /// 6U CubeSat: tiny thermal mass, swings hard across an orbit.
    pub fn cubesat() -> Self {
        Self {
            mass_kg: 8.0,
            surface_area_m2: 0.5,
            absorptivity: 0.6,
            emissivity: 0.8,
            specific_heat: 800.0,
            internal_power_w: 10.0,
            min_temperature_k: -20.0 + KELVIN_OFFSET,
            max_temperature_k: 60.0 + KELVIN_OFFSET,
        }
    }

    /// Station class: very large thermal mass, high internal dissipation.
    pub fn station() -> Self {
        Self {
            mass_kg: 420_000.0,
            surface_area_m2: 2500.0,
            absorptivity: 0.25,
            emissivity: 0.9,
            specific_heat: 800.0,
            internal_power_w: 75_000.0,
            min_temperature_k: -10.0 + KELVIN_OFFSET,
            max_temperature_k: 45.0 + KELVIN_OFFSET,
        }
    }
}

/// Named spacecraft presets, also the `type` parameter of the HTTP API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpacecraftClass {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "cubesat")]
    CubeSat,
    #[serde(rename = "iss")]
    Station,
}

impl SpacecraftClass {
    pub fn config(self) -> ThermalConfig {
        match self {
            SpacecraftClass::Default => ThermalConfig::leo_default(),
            SpacecraftClass::CubeSat => ThermalConfig::cubesat(),
            SpacecraftClass::Station => ThermalConfig::station(),
        }
    }
}

/// Orbit geometry supplied once per simulation run.
///
/// The stored position is only the epoch position; the simulation
/// re-derives the position at every timestep from the circular-orbit model
/// driven by altitude and inclination.
#[derive(Clone, Copy, Debug)]
pub struct OrbitalState {
    /// Earth-centered position (km).
    pub position_km: DVec3,
    pub altitude_km: f64,
    pub inclination_rad: f64,
    /// Angle between the orbital plane and the Sun vector (rad).
    pub beta_angle_rad: f64,
}

impl OrbitalState {
    /// Circular orbit starting at the ascending node.
    pub fn circular(altitude_km: f64, inclination_rad: f64, beta_angle_rad: f64) -> Self {
        Self {
            position_km: orbit::circular_position(altitude_km, inclination_rad, 0.0),
            altitude_km,
            inclination_rad,
            beta_angle_rad,
        }
    }
}

/// Per-step risk classification against the operational temperature limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Nominal,
    Warning,
    Critical,
}

/// One timeline entry, recorded every simulation step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ThermalState {
    pub time: DateTime<Utc>,
    pub temperature_k: f64,
    /// Absorbed direct solar flux (W/m²).
    pub solar_flux: f64,
    /// Absorbed Earth-reflected flux (W/m²).
    pub albedo_flux: f64,
    /// Absorbed Earth infrared flux (W/m²).
    pub earth_ir_flux: f64,
    /// Internal dissipation per unit area (W/m²).
    pub internal_flux: f64,
    /// Net flux after radiated losses (W/m²).
    pub net_flux: f64,
    pub in_eclipse: bool,
    pub risk: RiskLevel,
}

/// Condition that opened a risk window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskWindowKind {
    EclipseExit,
    EclipseEntry,
    HighBeta,
    ProlongedSun,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowSeverity {
    Warning,
    Critical,
}

/// A contiguous span of elevated thermal risk.
///
/// At most one window is open at any time; triggers that fire while a
/// window is open do not stack.
#[derive(Clone, Debug, Serialize)]
pub struct RiskWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub kind: RiskWindowKind,
    pub severity: WindowSeverity,
    /// Hottest temperature observed while the window was open (K).
    pub peak_temperature_k: f64,
    pub description: String,
}

/// Result of one simulation run; immutable once produced.
#[derive(Clone, Debug, Serialize)]
pub struct ThermalPrediction {
    pub peak_temperature_k: f64,
    pub min_temperature_k: f64,
    /// Seconds from run start to the first max-limit breach, if any.
    pub time_to_overheat_s: Option<f64>,
    /// Seconds from run start to the first min-limit breach, if any.
    pub time_to_underheat_s: Option<f64>,
    /// Aggregate risk score in [0, 100].
    pub risk_score: u32,
    pub windows: Vec<RiskWindow>,
    pub mitigations: Vec<Mitigation>,
    pub timeline: Vec<ThermalState>,
}
