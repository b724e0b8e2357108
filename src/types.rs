//! Shared physical constants and unit helpers for the risk engines.

/// Physical constants (SI units unless noted)

/// Mean Earth radius (km). Also the per-axis scale of the normalized
/// coordinates used by the conjunction engine.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's standard gravitational parameter (km³/s²)
pub const MU_EARTH_KM3_S2: f64 = 398_600.4418;

/// Standard gravity (m/s²) for Isp calculations
pub const G0: f64 = 9.80665;

/// Solar constant at 1 AU (W/m²)
pub const SOLAR_CONSTANT: f64 = 1361.0;

/// Mean Earth bond albedo (dimensionless)
pub const EARTH_ALBEDO: f64 = 0.30;

/// Mean Earth outgoing longwave flux (W/m²)
pub const EARTH_IR_FLUX: f64 = 237.0;

/// Stefan-Boltzmann constant (W/m²·K⁴)
pub const STEFAN_BOLTZMANN: f64 = 5.670374419e-8;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Offset between the Kelvin and Celsius scales
pub const KELVIN_OFFSET: f64 = 273.15;

/// Convert a temperature from Kelvin to Celsius.
///
/// All engine-internal temperatures are Kelvin; Celsius appears only at
/// the presentation boundary.
#[inline]
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Convert a temperature from Celsius to Kelvin.
#[inline]
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Format a duration in seconds as a short human-readable string.
///
/// Used for the `timeToOverheat` field of the HTTP response:
/// `"1h 23m"`, `"12m 05s"`, `"42s"`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelvin_celsius_round_trip() {
        let k = 293.15;
        assert_eq!(celsius_to_kelvin(kelvin_to_celsius(k)), k);
        assert_eq!(kelvin_to_celsius(273.15), 0.0);
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(4980.0), "1h 23m");
        assert_eq!(format_duration(3600.0), "1h 00m");
    }

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        assert_eq!(format_duration(725.0), "12m 05s");
        assert_eq!(format_duration(42.0), "42s");
    }

    #[test]
    fn test_format_duration_negative_clamps_to_zero() {
        assert_eq!(format_duration(-5.0), "0s");
    }
}
