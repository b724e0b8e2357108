//! HTTP deployment of the thermal engine.
//!
//! One endpoint wraps `run_thermal_simulation` for cross-origin browser
//! callers: `GET /thermal/simulate` with query parameters or
//! `POST /thermal/simulate` with an equivalent JSON body. Failures are
//! caught, logged and reported as structured JSON with HTTP 500; callers
//! fall back to cached/default values.
//!
//! The risk level reported here is a simplified four-band classification
//! of the aggregate score (<25 low, <50 moderate, <75 high, else
//! critical), deliberately separate from the per-step
//! nominal/warning/critical levels of the in-process engine.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, Request};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::thermal::{
    run_thermal_simulation, Mitigation, OrbitalState, SpacecraftClass, ThermalError,
    DEFAULT_STEP_SECONDS,
};
use crate::types::{format_duration, kelvin_to_celsius};

/// Simulation request parameters; every field has a serving default.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationParams {
    /// Orbit altitude (km).
    pub altitude: f64,
    /// Inclination (rad).
    pub inclination: f64,
    /// Beta angle (rad).
    pub beta_angle: f64,
    /// Simulated span (s).
    pub duration: f64,
    /// Spacecraft preset.
    #[serde(rename = "type")]
    pub spacecraft_type: SpacecraftClass,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            altitude: 400.0,
            inclination: 0.9,
            beta_angle: 0.3,
            duration: 10_800.0,
            spacecraft_type: SpacecraftClass::Default,
        }
    }
}

/// Simplified endpoint risk classification over the aggregate score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiRiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl ApiRiskLevel {
    pub fn from_score(score: u32) -> Self {
        if score < 25 {
            ApiRiskLevel::Low
        } else if score < 50 {
            ApiRiskLevel::Moderate
        } else if score < 75 {
            ApiRiskLevel::High
        } else {
            ApiRiskLevel::Critical
        }
    }

    fn label(self) -> &'static str {
        match self {
            ApiRiskLevel::Low => "low",
            ApiRiskLevel::Moderate => "moderate",
            ApiRiskLevel::High => "high",
            ApiRiskLevel::Critical => "critical",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TemperatureReading {
    pub kelvin: f64,
    pub celsius: f64,
}

impl TemperatureReading {
    fn new(kelvin: f64) -> Self {
        Self {
            kelvin,
            celsius: kelvin_to_celsius(kelvin),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationData {
    pub peak_temperature: TemperatureReading,
    pub min_temperature: TemperatureReading,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_overheat_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_overheat: Option<String>,
    pub risk_score: u32,
    pub risk_level: ApiRiskLevel,
    pub mitigations: Vec<Mitigation>,
    pub summary: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    pub success: bool,
    pub data: SimulationData,
    /// The resolved input parameters, echoed back.
    pub parameters: SimulationParams,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub timestamp: String,
}

/// Run one simulation for the resolved parameters.
pub fn run_simulation(
    params: SimulationParams,
    now: DateTime<Utc>,
) -> Result<SimulationResponse, ThermalError> {
    let config = params.spacecraft_type.config();
    let orbit = OrbitalState::circular(params.altitude, params.inclination, params.beta_angle);

    let prediction =
        run_thermal_simulation(&config, &orbit, now, params.duration, DEFAULT_STEP_SECONDS)?;

    let risk_level = ApiRiskLevel::from_score(prediction.risk_score);
    let mut summary = format!(
        "Peak {:.1} °C, minimum {:.1} °C over {:.1} h; risk {}/100 ({})",
        kelvin_to_celsius(prediction.peak_temperature_k),
        kelvin_to_celsius(prediction.min_temperature_k),
        params.duration / 3600.0,
        prediction.risk_score,
        risk_level.label(),
    );
    if let Some(seconds) = prediction.time_to_overheat_s {
        summary.push_str(&format!(
            ". Overheat predicted {} after epoch",
            format_duration(seconds)
        ));
    }

    Ok(SimulationResponse {
        success: true,
        data: SimulationData {
            peak_temperature: TemperatureReading::new(prediction.peak_temperature_k),
            min_temperature: TemperatureReading::new(prediction.min_temperature_k),
            time_to_overheat_seconds: prediction.time_to_overheat_s,
            time_to_overheat: prediction.time_to_overheat_s.map(format_duration),
            risk_score: prediction.risk_score,
            risk_level,
            mitigations: prediction.mitigations,
            summary,
        },
        parameters: params,
        timestamp: now.to_rfc3339(),
    })
}

/// Structured JSON failure; callers fall back to cached/default values.
fn error_response(message: String) -> Response {
    error!("thermal simulation failed: {message}");
    let body = ErrorResponse {
        success: false,
        error: message,
        timestamp: Utc::now().to_rfc3339(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

fn respond(params: SimulationParams) -> Response {
    info!(
        "thermal simulation request: altitude={} km, duration={} s, type={:?}",
        params.altitude, params.duration, params.spacecraft_type
    );

    match run_simulation(params, Utc::now()) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => error_response(err.to_string()),
    }
}

/// GET handler: parameters from the query string.
async fn simulate_get(params: Result<Query<SimulationParams>, QueryRejection>) -> Response {
    match params {
        Ok(Query(params)) => respond(params),
        Err(rejection) => error_response(rejection.to_string()),
    }
}

/// POST handler: the same parameters as a JSON body.
async fn simulate_post(params: Result<Json<SimulationParams>, JsonRejection>) -> Response {
    match params {
        Ok(Json(params)) => respond(params),
        Err(rejection) => error_response(rejection.to_string()),
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    now: DateTime<Utc>,
}

/// Health check handler
async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Open CORS for cross-origin browser callers.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "access-control-allow-origin",
        HeaderValue::from_static("*"),
    );
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("Content-Type"),
    );
    response
}

/// Build the application router with all routes
pub fn build_router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/thermal/simulate", get(simulate_get).post(simulate_post))
        .layer(middleware::from_fn(cors))
}
