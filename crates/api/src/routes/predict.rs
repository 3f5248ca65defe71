//! Prediction Route

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::AppState;
use feature_builder::{build_features, FlightRecord, FlightType};

/// Airlines present in the historical dataset; anything else is rejected
const VALID_AIRLINES: [&str; 23] = [
    "Aerolineas Argentinas",
    "Aeromexico",
    "Air Canada",
    "Air France",
    "Alitalia",
    "American Airlines",
    "Austral",
    "Avianca",
    "British Airways",
    "Copa Air",
    "Delta Air",
    "Gol Trans",
    "Grupo LATAM",
    "Iberia",
    "JetSmart SPA",
    "K.L.M.",
    "Lacsa",
    "Latin American Wings",
    "Oceanair Linhas Aereas",
    "Plus Ultra Lineas Aereas",
    "Qantas Airways",
    "Sky Airline",
    "United Airlines",
];

/// One flight to score
#[derive(Debug, Clone, Deserialize)]
pub struct FlightData {
    /// Airline name
    #[serde(rename = "OPERA")]
    pub opera: String,
    /// Flight type: I=International, N=National
    #[serde(rename = "TIPOVUELO")]
    pub tipovuelo: String,
    /// Month (1-12)
    #[serde(rename = "MES")]
    pub mes: u8,
}

/// Batch prediction request
#[derive(Debug, Deserialize)]
pub struct FlightRequest {
    /// Flights to predict, scored in order
    pub flights: Vec<FlightData>,
}

/// Batch prediction response
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    /// One 0/1 delay prediction per requested flight, in request order
    pub predict: Vec<u8>,
}

/// Error body returned on rejected requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

type Rejection = (StatusCode, Json<ErrorResponse>);

fn validate(flight: &FlightData) -> Result<FlightRecord, String> {
    if !VALID_AIRLINES.contains(&flight.opera.as_str()) {
        return Err(format!("Invalid airline: {}", flight.opera));
    }

    let flight_type = match flight.tipovuelo.as_str() {
        "I" => FlightType::International,
        "N" => FlightType::National,
        other => return Err(format!("Invalid TIPOVUELO: {}. Must be 'I' or 'N'", other)),
    };

    if !(1..=12).contains(&flight.mes) {
        return Err(format!("Invalid MES: {}. Must be between 1 and 12", flight.mes));
    }

    Ok(FlightRecord::new(flight.opera.clone(), flight_type, flight.mes))
}

/// Predict delays for a batch of flights
pub async fn post_predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FlightRequest>,
) -> Result<Json<PredictionResponse>, Rejection> {
    let mut records = Vec::with_capacity(request.flights.len());
    for flight in &request.flights {
        match validate(flight) {
            Ok(record) => records.push(record),
            Err(detail) => {
                warn!("Rejected prediction request: {}", detail);
                return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { detail })));
            }
        }
    }

    // Label derivation is off at inference time, so feature building cannot
    // fail on the validated records; any classifier error here means the
    // startup ordering contract was broken.
    let (features, _) = build_features(&records, false).map_err(internal_error)?;
    let predictions = state.model.predict(&features).map_err(internal_error)?;

    debug!("Scored {} flights", predictions.len());
    Ok(Json(PredictionResponse {
        predict: predictions,
    }))
}

fn internal_error(err: impl std::fmt::Display) -> Rejection {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: format!("Internal server error: {}", err),
        }),
    )
}
