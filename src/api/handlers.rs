use crate::api::AppState;
use crate::error::Result;
use crate::models::{IrisMeasurements, Species};
use axum::{extract::State, response::Html, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Service documentation with an example prediction payload
pub async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Iris Classifier API",
        "endpoints": {
            "GET /": "API documentation",
            "GET /health": "Service health check",
            "GET /form": "Browser form for trying the classifier",
            "POST /predict": "Send iris measurements, receive a species prediction",
        },
        "example_input": IrisMeasurements::EXAMPLE,
    }))
}

/// Browser form that posts to /predict client-side
pub async fn form() -> Html<&'static str> {
    Html(include_str!("../../static/form.html"))
}

/// Predict the iris species for a set of measurements
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>> {
    let measurements = IrisMeasurements {
        sepal_length: request.sepal_length,
        sepal_width: request.sepal_width,
        petal_length: request.petal_length,
        petal_width: request.petal_width,
    };

    let prediction = state.classifier.classify(&measurements)?;

    Ok(Json(PredictResponse {
        species: prediction.species,
        probability: round3(prediction.confidence),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub species: Species,
    pub probability: f64,
}

/// Round to three decimal places for the response body
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.2857142), 0.286);
        assert_eq!(round3(1.0), 1.0);
        assert_eq!(round3(0.0), 0.0);
        assert_eq!(round3(0.1005), 0.101);
    }

    #[test]
    fn test_round3_is_idempotent() {
        for &value in &[0.333333, 0.6666667, 0.9999, 0.5] {
            let rounded = round3(value);
            assert_eq!(round3(rounded), rounded);
        }
    }
}
