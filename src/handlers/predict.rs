//! Prediction handlers: HTML form flow and JSON API.

use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{PatientRecord, RankedFeature, RiskLevel};
use crate::{AppResult, AppState};

use super::pages;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub risk_probability: f64,
    pub risk_level: String,
    pub status: &'static str,
}

/// JSON prediction endpoint. Extra keys in the payload are ignored; any
/// missing or out-of-range feature is a 400 naming the offender.
pub async fn api_predict(
    State(state): State<AppState>,
    Json(payload): Json<HashMap<String, f64>>,
) -> AppResult<Json<PredictResponse>> {
    let record = PatientRecord::from_map(&payload)?;
    record.validate()?;

    let probability = state.predictor.predict(&record);
    let level = RiskLevel::from_probability(probability);

    Ok(Json(PredictResponse {
        risk_probability: probability,
        risk_level: level.to_string(),
        status: "success",
    }))
}

/// Form submission: renders the result page, or the error page with a 400.
pub async fn predict_form(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    match run_form_prediction(&state, &fields) {
        Ok((probability, level, record)) => {
            pages::result_page(probability, level, &record).into_response()
        }
        Err(message) => {
            (StatusCode::BAD_REQUEST, pages::error_page(&message)).into_response()
        }
    }
}

fn run_form_prediction(
    state: &AppState,
    fields: &HashMap<String, String>,
) -> Result<(f64, RiskLevel, PatientRecord), String> {
    let mut values = HashMap::with_capacity(fields.len());
    for (key, raw) in fields {
        let parsed: f64 = raw
            .trim()
            .parse()
            .map_err(|_| format!("field '{}' must be numeric, got '{}'", key, raw))?;
        values.insert(key.clone(), parsed);
    }

    let record = PatientRecord::from_map(&values).map_err(|e| e.to_string())?;
    record.validate().map_err(|e| e.to_string())?;

    let probability = state.predictor.predict(&record);
    Ok((probability, RiskLevel::from_probability(probability), record))
}

#[derive(Debug, Serialize)]
pub struct ImportanceResponse {
    pub features: Vec<RankedFeature>,
    pub trained_at: DateTime<Utc>,
    pub accuracy: f64,
    pub status: &'static str,
}

/// Feature-importance ranking of the loaded model.
pub async fn importance(State(state): State<AppState>) -> Json<ImportanceResponse> {
    let metadata = state.predictor.metadata();
    Json(ImportanceResponse {
        features: state.predictor.feature_importance(),
        trained_at: metadata.trained_at,
        accuracy: metadata.accuracy,
        status: "success",
    })
}
