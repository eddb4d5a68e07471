// src/routes/analysis.rs
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, BODY_ANALYSIS, SKIN_ANALYSIS, Task},
    message::{AnalysisRequest, BodyMeasurements, SkinAnalysis},
    services::{
        extractor::recover_json_object,
        gateway::{ContentPart, GatewayMessage, GatewayRequest, truncate},
        prompts::{BODY_SYSTEM_PROMPT, BODY_USER_PROMPT, SKIN_SYSTEM_PROMPT, SKIN_USER_PROMPT},
    },
    state::SharedState,
};

const DATA_URI_PREFIX: &str = "data:image/";

pub async fn analyze_body_handler(
    State(state): State<SharedState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload?;
    let image = require_data_uri(payload.image.as_deref())?;

    let request_id = Uuid::new_v4();
    info!("[{}] Analyzing body measurements...", request_id);

    let request = GatewayRequest::new(&state.models.analysis)
        .with_system_prompt(BODY_SYSTEM_PROMPT)
        .with_message(GatewayMessage::user(vec![
            ContentPart::Text(BODY_USER_PROMPT.to_string()),
            ContentPart::Image(image.to_string()),
        ]));

    let analysis = run_json_analysis(&state, request, &BODY_ANALYSIS).await?;
    warn_if_off_schema::<BodyMeasurements>(&analysis, &BODY_ANALYSIS);

    info!("[{}] Body analysis complete", request_id);
    Ok(Json(analysis))
}

pub async fn analyze_skin_handler(
    State(state): State<SharedState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload?;
    let image = require_data_uri(payload.image.as_deref())?;

    let request_id = Uuid::new_v4();
    info!("[{}] Analyzing skin tone...", request_id);

    let request = GatewayRequest::new(&state.models.analysis)
        .with_system_prompt(SKIN_SYSTEM_PROMPT)
        .with_message(GatewayMessage::user(vec![
            ContentPart::Text(SKIN_USER_PROMPT.to_string()),
            ContentPart::Image(image.to_string()),
        ]));

    let analysis = run_json_analysis(&state, request, &SKIN_ANALYSIS).await?;
    warn_if_off_schema::<SkinAnalysis>(&analysis, &SKIN_ANALYSIS);

    info!("[{}] Skin analysis complete", request_id);
    Ok(Json(analysis))
}

fn require_data_uri(image: Option<&str>) -> Result<&str, AppError> {
    match image.map(str::trim) {
        None | Some("") => Err(AppError::BadRequest("Image is required".to_string())),
        Some(image) if !image.starts_with(DATA_URI_PREFIX) => Err(AppError::BadRequest(
            "Image must be a base64 data URI (data:image/...)".to_string(),
        )),
        Some(image) => Ok(image),
    }
}

/// One gateway call, then JSON recovery over the reply text. The recovered
/// object is returned as-is.
async fn run_json_analysis(
    state: &SharedState,
    request: GatewayRequest,
    task: &Task,
) -> Result<Value, AppError> {
    let response = state
        .gateway
        .invoke(request)
        .await
        .map_err(|e| AppError::from_gateway(e, task))?;

    let text = response
        .text()
        .ok_or_else(|| AppError::malformed(task, "no text content in first choice"))?;

    recover_json_object(text)
        .map(Value::Object)
        .ok_or_else(|| AppError::malformed(task, &format!("no JSON object in: {}", truncate(text, 500))))
}

/// The model is only asked to follow the schema; a mismatch is logged, not rejected.
fn warn_if_off_schema<T: DeserializeOwned>(analysis: &Value, task: &Task) {
    if let Err(e) = T::deserialize(analysis) {
        warn!("{}: analysis does not match expected schema: {}", task.name, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_validation() {
        assert!(require_data_uri(None).is_err());
        assert!(require_data_uri(Some("  ")).is_err());
        assert!(require_data_uri(Some("https://example.com/me.jpg")).is_err());
        assert!(require_data_uri(Some("data:text/plain;base64,AA")).is_err());
        assert_eq!(
            require_data_uri(Some("data:image/png;base64,AA")).unwrap(),
            "data:image/png;base64,AA"
        );
    }
}
