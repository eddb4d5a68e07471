// src/routes/tryon.rs
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, TRYON},
    message::{BodyMeasurements, TryOnRequest, TryOnResponse},
    services::{
        gateway::{ContentPart, GatewayMessage, GatewayRequest, Modality},
        prompts::{DEFAULT_CLOTHING_NAME, tryon_prompt},
    },
    state::SharedState,
};

pub async fn generate_tryon_handler(
    State(state): State<SharedState>,
    payload: Result<Json<TryOnRequest>, JsonRejection>,
) -> Result<Json<TryOnResponse>, AppError> {
    let Json(payload) = payload?;

    // The garment photo may come from the catalog; callers convert it to a
    // data URI first, so only presence is checked here.
    let (user_image, clothing_image) = match (
        non_blank(payload.user_image.as_deref()),
        non_blank(payload.clothing_image.as_deref()),
    ) {
        (Some(user), Some(clothing)) => (user, clothing),
        _ => {
            return Err(AppError::BadRequest(
                "User image and clothing image are required".to_string(),
            ));
        }
    };

    let clothing_name =
        non_blank(payload.clothing_name.as_deref()).unwrap_or(DEFAULT_CLOTHING_NAME);

    let request_id = Uuid::new_v4();
    let measurements = payload
        .body_measurements
        .as_ref()
        .and_then(|raw| match BodyMeasurements::deserialize(raw) {
            Ok(measurements) => Some(measurements),
            Err(e) => {
                warn!(
                    "[{}] Ignoring unreadable body measurements, using generic fit: {}",
                    request_id, e
                );
                None
            }
        });

    info!(
        "[{}] Generating virtual try-on for: {} (measurements: {})",
        request_id,
        clothing_name,
        measurements.is_some()
    );

    let prompt = tryon_prompt(clothing_name, measurements.as_ref());
    let request = GatewayRequest::new(&state.models.tryon)
        .with_message(GatewayMessage::user(vec![
            ContentPart::Text(prompt),
            ContentPart::Image(user_image.to_string()),
            ContentPart::Image(clothing_image.to_string()),
        ]))
        .with_modalities(&[Modality::Image, Modality::Text]);

    let response = state
        .gateway
        .invoke(request)
        .await
        .map_err(|e| AppError::from_gateway(e, &TRYON))?;

    let tryon_image = response
        .image()
        .ok_or_else(|| AppError::malformed(&TRYON, "no image field in response"))?
        .to_string();

    info!("[{}] Virtual try-on generated successfully", request_id);
    Ok(Json(TryOnResponse { tryon_image }))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
