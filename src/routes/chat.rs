// src/routes/chat.rs
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{AppError, FASHION_CHAT},
    message::{ChatMessage, ChatRequest, ChatResponse, ChatRole},
    services::{
        gateway::{GatewayMessage, GatewayRequest, Role},
        prompts::CHAT_SYSTEM_PROMPT,
    },
    state::SharedState,
};

pub async fn fashion_chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(payload) = payload?;
    validate_conversation(&payload.messages)?;

    let request_id = Uuid::new_v4();
    info!(
        "[{}] Fashion chat with {} messages",
        request_id,
        payload.messages.len()
    );

    let request = payload.messages.iter().fold(
        GatewayRequest::new(&state.models.analysis).with_system_prompt(CHAT_SYSTEM_PROMPT),
        |request, message| {
            let role = match message.role {
                ChatRole::User => Role::User,
                ChatRole::Assistant => Role::Assistant,
            };
            request.with_message(GatewayMessage::text(role, message.content.trim()))
        },
    );

    let response = state
        .gateway
        .invoke(request)
        .await
        .map_err(|e| AppError::from_gateway(e, &FASHION_CHAT))?;

    let reply = response
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| AppError::malformed(&FASHION_CHAT, "no text content in first choice"))?
        .to_string();

    Ok(Json(ChatResponse { reply }))
}

fn validate_conversation(messages: &[ChatMessage]) -> Result<(), AppError> {
    let Some(last) = messages.last() else {
        return Err(AppError::BadRequest("Messages cannot be empty".to_string()));
    };
    if messages.iter().any(|m| m.content.trim().is_empty()) {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }
    if last.role != ChatRole::User {
        return Err(AppError::BadRequest(
            "The last message must come from the user".to_string(),
        ));
    }
    Ok(())
}
