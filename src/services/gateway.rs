// src/services/gateway.rs
//! Outbound calls to the multimodal inference gateway.
//!
//! Handlers talk to the gateway through the [`InferenceGateway`] trait so the
//! HTTP implementation can be swapped for a scripted one in tests.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::extractor;

/// Every way a gateway call can fail. Handlers match on this exhaustively.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("Gateway API key is not configured")]
    NotConfigured,

    #[error("Gateway rate limit hit")]
    RateLimited,

    #[error("Gateway credits exhausted")]
    QuotaExhausted,

    #[error("Gateway unavailable (status {status:?}): {detail}")]
    Unavailable { status: Option<u16>, detail: String },

    #[error("Malformed gateway response: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// Classify a non-2xx upstream status.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            429 => GatewayError::RateLimited,
            402 => GatewayError::QuotaExhausted,
            _ => GatewayError::Unavailable {
                status: Some(status),
                detail: truncate(body, 500).to_string(),
            },
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Unavailable { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    /// Data URI or remote URL.
    Image(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl GatewayMessage {
    pub fn user(content: Vec<ContentPart>) -> Self {
        Self { role: Role::User, content }
    }

    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::Text(text.into())],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Image,
    Text,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Image => "image",
            Modality::Text => "text",
        }
    }
}

/// One completion request: model, optional system instruction and the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<GatewayMessage>,
    /// Empty means the gateway's default (text only).
    pub modalities: Vec<Modality>,
}

impl GatewayRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: None,
            messages: Vec::new(),
            modalities: Vec::new(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_message(mut self, message: GatewayMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_modalities(mut self, modalities: &[Modality]) -> Self {
        self.modalities = modalities.to_vec();
        self
    }

    pub fn image_count(&self) -> usize {
        self.messages
            .iter()
            .flat_map(|m| m.content.iter())
            .filter(|p| matches!(p, ContentPart::Image(_)))
            .count()
    }
}

/// Decoded 2xx body from the gateway. The shape is loosely specified, so it is
/// kept as raw JSON and read through the extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse(pub Value);

impl GatewayResponse {
    pub fn text(&self) -> Option<&str> {
        extractor::extract_text(&self.0)
    }

    pub fn image(&self) -> Option<&str> {
        extractor::extract_image(&self.0)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }
}

#[async_trait]
pub trait InferenceGateway: Send + Sync + fmt::Debug {
    /// Send exactly one completion request (plus any configured retries for
    /// `Unavailable`) and return the decoded body.
    async fn invoke(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError>;
}

/// Cut `s` to at most `max` characters without splitting a char.
pub fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(GatewayError::from_status(429, ""), GatewayError::RateLimited);
        assert_eq!(GatewayError::from_status(402, ""), GatewayError::QuotaExhausted);
        assert!(matches!(
            GatewayError::from_status(503, "down"),
            GatewayError::Unavailable { status: Some(503), ref detail } if detail == "down"
        ));
        assert!(matches!(
            GatewayError::from_status(400, "bad"),
            GatewayError::Unavailable { status: Some(400), .. }
        ));
    }

    #[test]
    fn only_unavailable_is_retryable() {
        assert!(GatewayError::from_status(500, "").is_retryable());
        assert!(!GatewayError::RateLimited.is_retryable());
        assert!(!GatewayError::QuotaExhausted.is_retryable());
        assert!(!GatewayError::Malformed("x".into()).is_retryable());
        assert!(!GatewayError::NotConfigured.is_retryable());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn request_builder_counts_images() {
        let req = GatewayRequest::new("m")
            .with_system_prompt("sys")
            .with_message(GatewayMessage::user(vec![
                ContentPart::Text("hi".into()),
                ContentPart::Image("data:image/png;base64,AA".into()),
                ContentPart::Image("data:image/png;base64,BB".into()),
            ]))
            .with_modalities(&[Modality::Image, Modality::Text]);
        assert_eq!(req.image_count(), 2);
        assert_eq!(req.system_prompt.as_deref(), Some("sys"));
        assert_eq!(req.modalities.len(), 2);
    }
}
