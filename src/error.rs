// src/error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::message::ErrorEnvelope;
use crate::services::gateway::GatewayError;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again in a moment.";
pub const NOT_CONFIGURED_MESSAGE: &str = "AI service is not configured";

/// Per-endpoint wording for failures that reach the client.
#[derive(Debug, Clone, Copy)]
pub struct Task {
    pub name: &'static str,
    pub failure: &'static str,
    pub quota: &'static str,
    pub malformed: &'static str,
}

pub const BODY_ANALYSIS: Task = Task {
    name: "analyze-body",
    failure: "Failed to analyze body measurements",
    quota: "AI credits depleted. Please add credits to continue.",
    malformed: "Malformed response from AI: could not read body analysis",
};

pub const SKIN_ANALYSIS: Task = Task {
    name: "analyze-skin",
    failure: "Failed to analyze skin tone",
    quota: "AI credits depleted. Please add credits to continue.",
    malformed: "Malformed response from AI: could not read skin analysis",
};

pub const TRYON: Task = Task {
    name: "generate-tryon",
    failure: "Failed to generate try-on image",
    quota: "AI credits depleted. Please add credits to continue generating try-on images.",
    malformed: "No image generated in response",
};

pub const FASHION_CHAT: Task = Task {
    name: "fashion-chat",
    failure: "Failed to get a reply from the fashion assistant",
    quota: "AI credits depleted. Please add credits to continue.",
    malformed: "Malformed response from AI: empty reply",
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    PaymentRequired(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Map a gateway failure to its client-facing error. Upstream detail is
    /// logged here and never copied into the message.
    pub fn from_gateway(err: GatewayError, task: &Task) -> Self {
        match err {
            GatewayError::RateLimited => {
                warn!("{}: upstream rate limited", task.name);
                AppError::RateLimited(RATE_LIMIT_MESSAGE.to_string())
            }
            GatewayError::QuotaExhausted => {
                warn!("{}: upstream credits exhausted", task.name);
                AppError::PaymentRequired(task.quota.to_string())
            }
            GatewayError::Unavailable { status, detail } => {
                error!("{}: upstream unavailable ({:?}): {}", task.name, status, detail);
                AppError::Internal(task.failure.to_string())
            }
            GatewayError::Malformed(detail) => Self::malformed(task, &detail),
            GatewayError::NotConfigured => {
                error!("{}: AI gateway API key is not configured", task.name);
                AppError::Internal(NOT_CONFIGURED_MESSAGE.to_string())
            }
        }
    }

    pub fn malformed(task: &Task, detail: &str) -> Self {
        error!("{}: malformed AI response: {}", task.name, detail);
        AppError::Internal(task.malformed.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("rejected request body: {}", rejection.body_text());
        AppError::BadRequest("Invalid request body".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorEnvelope { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_errors_map_to_statuses() {
        let cases = [
            (GatewayError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (GatewayError::QuotaExhausted, StatusCode::PAYMENT_REQUIRED),
            (
                GatewayError::Unavailable { status: Some(503), detail: "x".into() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (GatewayError::Malformed("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (GatewayError::NotConfigured, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from_gateway(err, &BODY_ANALYSIS).status(), status);
        }
    }

    #[test]
    fn upstream_detail_is_not_leaked() {
        let err = AppError::from_gateway(
            GatewayError::Unavailable {
                status: Some(500),
                detail: "internal stack trace at gateway.rs:42".into(),
            },
            &SKIN_ANALYSIS,
        );
        assert_eq!(err.to_string(), "Failed to analyze skin tone");

        let err = AppError::from_gateway(GatewayError::Malformed("EOF while parsing".into()), &TRYON);
        assert_eq!(err.to_string(), "No image generated in response");
    }

    #[test]
    fn tryon_quota_message_is_specific() {
        let err = AppError::from_gateway(GatewayError::QuotaExhausted, &TRYON);
        assert!(err.to_string().contains("try-on"));
        assert!(err.to_string().contains("credits"));
    }
}
