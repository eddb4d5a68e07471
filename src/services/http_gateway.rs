// src/services/http_gateway.rs
//! OpenAI-compatible chat-completions client for the inference gateway.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::gateway::{
    ContentPart, GatewayError, GatewayRequest, GatewayResponse, InferenceGateway, truncate,
};
use crate::config::GatewayConfig;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct HttpGateway {
    config: GatewayConfig,
    client: reqwest::Client,
    retry_base_delay: Duration,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            config,
            client: builder.build()?,
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    /// Override the first retry delay (it doubles on each attempt).
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    async fn send_once(&self, body: &CompletionBody<'_>) -> Result<GatewayResponse, GatewayError> {
        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("AI gateway request failed: {}", e);
                GatewayError::Unavailable {
                    status: None,
                    detail: e.to_string(),
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| GatewayError::Unavailable {
            status: Some(status.as_u16()),
            detail: e.to_string(),
        })?;

        if !status.is_success() {
            error!(
                "AI gateway error: {} {}",
                status.as_u16(),
                truncate(&text, 500)
            );
            return Err(GatewayError::from_status(status.as_u16(), &text));
        }

        serde_json::from_str::<Value>(&text)
            .map(GatewayResponse)
            .map_err(|e| GatewayError::Malformed(format!("response body is not JSON: {e}")))
    }
}

#[async_trait]
impl InferenceGateway for HttpGateway {
    async fn invoke(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        if self.config.api_key.trim().is_empty() {
            return Err(GatewayError::NotConfigured);
        }

        let body = CompletionBody::from_request(&request);
        info!(
            "Calling AI gateway: model={} messages={} images={}",
            request.model,
            body.messages.len(),
            request.image_count()
        );

        let mut attempt = 0;
        loop {
            match self.send_once(&body).await {
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.retry_base_delay * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    warn!(
                        "AI gateway unavailable, retry {}/{} in {:?}",
                        attempt, self.config.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }
}

/// Wire format of a chat-completions request.
#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    modalities: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: WireContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent<'a> {
    Text(&'a str),
    Parts(Vec<WirePart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: WireImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct WireImageUrl<'a> {
    url: &'a str,
}

impl<'a> CompletionBody<'a> {
    fn from_request(request: &'a GatewayRequest) -> Self {
        let system = request.system_prompt.as_deref().map(|prompt| WireMessage {
            role: "system",
            content: WireContent::Text(prompt),
        });

        let messages = system
            .into_iter()
            .chain(request.messages.iter().map(|m| WireMessage {
                role: m.role.as_str(),
                content: wire_content(&m.content),
            }))
            .collect();

        Self {
            model: &request.model,
            messages,
            modalities: request.modalities.iter().map(|m| m.as_str()).collect(),
        }
    }
}

/// A lone text part is sent as a plain string; anything else as a parts array.
fn wire_content(parts: &[ContentPart]) -> WireContent<'_> {
    match parts {
        [ContentPart::Text(text)] => WireContent::Text(text),
        _ => WireContent::Parts(
            parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text(text) => WirePart::Text { text },
                    ContentPart::Image(url) => WirePart::ImageUrl {
                        image_url: WireImageUrl { url },
                    },
                })
                .collect(),
        ),
    }
}
