// src/services/fake_gateway.rs
//! Scripted gateway for tests and offline development.
//!
//! Returns the same configured outcome for every call and records each request,
//! so tests can assert on call counts and on what would have been sent.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::gateway::{GatewayError, GatewayRequest, GatewayResponse, InferenceGateway};

#[derive(Debug)]
pub struct FakeGateway {
    outcome: Result<Value, GatewayError>,
    calls: Mutex<Vec<GatewayRequest>>,
}

impl FakeGateway {
    /// Reply with an arbitrary raw response body.
    pub fn with_response(raw: Value) -> Self {
        Self {
            outcome: Ok(raw),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `choices[0].message.content = text`.
    pub fn with_text(text: &str) -> Self {
        Self::with_response(json!({
            "choices": [{"message": {"role": "assistant", "content": text}}]
        }))
    }

    pub fn failing(err: GatewayError) -> Self {
        Self {
            outcome: Err(err),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.lock().len()
    }

    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<GatewayRequest>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl InferenceGateway for FakeGateway {
    async fn invoke(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        self.lock().push(request);
        self.outcome.clone().map(GatewayResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_and_replays_outcome() {
        let gateway = FakeGateway::with_text("hello");
        let response = gateway.invoke(GatewayRequest::new("m1")).await.unwrap();
        assert_eq!(response.text(), Some("hello"));

        gateway.invoke(GatewayRequest::new("m2")).await.unwrap();
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(gateway.requests()[1].model, "m2");
    }

    #[tokio::test]
    async fn failing_gateway_returns_error_every_time() {
        let gateway = FakeGateway::failing(GatewayError::RateLimited);
        for _ in 0..2 {
            let err = gateway.invoke(GatewayRequest::new("m")).await.unwrap_err();
            assert_eq!(err, GatewayError::RateLimited);
        }
        assert_eq!(gateway.call_count(), 2);
    }
}
