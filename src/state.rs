// src/state.rs
use std::sync::Arc;

use crate::config::ModelConfig;
use crate::services::gateway::InferenceGateway;

pub type SharedState = Arc<AppState>;

/// Read-only after startup; handlers keep no per-request state here.
#[derive(Debug)]
pub struct AppState {
    pub gateway: Arc<dyn InferenceGateway>,
    pub models: ModelConfig,
}

impl AppState {
    pub fn new(gateway: Arc<dyn InferenceGateway>, models: ModelConfig) -> Self {
        Self { gateway, models }
    }
}
