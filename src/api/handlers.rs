// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::http_server::AppState;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// GET / - Liveness text
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Parking Lot Detection API".to_string(),
        status: "running".to_string(),
        version: version::VERSION_NUMBER.to_string(),
    })
}

/// GET /health - Reports whether a detector is installed
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let analyzer = state.analyzer.as_ref();
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: analyzer.is_some(),
        model: analyzer.map(|a| a.detector_name().to_string()),
    })
}
