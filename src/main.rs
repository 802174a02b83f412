// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use parking_lot_detector::{
    api::{start_server, AppState},
    config::ServerConfig,
    parking::ParkingAnalyzer,
    version,
    vision::YoloDetector,
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServerConfig::parse();
    config.validate().context("Invalid configuration")?;

    info!("Starting {}", version::get_version_string());
    info!("Loading YOLO model from {}", config.model_path);

    let detector = YoloDetector::new(&config.model_path, config.yolo_params())
        .with_context(|| format!("Failed to load detection model from {}", config.model_path))?;
    let analyzer = ParkingAnalyzer::new(Arc::new(detector))
        .with_confidence_threshold(config.confidence_threshold);

    info!(
        "Detector ready: {} (confidence >= {})",
        analyzer.detector_name(),
        analyzer.confidence_threshold()
    );

    start_server(&config, AppState::new(analyzer)).await
}
