// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod parking;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{create_app, start_server, AppState};
pub use config::ServerConfig;
pub use parking::{AnalysisError, AnalysisResult, DetectedVehicle, ParkingAnalyzer, VehicleCategory};
pub use vision::{Detection, ObjectDetector, YoloDetector, YoloParams};
