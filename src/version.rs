// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Parking Lot Detection API

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Full version string with feature description
pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"), "-yolov8-occupancy");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "multipart-upload",
    "yolov8-onnx",
    "vehicle-filter",
    "annotated-jpeg",
    "occupancy-estimate",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Parking Lot Detection API {} ({})", VERSION, FEATURES.join(", "))
}
