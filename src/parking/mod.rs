// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Parking-lot occupancy analysis
//!
//! Components:
//! - `analyzer` - Decode, detect, annotate and estimate occupancy for one photo
//! - `capacity` - Placeholder capacity heuristic
//! - `types` - Vehicle and result types returned to clients
//! - `error` - Analysis error taxonomy

pub mod analyzer;
pub mod capacity;
pub mod error;
pub mod types;

pub use analyzer::{ParkingAnalyzer, DEFAULT_CONFIDENCE_THRESHOLD};
pub use capacity::{estimate_total_spots, vacant_spots};
pub use error::AnalysisError;
pub use types::{AnalysisResult, DetectedVehicle, VehicleCategory};
