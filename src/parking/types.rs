// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Parking analysis result types

use serde::{Deserialize, Serialize, Serializer};

use crate::vision::detector::coco;
use crate::vision::encode_base64;

/// Detector categories that count as occupying a parking spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Car,
    Motorcycle,
    Bus,
    Truck,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 4] = [
        VehicleCategory::Car,
        VehicleCategory::Motorcycle,
        VehicleCategory::Bus,
        VehicleCategory::Truck,
    ];

    /// Map a COCO class id to a vehicle category; `None` for non-vehicles
    pub fn from_class_id(class_id: usize) -> Option<Self> {
        match class_id {
            coco::CAR => Some(VehicleCategory::Car),
            coco::MOTORCYCLE => Some(VehicleCategory::Motorcycle),
            coco::BUS => Some(VehicleCategory::Bus),
            coco::TRUCK => Some(VehicleCategory::Truck),
            _ => None,
        }
    }

    pub fn class_id(&self) -> usize {
        match self {
            VehicleCategory::Car => coco::CAR,
            VehicleCategory::Motorcycle => coco::MOTORCYCLE,
            VehicleCategory::Bus => coco::BUS,
            VehicleCategory::Truck => coco::TRUCK,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "car",
            VehicleCategory::Motorcycle => "motorcycle",
            VehicleCategory::Bus => "bus",
            VehicleCategory::Truck => "truck",
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle found in the uploaded photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedVehicle {
    /// Pixel corners `[x1, y1, x2, y2]`
    pub bounding_box: [i32; 4],
    /// Detection confidence, rounded to two decimals
    pub confidence: f32,
    pub category: VehicleCategory,
    /// COCO class id of `category`
    pub class_id: usize,
}

impl DetectedVehicle {
    pub fn new(bounding_box: [i32; 4], confidence: f32, category: VehicleCategory) -> Self {
        Self {
            bounding_box,
            confidence: round_confidence(confidence),
            category,
            class_id: category.class_id(),
        }
    }

    /// Caption drawn above the box on the annotated image, e.g. "Vehicle 0.9"
    ///
    /// Trailing zeros of the rounded score are dropped; whole numbers keep one
    /// decimal ("Vehicle 1.0").
    pub fn label(&self) -> String {
        if self.confidence.fract() == 0.0 {
            format!("Vehicle {:.1}", self.confidence)
        } else {
            format!("Vehicle {}", self.confidence)
        }
    }
}

/// Round a score to two decimal places (half away from zero)
pub fn round_confidence(confidence: f32) -> f32 {
    (confidence * 100.0).round() / 100.0
}

/// Result of analysing one parking-lot photo
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub total_spots: usize,
    pub occupied_spots: usize,
    pub vacant_spots: usize,
    pub vehicles: Vec<DetectedVehicle>,
    /// JPEG bytes of the annotated photo, base64 in JSON
    #[serde(serialize_with = "serialize_base64")]
    pub annotated_image: Vec<u8>,
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&encode_base64(bytes))
}
