// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Parking-lot photo analysis
//!
//! decode → detect → keep vehicles → annotate → JPEG → occupancy estimate

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::capacity::{estimate_total_spots, vacant_spots};
use super::error::AnalysisError;
use super::types::{AnalysisResult, DetectedVehicle, VehicleCategory};
use crate::vision::{decode_image_bytes, draw_annotations, encode_jpeg, Annotation, Detection, ObjectDetector};

/// Minimum detector score for a vehicle to be reported
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.3;

/// Stateless analysis service wrapping a shared, read-only detector
#[derive(Clone)]
pub struct ParkingAnalyzer {
    detector: Arc<dyn ObjectDetector>,
    confidence_threshold: f32,
}

impl std::fmt::Debug for ParkingAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParkingAnalyzer")
            .field("detector", &self.detector.name())
            .field("confidence_threshold", &self.confidence_threshold)
            .finish()
    }
}

impl ParkingAnalyzer {
    pub fn new(detector: Arc<dyn ObjectDetector>) -> Self {
        Self {
            detector,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    /// Set the confidence threshold for reported vehicles
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    /// Analyse one uploaded photo
    ///
    /// # Errors
    /// - `AnalysisError::InvalidImage` if the bytes are not a decodable image
    /// - `AnalysisError::Detection` if the detector fails
    /// - `AnalysisError::Encode` if the annotated image cannot be encoded
    pub fn analyze(&self, image_bytes: &[u8]) -> Result<AnalysisResult, AnalysisError> {
        let start = Instant::now();

        let (image, info) = decode_image_bytes(image_bytes).map_err(AnalysisError::InvalidImage)?;
        debug!(
            "Decoded image: {}x{}, {} bytes, {:?}",
            info.width, info.height, info.size_bytes, info.format
        );

        let detections = self
            .detector
            .detect(&image, self.confidence_threshold)
            .map_err(AnalysisError::Detection)?;
        let detection_count = detections.len();

        let vehicles = self.select_vehicles(&detections, info.width, info.height);

        let annotations: Vec<Annotation> = vehicles
            .iter()
            .map(|vehicle| {
                let [x1, y1, x2, y2] = vehicle.bounding_box;
                Annotation {
                    x1,
                    y1,
                    x2,
                    y2,
                    label: vehicle.label(),
                }
            })
            .collect();

        let mut canvas = image.to_rgb8();
        draw_annotations(&mut canvas, &annotations);
        let annotated_image = encode_jpeg(&canvas).map_err(AnalysisError::Encode)?;

        let occupied_spots = vehicles.len();
        let total_spots = estimate_total_spots(occupied_spots);
        let vacant_spots = vacant_spots(total_spots, occupied_spots);

        info!(
            "Parking analysis complete: {} vehicles of {} detections, {}/{} spots vacant, {}ms",
            occupied_spots,
            detection_count,
            vacant_spots,
            total_spots,
            start.elapsed().as_millis()
        );

        Ok(AnalysisResult {
            total_spots,
            occupied_spots,
            vacant_spots,
            vehicles,
            annotated_image,
        })
    }

    /// Keep vehicle-class detections at or above the threshold, in detector order
    fn select_vehicles(&self, detections: &[Detection], width: u32, height: u32) -> Vec<DetectedVehicle> {
        detections
            .iter()
            .filter(|d| d.confidence >= self.confidence_threshold)
            .filter_map(|d| {
                let category = VehicleCategory::from_class_id(d.class_id)?;
                let bounding_box = [
                    pixel(d.x1, width),
                    pixel(d.y1, height),
                    pixel(d.x2, width),
                    pixel(d.y2, height),
                ];
                Some(DetectedVehicle::new(bounding_box, d.confidence, category))
            })
            .collect()
    }
}

/// Truncate a coordinate toward zero and clamp it to `[0, limit]`
fn pixel(value: f32, limit: u32) -> i32 {
    (value.clamp(0.0, limit as f32) as i32).min(limit as i32)
}
