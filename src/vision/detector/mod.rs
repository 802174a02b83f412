// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection for parking-lot images
//!
//! Components:
//! - `coco` - COCO class table used by the pretrained detector
//! - `preprocessing` - Letterbox resize and NCHW tensor construction
//! - `postprocessing` - YOLOv8 output decoding and non-maximum suppression
//! - `yolo` - ONNX Runtime wrapper around a YOLOv8 export

pub mod coco;
pub mod postprocessing;
pub mod preprocessing;
pub mod yolo;

use image::DynamicImage;

pub use postprocessing::{decode_predictions, iou, non_max_suppression};
pub use preprocessing::{letterbox, Letterbox};
pub use yolo::{YoloDetector, YoloParams};

/// An object found by the detector, in original-image pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Detector class index (COCO ids for the stock YOLOv8 weights)
    pub class_id: usize,
    /// Detection confidence score (0.0-1.0)
    pub confidence: f32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Detection {
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }
}

/// A pretrained detector that can be shared across request handlers
///
/// Implementations must only return detections scoring at least
/// `confidence_threshold`.
#[cfg_attr(test, mockall::automock)]
pub trait ObjectDetector: Send + Sync {
    /// Run detection over a decoded image
    fn detect(
        &self,
        image: &DynamicImage,
        confidence_threshold: f32,
    ) -> anyhow::Result<Vec<Detection>>;

    /// Human-readable model name reported on /health
    fn name(&self) -> &str;
}
