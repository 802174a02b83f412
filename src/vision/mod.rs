// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for CPU-based image analysis
//!
//! This module provides:
//! - Image decoding and JPEG/base64 encoding
//! - Object detection via a pretrained YOLOv8 ONNX model
//! - Box and label annotation

pub mod annotate;
pub mod detector;
pub mod image_utils;

pub use annotate::{draw_annotations, Annotation};
pub use detector::{Detection, ObjectDetector, YoloDetector, YoloParams};
pub use image_utils::{decode_image_bytes, detect_format, encode_base64, encode_jpeg, ImageError, ImageInfo};
