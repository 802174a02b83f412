// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 output decoding
//!
//! The detection head emits a tensor of shape `[1, 4 + num_classes, N]`:
//! for each of the N anchor candidates, a centre-format box (`cx, cy, w, h`)
//! in model input pixels followed by one score per class. There is no
//! objectness column. Some exporters transpose this to `[1, N, 4 + num_classes]`;
//! both layouts are accepted.

use anyhow::Result;
use ndarray::{ArrayViewD, Axis, Ix2};
use std::cmp::Ordering;

use super::preprocessing::Letterbox;
use super::Detection;

/// Intersection over union of two boxes
pub fn iou(a: &Detection, b: &Detection) -> f32 {
    let inter_w = (a.x2.min(b.x2) - a.x1.max(b.x1)).max(0.0);
    let inter_h = (a.y2.min(b.y2) - a.y1.max(b.y1)).max(0.0);
    let intersection = inter_w * inter_h;
    let union = a.area() + b.area() - intersection;

    if union <= 0.0 {
        0.0
    } else {
        intersection / union
    }
}

/// Class-aware greedy non-maximum suppression
///
/// Returns detections sorted by descending confidence. A box is dropped when
/// it overlaps an already kept box of the same class by more than
/// `iou_threshold`.
pub fn non_max_suppression(
    mut detections: Vec<Detection>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Detection> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::new();
    for candidate in detections {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && iou(k, &candidate) > iou_threshold);
        if !suppressed {
            kept.push(candidate);
        }
    }

    kept
}

/// Decode raw YOLOv8 output into detections in original-image coordinates
pub fn decode_predictions(
    output: ArrayViewD<f32>,
    geometry: &Letterbox,
    confidence_threshold: f32,
    iou_threshold: f32,
    max_detections: usize,
) -> Result<Vec<Detection>> {
    let shape = output.shape().to_vec();
    if shape.len() != 3 || shape[0] != 1 {
        anyhow::bail!(
            "Unexpected detector output shape: {:?}, expected [1, 4 + classes, N]",
            shape
        );
    }

    // [1, C, N] with C = 4 + classes is the native layout; anchors outnumber channels
    let predictions = output.index_axis(Axis(0), 0).into_dimensionality::<Ix2>()?;
    let predictions = if shape[1] <= shape[2] {
        predictions
    } else {
        predictions.reversed_axes()
    };

    let channels = predictions.shape()[0];
    if channels <= 4 {
        anyhow::bail!("Detector output has no class scores: {:?}", shape);
    }

    let mut candidates = Vec::new();
    for anchor in predictions.axis_iter(Axis(1)) {
        let (class_id, confidence) = anchor
            .iter()
            .skip(4)
            .copied()
            .enumerate()
            .fold((0usize, f32::MIN), |best, (idx, score)| {
                if score > best.1 {
                    (idx, score)
                } else {
                    best
                }
            });

        if confidence < confidence_threshold {
            continue;
        }

        let (cx, cy, w, h) = (anchor[0], anchor[1], anchor[2], anchor[3]);
        let (x1, y1) = geometry.map_to_original(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = geometry.map_to_original(cx + w / 2.0, cy + h / 2.0);

        candidates.push(Detection {
            class_id,
            confidence,
            x1,
            y1,
            x2,
            y2,
        });
    }

    Ok(non_max_suppression(
        candidates,
        iou_threshold,
        max_detections,
    ))
}
