// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared helpers for the HTTP tests: a canned detector, image fixtures and
//! a hand-built multipart encoder.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use parking_lot_detector::{
    api::{create_app, AppState},
    parking::ParkingAnalyzer,
    vision::{Detection, ObjectDetector},
};
use std::io::Cursor;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

pub const BOUNDARY: &str = "parking-lot-test-boundary";

/// Detector that returns a fixed set of detections, or fails on demand
pub struct CannedDetector {
    detections: Vec<Detection>,
    failure: Option<String>,
}

impl CannedDetector {
    pub fn returning(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            detections: vec![],
            failure: Some(message.to_string()),
        }
    }
}

impl ObjectDetector for CannedDetector {
    fn detect(
        &self,
        _image: &DynamicImage,
        confidence_threshold: f32,
    ) -> anyhow::Result<Vec<Detection>> {
        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }
        Ok(self
            .detections
            .iter()
            .filter(|d| d.confidence >= confidence_threshold)
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "canned-yolo"
    }
}

pub fn detection(class_id: usize, confidence: f32, bbox: [f32; 4]) -> Detection {
    Detection {
        class_id,
        confidence,
        x1: bbox[0],
        y1: bbox[1],
        x2: bbox[2],
        y2: bbox[3],
    }
}

pub fn app_with(detector: CannedDetector) -> Router {
    let analyzer = ParkingAnalyzer::new(Arc::new(detector));
    create_app(AppState::new(analyzer))
}

pub fn app_without_model() -> Router {
    create_app(AppState::new_for_test())
}

/// Solid grey PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([120, 120, 120]));
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// Encode a single-part `multipart/form-data` body
pub fn multipart_body(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn analyze_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send one request and parse the JSON response
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
