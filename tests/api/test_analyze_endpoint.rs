// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /analyze tests
//!
//! These tests verify that:
//! - A valid photo returns vehicles, an occupancy estimate and a JPEG
//! - Non-image uploads, corrupt images and oversized uploads are rejected with 400
//! - Detector failures surface as 500 with the processing error
//! - The endpoint reports 503 when no detector is loaded

use super::common::*;
use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use parking_lot_detector::vision::image_utils::MAX_IMAGE_SIZE;

#[tokio::test]
async fn test_analyze_counts_vehicles() {
    let app = app_with(CannedDetector::returning(vec![
        detection(2, 0.91, [10.0, 10.0, 60.0, 40.0]),  // car
        detection(0, 0.97, [70.0, 10.0, 90.0, 60.0]),  // person
        detection(7, 0.55, [5.0, 50.0, 95.0, 75.0]),   // truck
        detection(3, 0.12, [1.0, 1.0, 5.0, 5.0]),      // motorcycle, below threshold
    ]));

    let body = multipart_body("file", "lot.png", "image/png", &png_bytes(100, 80));
    let (status, json) = send(app, analyze_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let data = &json["data"];
    assert_eq!(data["occupied_spots"], 2);
    assert_eq!(data["total_spots"], 10);
    assert_eq!(data["vacant_spots"], 8);

    let vehicles = data["vehicles"].as_array().unwrap();
    assert_eq!(vehicles.len(), 2);
    assert_eq!(vehicles[0]["category"], "car");
    assert_eq!(vehicles[0]["class_id"], 2);
    assert_eq!(vehicles[0]["bounding_box"], serde_json::json!([10, 10, 60, 40]));
    assert_eq!(vehicles[1]["category"], "truck");
    for vehicle in vehicles {
        assert!(vehicle["confidence"].as_f64().unwrap() >= 0.3);
    }
}

#[tokio::test]
async fn test_annotated_image_is_base64_jpeg() {
    let app = app_with(CannedDetector::returning(vec![detection(
        2,
        0.8,
        [4.0, 30.0, 50.0, 60.0],
    )]));

    let body = multipart_body("file", "lot.png", "image/png", &png_bytes(64, 64));
    let (status, json) = send(app, analyze_request(body)).await;
    assert_eq!(status, StatusCode::OK);

    let encoded = json["data"]["annotated_image"].as_str().unwrap();
    let jpeg = STANDARD.decode(encoded).unwrap();
    assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);

    let annotated = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((annotated.width(), annotated.height()), (64, 64));
}

#[tokio::test]
async fn test_busy_lot_estimate() {
    let detections = (0..15)
        .map(|i| {
            let x = i as f32 * 12.0;
            detection(2, 0.9, [x, 10.0, x + 10.0, 30.0])
        })
        .collect();
    let app = app_with(CannedDetector::returning(detections));

    let body = multipart_body("file", "lot.png", "image/png", &png_bytes(200, 40));
    let (status, json) = send(app, analyze_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total_spots"], 18);
    assert_eq!(json["data"]["occupied_spots"], 15);
    assert_eq!(json["data"]["vacant_spots"], 3);
}

#[tokio::test]
async fn test_non_image_content_type_rejected() {
    let app = app_with(CannedDetector::returning(vec![]));

    let body = multipart_body("file", "notes.txt", "text/plain", b"not a photo");
    let (status, json) = send(app, analyze_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["detail"], "Invalid file format. Please upload an image.");
}

#[tokio::test]
async fn test_corrupt_image_rejected() {
    let app = app_with(CannedDetector::returning(vec![]));

    let body = multipart_body("file", "lot.jpg", "image/jpeg", b"definitely not a jpeg");
    let (status, json) = send(app, analyze_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Invalid image format");
}

/// PNG signature followed by zero padding, `len` bytes in total
fn oversized_png(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    data[..8].copy_from_slice(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    data
}

#[tokio::test]
async fn test_image_over_size_cap_rejected() {
    let app = app_with(CannedDetector::returning(vec![]));

    // Fits in the request body limit but exceeds the decoded image cap
    let body = multipart_body("file", "huge.png", "image/png", &oversized_png(MAX_IMAGE_SIZE + 10));
    let (status, json) = send(app, analyze_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Invalid image format");
}

#[tokio::test]
async fn test_body_over_request_limit_rejected() {
    let app = app_with(CannedDetector::returning(vec![]));

    let body = multipart_body("file", "huge.png", "image/png", &oversized_png(12 * 1024 * 1024));
    let (status, json) = send(app, analyze_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error_type"], "invalid_request");
    assert_eq!(json["detail"], "Invalid image format");
}

#[tokio::test]
async fn test_missing_file_field_rejected() {
    let app = app_with(CannedDetector::returning(vec![]));

    let body = multipart_body("photo", "lot.png", "image/png", &png_bytes(8, 8));
    let (status, json) = send(app, analyze_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "validation_error");
}

#[tokio::test]
async fn test_non_multipart_body_rejected() {
    let app = app_with(CannedDetector::returning(vec![]));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"file": "lot.png"}"#))
        .unwrap();
    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "invalid_request");
}

#[tokio::test]
async fn test_detector_failure_is_internal_error() {
    let app = app_with(CannedDetector::failing("inference session crashed"));

    let body = multipart_body("file", "lot.png", "image/png", &png_bytes(16, 16));
    let (status, json) = send(app, analyze_request(body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error processing image: "));
    assert!(detail.contains("inference session crashed"));
}

#[tokio::test]
async fn test_analyze_without_model_unavailable() {
    let body = multipart_body("file", "lot.png", "image/png", &png_bytes(8, 8));
    let (status, json) = send(app_without_model(), analyze_request(body)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error_type"], "service_unavailable");
}

#[tokio::test]
async fn test_analyze_rejects_get() {
    let app = app_with(CannedDetector::returning(vec![]));
    let (status, _) = send(app, get_request("/analyze")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
