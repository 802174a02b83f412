// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration from command-line flags and environment variables

use anyhow::{anyhow, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};

use crate::vision::YoloParams;

/// Parking Lot Detection API server
#[derive(Parser, Debug, Clone)]
#[command(name = "parking-lot-detector")]
#[command(version)]
#[command(about = "HTTP service that detects vehicles in parking-lot photos", long_about = None)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind the HTTP server to
    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Path to the YOLOv8 ONNX export
    #[arg(long, env = "MODEL_PATH", default_value = "./models/yolov8n.onnx")]
    pub model_path: String,

    /// Minimum detector score for a vehicle to be reported
    #[arg(long, env = "CONFIDENCE_THRESHOLD", default_value_t = 0.3)]
    pub confidence_threshold: f32,

    /// IoU above which overlapping same-class boxes are suppressed
    #[arg(long, env = "IOU_THRESHOLD", default_value_t = 0.45)]
    pub iou_threshold: f32,

    /// ONNX Runtime intra-op thread count
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,
}

impl ServerConfig {
    /// Reject values the detector cannot use
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(anyhow!(
                "confidence threshold must be between 0 and 1, got {}",
                self.confidence_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(anyhow!(
                "IoU threshold must be between 0 and 1, got {}",
                self.iou_threshold
            ));
        }
        if self.intra_threads == 0 {
            return Err(anyhow!("intra thread count must be at least 1"));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn yolo_params(&self) -> YoloParams {
        YoloParams {
            iou_threshold: self.iou_threshold,
            intra_threads: self.intra_threads,
            ..YoloParams::default()
        }
    }
}
