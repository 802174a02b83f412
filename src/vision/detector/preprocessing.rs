// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the YOLOv8 detector

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Square input size of the stock YOLOv8 exports
pub const YOLO_INPUT_SIZE: u32 = 640;

/// Padding colour used by Ultralytics letterboxing
pub const PAD_VALUE: u8 = 114;

/// Geometry of a letterbox transform, used to map boxes back to the original image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Scale factor applied to the original image
    pub scale: f32,
    /// Horizontal padding on the left edge
    pub pad_x: f32,
    /// Vertical padding on the top edge
    pub pad_y: f32,
    /// Original image width
    pub original_width: u32,
    /// Original image height
    pub original_height: u32,
}

impl Letterbox {
    /// Compute the transform that fits `width` x `height` into a `target_size` square
    pub fn new(width: u32, height: u32, target_size: u32) -> Self {
        if width == 0 || height == 0 {
            return Self {
                scale: 1.0,
                pad_x: 0.0,
                pad_y: 0.0,
                original_width: width,
                original_height: height,
            };
        }

        let scale = (target_size as f32 / width as f32).min(target_size as f32 / height as f32);
        let (new_w, new_h) = scaled_size(width, height, scale);

        Self {
            scale,
            pad_x: ((target_size - new_w) / 2) as f32,
            pad_y: ((target_size - new_h) / 2) as f32,
            original_width: width,
            original_height: height,
        }
    }

    /// Map a point from model input space back to original image space,
    /// clamped to the image bounds
    pub fn map_to_original(&self, x: f32, y: f32) -> (f32, f32) {
        let orig_x = (x - self.pad_x) / self.scale;
        let orig_y = (y - self.pad_y) / self.scale;
        (
            orig_x.clamp(0.0, self.original_width as f32),
            orig_y.clamp(0.0, self.original_height as f32),
        )
    }
}

fn scaled_size(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let new_w = ((width as f32 * scale).round() as u32).max(1);
    let new_h = ((height as f32 * scale).round() as u32).max(1);
    (new_w, new_h)
}

/// Resize with aspect ratio preservation and centre the result on a gray square
pub fn letterbox(image: &DynamicImage, target_size: u32) -> (RgbImage, Letterbox) {
    let (orig_w, orig_h) = image.dimensions();
    let geometry = Letterbox::new(orig_w, orig_h, target_size);

    let mut canvas = RgbImage::from_pixel(
        target_size,
        target_size,
        Rgb([PAD_VALUE, PAD_VALUE, PAD_VALUE]),
    );

    if orig_w == 0 || orig_h == 0 {
        return (canvas, geometry);
    }

    let (new_w, new_h) = scaled_size(orig_w, orig_h, geometry.scale);
    let resized = imageops::resize(&image.to_rgb8(), new_w, new_h, FilterType::Triangle);
    imageops::overlay(
        &mut canvas,
        &resized,
        geometry.pad_x as i64,
        geometry.pad_y as i64,
    );

    (canvas, geometry)
}

/// Convert an RGB raster to an NCHW tensor scaled to [0, 1]
pub fn to_nchw_tensor(rgb: &RgbImage) -> Array4<f32> {
    let (width, height) = rgb.dimensions();
    let mut tensor = Array4::zeros((1, 3, height as usize, width as usize));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    tensor
}

/// Letterbox and tensorize an image for YOLOv8 inference
///
/// Steps:
/// 1. Resize preserving aspect ratio to fit YOLO_INPUT_SIZE
/// 2. Pad to square with gray (114), image centred
/// 3. Scale pixels to [0, 1]
/// 4. Convert to NCHW tensor format [1, 3, 640, 640]
pub fn preprocess_for_yolo(image: &DynamicImage) -> (Array4<f32>, Letterbox) {
    let (canvas, geometry) = letterbox(image, YOLO_INPUT_SIZE);
    (to_nchw_tensor(&canvas), geometry)
}
