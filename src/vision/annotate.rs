// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounding box and label rendering for annotated output images
//!
//! Labels use a built-in 5x7 bitmap glyph set so no font file has to ship
//! with the service. Only the characters used by detection labels are
//! defined; anything else renders as a blank cell.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

/// Box and label colour (green)
pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Box outline thickness in pixels
pub const BOX_THICKNESS: i32 = 2;

/// Gap between the label's bottom edge and the box's top edge
pub const LABEL_OFFSET: i32 = 10;

/// Pixel size of one glyph dot
pub const GLYPH_SCALE: u32 = 2;

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// A box to draw, in image pixel coordinates, with its caption
#[derive(Debug, Clone)]
pub struct Annotation {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub label: String,
}

/// Draw every annotation onto the image in place
pub fn draw_annotations(image: &mut RgbImage, annotations: &[Annotation]) {
    for annotation in annotations {
        draw_box(
            image,
            annotation.x1,
            annotation.y1,
            annotation.x2,
            annotation.y2,
            BOX_COLOR,
        );
        let label_top = annotation.y1 - LABEL_OFFSET - label_height() as i32;
        draw_label(image, annotation.x1, label_top.max(0), &annotation.label, BOX_COLOR);
    }
}

/// Draw a hollow rectangle `BOX_THICKNESS` pixels thick
///
/// Degenerate boxes are widened to one pixel; anything outside the image is
/// clipped.
pub fn draw_box(image: &mut RgbImage, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb<u8>) {
    let width = (x2 - x1).max(1);
    let height = (y2 - y1).max(1);

    for inset in 0..BOX_THICKNESS {
        let w = width - 2 * inset;
        let h = height - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }
        let rect = Rect::at(x1 + inset, y1 + inset).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(image, rect, color);
    }
}

/// Render `text` with its top-left corner at (x, y)
pub fn draw_label(image: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
    let advance = ((GLYPH_WIDTH + 1) * GLYPH_SCALE) as i32;

    for (index, ch) in text.chars().enumerate() {
        let origin_x = x + index as i32 * advance;
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let dot = Rect::at(
                    origin_x + (col * GLYPH_SCALE) as i32,
                    y + (row as u32 * GLYPH_SCALE) as i32,
                )
                .of_size(GLYPH_SCALE, GLYPH_SCALE);
                draw_filled_rect_mut(image, dot, color);
            }
        }
    }
}

/// Rendered label height in pixels
pub fn label_height() -> u32 {
    GLYPH_HEIGHT * GLYPH_SCALE
}

/// Rendered width of `text` in pixels
pub fn label_width(text: &str) -> u32 {
    let count = text.chars().count() as u32;
    if count == 0 {
        return 0;
    }
    count * (GLYPH_WIDTH + 1) * GLYPH_SCALE - GLYPH_SCALE
}

fn glyph(ch: char) -> [u8; 7] {
    match ch {
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'e' => [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        'h' => [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        'i' => [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110],
        'c' => [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110],
        'l' => [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        _ => [0; 7],
    }
}
