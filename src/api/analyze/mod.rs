// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze API endpoint module
//!
//! Provides POST /analyze for counting vehicles in an uploaded photo.

pub mod handler;
pub mod response;

pub use handler::analyze_handler;
pub use response::AnalyzeResponse;
