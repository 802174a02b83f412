// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

use crate::vision::ImageError;

/// Errors raised while analysing an uploaded photo
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The upload could not be decoded as a raster image
    #[error("Invalid image format")]
    InvalidImage(#[source] ImageError),

    #[error("Detection failed: {0:#}")]
    Detection(anyhow::Error),

    #[error("Failed to encode annotated image: {0}")]
    Encode(#[source] ImageError),
}

impl AnalysisError {
    /// Whether the caller, not the service, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalysisError::InvalidImage(_))
    }
}
