// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze response types

use serde::Serialize;

use crate::parking::AnalysisResult;

/// Successful analysis envelope
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub data: AnalysisResult,
}

impl AnalyzeResponse {
    pub fn new(data: AnalysisResult) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
