// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Occupancy estimate
//!
//! There is no per-lot calibration: total capacity is a placeholder of
//! `max(10, vehicles + 3)`, kept stable for API compatibility.

/// Lower bound on the estimated number of spots
pub const MIN_TOTAL_SPOTS: usize = 10;

/// Spots assumed free beyond the detected vehicles
pub const SPOT_HEADROOM: usize = 3;

/// Estimated total spots for a photo containing `vehicle_count` vehicles
pub fn estimate_total_spots(vehicle_count: usize) -> usize {
    MIN_TOTAL_SPOTS.max(vehicle_count.saturating_add(SPOT_HEADROOM))
}

/// Free spots, never negative
pub fn vacant_spots(total_spots: usize, vehicle_count: usize) -> usize {
    total_spots.saturating_sub(vehicle_count)
}
