// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

/// Relative tolerance used when comparing solved coordinates.
pub const COORD_TOLERANCE: f64 = 1e-9;

/// Check if two floats are approximately equal, relative to their magnitude
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= epsilon * a.abs().max(b.abs()).max(1.0)
}

/// Normalize an angle in degrees to `[0, 360)`
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Round to a fixed number of decimals, folding negative zero into zero
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Default facet count for a round shape of the given diameter
pub fn segments_for_diameter(diameter: f64) -> u32 {
    (diameter * 3.14 / 0.4).max(0.0) as u32
}

/// Default facet count for a rotational extrusion sweeping `angle` degrees
pub fn segments_for_angle(angle: f64) -> u32 {
    (angle.abs() / 3.14 * 0.4) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0 + 1e-12, COORD_TOLERANCE));
        assert!(!approx_eq(1.0, 1.1, COORD_TOLERANCE));
        assert!(approx_eq(1e12, 1e12 + 1.0, COORD_TOLERANCE));
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(810.0), 90.0);
        assert_eq!(normalize_angle(-450.0), 270.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(24.019999999, 4), 24.02);
        assert_eq!(round_to(-0.00001, 4), 0.0);
        assert!(round_to(-0.00001, 4).is_sign_positive());
        assert_eq!(round_to(1.23456, 2), 1.23);
    }

    #[test]
    fn test_default_segments() {
        assert_eq!(segments_for_diameter(10.0), 78);
        assert_eq!(segments_for_diameter(4.0), 31);
        assert_eq!(segments_for_angle(360.0), 45);
    }
}
