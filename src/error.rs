// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for tree construction, bounding-box queries and rendering

use thiserror::Error;

/// Errors raised while building, measuring or rendering a model tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A transform whose bounding box has no exact closed form.
    #[error("Unsupported transform: {0}")]
    UnsupportedTransform(String),

    /// Fewer than two of from/center/to/distance were supplied.
    #[error("Insufficient parameters: at least two of from, center, to, distance are required")]
    InsufficientParameters,

    /// A supplied coordinate disagrees with the solved value.
    #[error(
        "Inconsistent coordinate: calculated {field} incompatible with specified {field} \
         (specified: {specified}, calculated: {calculated})"
    )]
    InconsistentCoordinate {
        field: &'static str,
        specified: f64,
        calculated: f64,
    },

    /// A composite with nothing to render or measure.
    #[error("Empty composite: {0} has no children")]
    EmptyComposite(String),

    /// Two operands that cannot be combined.
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    /// An argument outside the accepted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An extremum that cannot be known without evaluating geometry.
    #[error("Undefined extent: {0}")]
    UndefinedExtent(String),
}

/// Result alias used throughout the modeling core.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::InconsistentCoordinate {
            field: "center",
            specified: 4.0,
            calculated: 5.0,
        };
        let message = err.to_string();
        assert!(message.contains("center"));
        assert!(message.contains("specified: 4"));
        assert!(message.contains("calculated: 5"));

        let err = ModelError::UnsupportedTransform("rotate(a=[45, 0, 0])".to_string());
        assert!(err.to_string().starts_with("Unsupported transform"));
    }
}
