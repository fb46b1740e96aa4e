//! Error types for field generation and preview export.

use thiserror::Error;

/// Errors returned while validating parameters, generating a field, or
/// exporting a preview.
///
/// Per-frame updates never fail; every error surfaces at generation time.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A parameter is outside the range the generator can work with.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the config file.
        name: &'static str,
        /// Human-readable description of the constraint that failed.
        reason: String,
    },

    /// A color string could not be parsed.
    #[error("invalid color {0:?}: expected #rrggbb or #rgb")]
    InvalidColor(String),

    /// Index-aligned attribute sequences have different lengths.
    #[error("attribute length mismatch: {positions} positions, {colors} colors, {sizes} sizes")]
    LengthMismatch {
        /// Number of positions supplied.
        positions: usize,
        /// Number of colors supplied.
        colors: usize,
        /// Number of sizes supplied.
        sizes: usize,
    },

    /// Replacement positions do not match the vertices they update.
    #[error("position count mismatch: {positions} positions for {vertices} vertices")]
    PositionMismatch {
        /// Number of vertices being updated.
        vertices: usize,
        /// Number of positions supplied.
        positions: usize,
    },

    /// Failed to encode or write a preview image.
    #[error("preview export failed: {0}")]
    Image(#[from] image::ImageError),
}

impl FieldError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message_names_field() {
        let err = FieldError::invalid("radius", "must be finite");
        assert_eq!(err.to_string(), "invalid parameter `radius`: must be finite");
    }

    #[test]
    fn test_length_mismatch_message() {
        let err = FieldError::LengthMismatch {
            positions: 3,
            colors: 2,
            sizes: 3,
        };
        assert!(err.to_string().contains("3 positions, 2 colors"));
    }

    #[test]
    fn test_position_mismatch_message() {
        let err = FieldError::PositionMismatch {
            vertices: 4,
            positions: 3,
        };
        assert_eq!(
            err.to_string(),
            "position count mismatch: 3 positions for 4 vertices"
        );
    }
}
