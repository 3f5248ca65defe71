//! Feature Builder Error Types

use thiserror::Error;

/// Errors during feature building
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    /// Timestamp field does not match the expected layout
    #[error("{field} value '{value}' is not a valid YYYY-MM-DD HH:MM:SS timestamp")]
    Format { field: &'static str, value: String },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
