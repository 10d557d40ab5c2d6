//! Error taxonomy for measurement, encoding and drawing failures.
//!
//! A budget of zero or less is not an error: truncation yields an empty string.

use thiserror::Error;

/// Errors reported by the layout engine and the label controls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabelError {
    /// The font backend could not measure (or lay out) a string.
    /// Derived state is left untouched when this is returned.
    #[error("font measurement unavailable: {0}")]
    MeasurementUnavailable(String),
    /// Text supplied as bytes was not valid UTF-8.
    #[error("text is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidEncoding { valid_up_to: usize },
    /// The drawing backend rejected a draw command.
    #[error("draw failed: {0}")]
    Draw(String),
}

impl From<std::str::Utf8Error> for LabelError {
    fn from(e: std::str::Utf8Error) -> Self {
        LabelError::InvalidEncoding {
            valid_up_to: e.valid_up_to(),
        }
    }
}

/// Result alias used throughout the layout engine.
pub type Result<T> = std::result::Result<T, LabelError>;
