//! # Error Types
//!
//! This module defines error types used throughout the etiqueta library.
//!
//! The first three variants are produced by the encoding pipeline and are
//! terminal for the request: the pipeline is deterministic, so retrying the
//! same input can never succeed. The remaining variants belong to the layers
//! around the pipeline (request validation, rendering, decoding, I/O).

use thiserror::Error;

/// Main error type for etiqueta operations
#[derive(Debug, Error)]
pub enum EtiquetaError {
    /// Non-positive geometry, or a length that rounds to zero dots
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Image could not be decoded, or its size differs from the requested one
    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    /// Byte count declared in the BITMAP header disagrees with the payload
    #[error("Encoding mismatch: header declares {declared} bitmap bytes, payload has {actual}")]
    EncodingMismatch { declared: usize, actual: usize },

    /// Print request failed field validation
    #[error("{0}")]
    Validation(String),

    /// The label renderer could not produce an image
    #[error("Render failed: {0}")]
    Render(String),

    /// A TSPL stream could not be parsed back into commands
    #[error("Decode failed: {0}")]
    Decode(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EtiquetaError {
    /// Stable error code reported to HTTP clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDimensions(_) => "INVALID_DIMENSIONS",
            Self::ConversionFailed(_) => "CONVERSION_FAILED",
            Self::EncodingMismatch { .. } => "ENCODING_MISMATCH",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Render(_) => "RENDER_FAILED",
            Self::Decode(_) => "DECODE_FAILED",
            Self::Io(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidDimensions(_))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, EtiquetaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            EtiquetaError::InvalidDimensions("x".into()).code(),
            "INVALID_DIMENSIONS"
        );
        assert_eq!(
            EtiquetaError::ConversionFailed("x".into()).code(),
            "CONVERSION_FAILED"
        );
        assert_eq!(
            EtiquetaError::EncodingMismatch {
                declared: 100,
                actual: 99
            }
            .code(),
            "ENCODING_MISMATCH"
        );
        assert_eq!(EtiquetaError::Validation("x".into()).code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_mismatch_message() {
        let err = EtiquetaError::EncodingMismatch {
            declared: 100,
            actual: 99,
        };
        assert_eq!(
            err.to_string(),
            "Encoding mismatch: header declares 100 bitmap bytes, payload has 99"
        );
    }

    #[test]
    fn test_client_errors() {
        assert!(EtiquetaError::Validation("x".into()).is_client_error());
        assert!(EtiquetaError::InvalidDimensions("x".into()).is_client_error());
        assert!(!EtiquetaError::Render("x".into()).is_client_error());
    }
}
