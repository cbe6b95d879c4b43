//! Error types for the data tile services.

use thiserror::Error;

/// Result type alias using TileError.
pub type TileResult<T> = Result<T, TileError>;

/// Primary error type for tile resolution and pixel reduction.
#[derive(Debug, Error)]
pub enum TileError {
    // === Request Errors ===
    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Upstream Errors ===
    #[error("Failed to fetch tile image: {0}")]
    ImageFetchFailed(String),

    #[error("Failed to decode tile image: {0}")]
    ImageDecodeFailed(String),

    // === Reduction Errors ===
    #[error("Unsupported image mode: {0}")]
    UnsupportedImageMode(String),

    #[error("Image too small: {width}x{height}, need at least {required}x{required}")]
    ImageTooSmall {
        width: u32,
        height: u32,
        required: u32,
    },

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl TileError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            TileError::UnknownLayer(_) => "UnknownLayer",
            TileError::InvalidParameter { .. } => "InvalidParameterValue",
            TileError::ImageFetchFailed(_) => "ImageFetchFailed",
            TileError::ImageDecodeFailed(_) => "ImageDecodeFailed",
            TileError::UnsupportedImageMode(_) => "UnsupportedImageMode",
            TileError::ImageTooSmall { .. } => "ImageTooSmall",
            TileError::Internal(_) => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            TileError::InvalidParameter { .. } => 400,

            TileError::UnknownLayer(_) => 404,

            TileError::ImageFetchFailed(_) => 502,

            TileError::ImageDecodeFailed(_)
            | TileError::UnsupportedImageMode(_)
            | TileError::ImageTooSmall { .. } => 422,

            TileError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(TileError::UnknownLayer("x".into()).http_status_code(), 404);
        assert_eq!(
            TileError::ImageFetchFailed("503 from host".into()).http_status_code(),
            502
        );
        assert_eq!(
            TileError::ImageTooSmall {
                width: 16,
                height: 16,
                required: 32
            }
            .http_status_code(),
            422
        );
    }

    #[test]
    fn test_error_message_names_dimensions() {
        let err = TileError::ImageTooSmall {
            width: 31,
            height: 40,
            required: 32,
        };
        assert_eq!(
            err.to_string(),
            "Image too small: 31x40, need at least 32x32"
        );
        assert_eq!(err.error_code(), "ImageTooSmall");
    }
}
