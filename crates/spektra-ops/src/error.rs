//! Error types for adjustment operations.

use thiserror::Error;

/// Error type for adjustment operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Source and destination buffers have different sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An adjustment field lies outside [-100, 100] or is not a number.
    #[error("adjustment '{field}' = {value} is outside [-100, 100]")]
    OutOfRange {
        /// Field name, e.g. `"exposure"`.
        field: &'static str,
        /// Offending value.
        value: f32,
    },

    /// Pixel buffer error.
    #[error(transparent)]
    Core(#[from] spektra_core::Error),

    /// Preset could not be parsed.
    #[cfg(feature = "serde")]
    #[error("preset error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for adjustment operations.
pub type OpsResult<T> = Result<T, OpsError>;
