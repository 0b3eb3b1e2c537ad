//! Error type shared by all selection operations.

use thiserror::Error;

/// Errors produced by the selection engine.
///
/// Expected no-op cases (a click outside the image) never surface as errors;
/// only malformed input is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error(
        "dimension mismatch: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    DimensionMismatch {
        /// (width, height) of the reference buffer
        expected: (usize, usize),
        /// (width, height) of the offending buffer
        actual: (usize, usize),
    },

    #[error("polygon selection needs at least 3 points, got {got}")]
    InsufficientPoints { got: usize },

    #[error("no selection to apply: use a selection tool or place at least 3 points")]
    EmptySelection,

    #[error("unsupported channel count {0}: expected 3 (RGB) or 4 (RGBA)")]
    InvalidChannels(usize),

    #[error("invalid buffer shape: {0}")]
    InvalidShape(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "python")]
impl From<Error> for pyo3::PyErr {
    fn from(err: Error) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
