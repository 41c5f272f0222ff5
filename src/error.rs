//! Error types for trueno-cross operations.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the checked entry points.
///
/// The unchecked kernel never produces these; violating its preconditions is
/// undefined behavior instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Batch sizes of the participating buffers differ.
    #[error("Shape mismatch: expected (3, {expected}), found (3, {found})")]
    ShapeMismatch {
        /// Column count of the first input.
        expected: usize,
        /// Column count of the offending buffer.
        found: usize,
    },

    /// Backing storage cannot hold the requested layout.
    #[error("Buffer too small: layout needs {required} elements, buffer has {actual}")]
    BufferTooSmall {
        /// Elements addressed by the layout.
        required: usize,
        /// Elements available in the backing slice.
        actual: usize,
    },

    /// The column axis is not unit-stride.
    #[error("Non-contiguous column axis: column stride {col_stride}, expected 1")]
    NonContiguous {
        /// Column stride that was requested.
        col_stride: usize,
    },

    /// Row stride is shorter than a row, so rows would overlap.
    #[error("Overlapping rows: row stride {row_stride} < row length {len}")]
    OverlappingRows {
        /// Row stride that was requested.
        row_stride: usize,
        /// Row length (batch size).
        len: usize,
    },

    /// Invalid kernel configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
