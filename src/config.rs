//! Configuration and presets for the cross product kernel.
//!
//! # Presets
//!
//! - [`KernelConfig::default()`] - detected SIMD backend, parallel above 64Ki columns
//! - [`KernelConfig::scalar()`] - portable scalar path, never parallel
//!
//! # Example
//!
//! ```
//! use trueno_cross::config::{BackendPreference, KernelConfig};
//!
//! let config = KernelConfig::default()
//!     .with_backend(BackendPreference::Scalar)
//!     .with_chunk_len(4096);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{Error, Result};

/// Which compute path the kernel should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// Best backend detected at runtime.
    #[default]
    Auto,
    /// Portable scalar loop.
    Scalar,
}

/// Configuration for [`CrossProductKernel`](crate::kernel::CrossProductKernel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelConfig {
    /// Backend selection.
    pub backend: BackendPreference,

    /// Batch size at and above which the N axis is split across threads.
    /// Only honored with the `parallel` feature.
    pub parallel_threshold: usize,

    /// Columns per parallel work item.
    pub chunk_len: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self { backend: BackendPreference::Auto, parallel_threshold: 1 << 16, chunk_len: 8192 }
    }
}

impl KernelConfig {
    /// Scalar-only, single-threaded configuration.
    #[must_use]
    pub fn scalar() -> Self {
        Self { backend: BackendPreference::Scalar, parallel_threshold: usize::MAX, ..Self::default() }
    }

    /// Sets the backend preference.
    #[must_use]
    pub const fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the parallel threshold.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the parallel chunk length.
    #[must_use]
    pub const fn with_chunk_len(mut self, chunk_len: usize) -> Self {
        self.chunk_len = chunk_len;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `chunk_len` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_len == 0 {
            return Err(Error::InvalidConfig("chunk_len must be > 0".to_string()));
        }
        Ok(())
    }
}
