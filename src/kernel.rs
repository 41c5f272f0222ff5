//! Configured cross product kernel.
//!
//! [`CrossProductKernel`] resolves its backend once at construction and then
//! routes every call to the serial or (with the `parallel` feature) the
//! chunked parallel path.

use tracing::debug;

use crate::config::{BackendPreference, KernelConfig};
use crate::error::Result;
use crate::layout::{VectorBatch, VectorBatchMut};
use crate::product;
use crate::simd::SimdBackend;

/// Column-wise 3-vector cross product with a fixed backend and policy.
#[derive(Debug, Clone)]
pub struct CrossProductKernel {
    config: KernelConfig,
    backend: SimdBackend,
}

impl CrossProductKernel {
    /// Creates a kernel from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// configuration does not validate.
    ///
    /// # Example
    ///
    /// ```
    /// use trueno_cross::prelude::*;
    ///
    /// let kernel = CrossProductKernel::new(KernelConfig::scalar())?;
    /// assert_eq!(kernel.backend(), SimdBackend::Scalar);
    /// # Ok::<(), trueno_cross::Error>(())
    /// ```
    pub fn new(config: KernelConfig) -> Result<Self> {
        config.validate()?;
        let backend = resolve_backend(&config);
        Ok(Self { config, backend })
    }

    /// The resolved backend.
    #[must_use]
    pub const fn backend(&self) -> SimdBackend {
        self.backend
    }

    /// The configuration this kernel was built from.
    #[must_use]
    pub const fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Returns true if a batch of `n` columns takes the parallel path.
    #[must_use]
    pub fn is_parallel_for(&self, n: usize) -> bool {
        cfg!(feature = "parallel") && n >= self.config.parallel_threshold
    }

    /// Computes `out = data0 x data1` column-wise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`](crate::Error::ShapeMismatch) if the
    /// batch sizes differ.
    pub fn apply(
        &self,
        data0: &VectorBatch<'_>,
        data1: &VectorBatch<'_>,
        out: &mut VectorBatchMut<'_>,
    ) -> Result<()> {
        #[cfg(feature = "parallel")]
        {
            if self.is_parallel_for(data0.len()) {
                return product::par_product_with(self.backend, data0, data1, out, self.config.chunk_len);
            }
        }
        product::product_with(self.backend, data0, data1, out)
    }

    /// Computes `lhs = lhs x rhs` column-wise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`](crate::Error::ShapeMismatch) if the
    /// batch sizes differ.
    pub fn apply_assign(&self, lhs: &mut VectorBatchMut<'_>, rhs: &VectorBatch<'_>) -> Result<()> {
        product::cross_assign_with(self.backend, lhs, rhs)
    }
}

impl Default for CrossProductKernel {
    fn default() -> Self {
        let config = KernelConfig::default();
        Self { backend: resolve_backend(&config), config }
    }
}

fn resolve_backend(config: &KernelConfig) -> SimdBackend {
    let backend = match config.backend {
        BackendPreference::Auto => SimdBackend::detect(),
        BackendPreference::Scalar => SimdBackend::Scalar,
    };
    debug!(
        backend = backend.name(),
        lanes = backend.f64_lanes(),
        parallel = cfg!(feature = "parallel"),
        parallel_threshold = config.parallel_threshold,
        chunk_len = config.chunk_len,
        "resolved cross product kernel"
    );
    backend
}
