//! # Trueno-Cross
//!
//! SIMD-accelerated batched 3-vector cross product for spectral PDE solvers.
//!
//! Vector fields on a grid are stored as (3, N) Structure-of-Arrays buffers:
//! one contiguous row per component. `trueno-cross` evaluates the pointwise
//! cross product of two such fields into a caller-provided output, which is
//! the inner kernel behind curl, advection and Lorentz-force terms.
//!
//! ## Features
//!
//! - **Borrowed views**: no allocation or copying in the hot path
//! - **Hardware Acceleration**: runtime dispatch to AVX2 or NEON, scalar fallback
//! - **Bit-identical backends**: every path rounds exactly like the scalar loop
//! - **Checked and unchecked surfaces**: validated views, or raw pointers with
//!   debug-only assertions
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_cross::prelude::*;
//!
//! let a = VectorBuffer::from_columns(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
//! let b = VectorBuffer::from_columns(&[[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
//! let mut out = VectorBuffer::zeros(2);
//!
//! product(&a.view(), &b.view(), &mut out.view_mut())?;
//! assert_eq!(out.column(0), Some([0.0, 0.0, 1.0]));
//! assert_eq!(out.column(1), Some([1.0, 0.0, 0.0]));
//! # Ok::<(), trueno_cross::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: split the batch axis across the rayon thread pool

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// ============================================================================
// Core Modules
// ============================================================================

/// (3, N) buffer views and owned buffers.
pub mod layout;

/// SIMD backends and row-level kernels.
pub mod simd;

/// Batched cross product operations.
pub mod product;

// ============================================================================
// Configured Kernel
// ============================================================================

/// Kernel configuration and presets.
pub mod config;

/// Backend-resolved cross product kernel.
pub mod kernel;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-cross operations.
pub mod error;

pub use error::{Error, Result};
#[cfg(feature = "parallel")]
pub use product::par_product;
pub use product::{cross, cross_assign, product, product_unchecked};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and functions for convenient imports.
///
/// ```rust
/// use trueno_cross::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{BackendPreference, KernelConfig};
    pub use crate::error::{Error, Result};
    pub use crate::kernel::CrossProductKernel;
    pub use crate::layout::{VectorBatch, VectorBatchMut, VectorBuffer, ROWS};
    #[cfg(feature = "parallel")]
    pub use crate::product::par_product;
    pub use crate::product::{cross, cross_assign, product};
    pub use crate::simd::SimdBackend;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_round_trip() {
        let a = VectorBuffer::from_columns(&[[0.0, 0.0, 1.0]]);
        let b = VectorBuffer::from_columns(&[[1.0, 0.0, 0.0]]);
        // z x x = y
        let out = cross(&a.view(), &b.view()).unwrap();
        assert_eq!(out.column(0), Some([0.0, 1.0, 0.0]));
    }
}
