//! SIMD backends for the cross product kernels.
//!
//! ## Design Philosophy
//!
//! Each kernel has:
//! - A portable scalar path written over pre-sliced rows (auto-vectorizable)
//! - Hand-written intrinsic paths selected by runtime feature detection
//! - Zero-allocation hot loops
//!
//! All paths evaluate the same `a * b - c * d` expression tree without fused
//! multiply-add, so every backend produces bit-identical results.

pub mod kernels;

pub use kernels::{cross_rows, cross_rows_assign};

/// SIMD alignment constant (64 bytes for AVX-512 compatibility).
pub const SIMD_ALIGNMENT: usize = 64;

/// Backend selection for SIMD operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdBackend {
    /// Scalar fallback (no intrinsics).
    Scalar,
    /// AVX2 (256-bit, Haswell 2013+).
    Avx2,
    /// ARM NEON (128-bit).
    Neon,
}

impl SimdBackend {
    /// Detects the best available SIMD backend for the current platform.
    #[must_use]
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx2") {
                return Self::Avx2;
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            // NEON is mandatory on AArch64
            return Self::Neon;
        }

        Self::Scalar
    }

    /// Returns true if this backend can run on the current CPU.
    #[must_use]
    pub fn is_available(&self) -> bool {
        match self {
            Self::Scalar => true,
            #[cfg(target_arch = "x86_64")]
            Self::Avx2 => is_x86_feature_detected!("avx2"),
            #[cfg(target_arch = "aarch64")]
            Self::Neon => true,
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }

    /// Returns the register width in bits.
    #[must_use]
    pub const fn register_width_bits(&self) -> usize {
        match self {
            Self::Scalar => 64,
            Self::Neon => 128,
            Self::Avx2 => 256,
        }
    }

    /// Returns the number of f64 values processed per SIMD operation.
    #[must_use]
    pub const fn f64_lanes(&self) -> usize {
        self.register_width_bits() / 64
    }

    /// Short lowercase name, for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Avx2 => "avx2",
            Self::Neon => "neon",
        }
    }
}
