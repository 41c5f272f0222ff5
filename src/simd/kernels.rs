//! Row-level cross product kernels.
//!
//! # Safety
//!
//! This module uses `unsafe` for SIMD intrinsics and raw row pointers, which
//! are sound when:
//! - Target CPU features are detected at runtime before use
//! - Every row pointer addresses at least `n` readable (or writable) doubles
//!
//! The safe entry points check row lengths once up front; the loops below
//! never check bounds.
#![allow(unsafe_code)]

//! For every column `i`:
//! ```text
//! out.x[i] = a.y[i] * b.z[i] - a.z[i] * b.y[i]
//! out.y[i] = a.z[i] * b.x[i] - a.x[i] * b.z[i]
//! out.z[i] = a.x[i] * b.y[i] - a.y[i] * b.x[i]
//! ```
//!
//! Columns are independent. Each column (or SIMD group of columns) reads all
//! six inputs before writing any output, so `out` may alias `a` or `b`
//! column-for-column.

use super::SimdBackend;
use crate::layout::ROWS;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

/// Base pointers of the three input rows.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowPtrs {
    x: *const f64,
    y: *const f64,
    z: *const f64,
}

impl RowPtrs {
    /// Row pointers of a strided buffer starting at `base`.
    ///
    /// # Safety
    ///
    /// `base + 2 * row_stride` must stay inside the allocation.
    pub(crate) unsafe fn strided(base: *const f64, row_stride: usize) -> Self {
        Self { x: base, y: base.add(row_stride), z: base.add(2 * row_stride) }
    }

    fn from_rows(rows: &[&[f64]; ROWS]) -> Self {
        Self { x: rows[0].as_ptr(), y: rows[1].as_ptr(), z: rows[2].as_ptr() }
    }

    #[inline]
    unsafe fn offset(self, i: usize) -> Self {
        Self { x: self.x.add(i), y: self.y.add(i), z: self.z.add(i) }
    }
}

/// Base pointers of the three output rows.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowPtrsMut {
    x: *mut f64,
    y: *mut f64,
    z: *mut f64,
}

impl RowPtrsMut {
    /// Row pointers of a strided buffer starting at `base`.
    ///
    /// # Safety
    ///
    /// `base + 2 * row_stride` must stay inside the allocation.
    pub(crate) unsafe fn strided(base: *mut f64, row_stride: usize) -> Self {
        Self { x: base, y: base.add(row_stride), z: base.add(2 * row_stride) }
    }

    fn from_rows(rows: &mut [&mut [f64]; ROWS]) -> Self {
        Self { x: rows[0].as_mut_ptr(), y: rows[1].as_mut_ptr(), z: rows[2].as_mut_ptr() }
    }

    #[inline]
    fn as_const(self) -> RowPtrs {
        RowPtrs { x: self.x, y: self.y, z: self.z }
    }

    #[inline]
    unsafe fn offset(self, i: usize) -> Self {
        Self { x: self.x.add(i), y: self.y.add(i), z: self.z.add(i) }
    }
}

// ============================================================================
// Safe Entry Points
// ============================================================================

/// Computes `out[:, i] = a[:, i] x b[:, i]` over three row triples.
///
/// All nine rows must have the same length; `backend` is a hint and falls
/// back to scalar when the CPU lacks the feature.
///
/// # Panics
///
/// Panics if the row lengths differ.
///
/// # Example
///
/// ```
/// use trueno_cross::simd::{cross_rows, SimdBackend};
///
/// let mut out = [[0.0; 1]; 3];
/// let [ox, oy, oz] = &mut out;
/// cross_rows(
///     SimdBackend::detect(),
///     [&[1.0], &[0.0], &[0.0]],
///     [&[0.0], &[1.0], &[0.0]],
///     [ox, oy, oz],
/// );
/// assert_eq!(out, [[0.0], [0.0], [1.0]]);
/// ```
pub fn cross_rows(backend: SimdBackend, a: [&[f64]; ROWS], b: [&[f64]; ROWS], out: [&mut [f64]; ROWS]) {
    let n = out[0].len();
    assert!(
        a.iter().chain(&b).all(|r| r.len() == n) && out.iter().all(|r| r.len() == n),
        "cross_rows: all rows must have length {n}"
    );

    let mut out = out;
    match backend {
        #[cfg(target_arch = "x86_64")]
        SimdBackend::Avx2 if is_x86_feature_detected!("avx2") => {
            // SAFETY: AVX2 detected; every row holds exactly n doubles
            unsafe {
                cross_avx2(RowPtrs::from_rows(&a), RowPtrs::from_rows(&b), RowPtrsMut::from_rows(&mut out), n);
            }
        }
        #[cfg(target_arch = "aarch64")]
        SimdBackend::Neon => {
            // SAFETY: NEON is mandatory on aarch64; every row holds exactly n doubles
            unsafe {
                cross_neon(RowPtrs::from_rows(&a), RowPtrs::from_rows(&b), RowPtrsMut::from_rows(&mut out), n);
            }
        }
        _ => cross_scalar(a, b, out),
    }
}

/// In-place variant: `a[:, i] = a[:, i] x b[:, i]`.
///
/// # Panics
///
/// Panics if the row lengths differ.
pub fn cross_rows_assign(backend: SimdBackend, a: [&mut [f64]; ROWS], b: [&[f64]; ROWS]) {
    let n = a[0].len();
    assert!(
        a.iter().all(|r| r.len() == n) && b.iter().all(|r| r.len() == n),
        "cross_rows_assign: all rows must have length {n}"
    );

    let mut a = a;
    match backend {
        #[cfg(target_arch = "x86_64")]
        SimdBackend::Avx2 if is_x86_feature_detected!("avx2") => {
            let lhs = RowPtrsMut::from_rows(&mut a);
            // SAFETY: AVX2 detected; lhs is read and written through one
            // set of raw pointers, each group loads before it stores
            unsafe {
                cross_avx2(lhs.as_const(), RowPtrs::from_rows(&b), lhs, n);
            }
        }
        #[cfg(target_arch = "aarch64")]
        SimdBackend::Neon => {
            let lhs = RowPtrsMut::from_rows(&mut a);
            // SAFETY: as above
            unsafe {
                cross_neon(lhs.as_const(), RowPtrs::from_rows(&b), lhs, n);
            }
        }
        _ => cross_scalar_assign(a, b),
    }
}

// ============================================================================
// Raw Dispatch (unchecked path)
// ============================================================================

/// Dispatches over raw row pointers.
///
/// # Safety
///
/// Each pointer must address `n` valid doubles. `out` may alias `a` or `b`
/// only column-for-column (same row, same index).
pub(crate) unsafe fn cross_raw(backend: SimdBackend, a: RowPtrs, b: RowPtrs, out: RowPtrsMut, n: usize) {
    match backend {
        #[cfg(target_arch = "x86_64")]
        SimdBackend::Avx2 if is_x86_feature_detected!("avx2") => cross_avx2(a, b, out, n),
        #[cfg(target_arch = "aarch64")]
        SimdBackend::Neon => cross_neon(a, b, out, n),
        _ => cross_scalar_raw(a, b, out, n),
    }
}

// ============================================================================
// Scalar Paths
// ============================================================================

fn cross_scalar(a: [&[f64]; ROWS], b: [&[f64]; ROWS], out: [&mut [f64]; ROWS]) {
    let [ax, ay, az] = a;
    let [bx, by, bz] = b;
    let [ox, oy, oz] = out;

    let lhs = ax.iter().zip(ay).zip(az);
    let rhs = bx.iter().zip(by).zip(bz);
    let dst = ox.iter_mut().zip(oy.iter_mut()).zip(oz.iter_mut());

    for ((((a0, a1), a2), ((b0, b1), b2)), ((o0, o1), o2)) in lhs.zip(rhs).zip(dst) {
        *o0 = a1 * b2 - a2 * b1;
        *o1 = a2 * b0 - a0 * b2;
        *o2 = a0 * b1 - a1 * b0;
    }
}

fn cross_scalar_assign(a: [&mut [f64]; ROWS], b: [&[f64]; ROWS]) {
    let [ax, ay, az] = a;
    let [bx, by, bz] = b;

    let lhs = ax.iter_mut().zip(ay.iter_mut()).zip(az.iter_mut());
    let rhs = bx.iter().zip(by).zip(bz);

    for (((x, y), z), ((b0, b1), b2)) in lhs.zip(rhs) {
        let (a0, a1, a2) = (*x, *y, *z);
        *x = a1 * b2 - a2 * b1;
        *y = a2 * b0 - a0 * b2;
        *z = a0 * b1 - a1 * b0;
    }
}

/// Scalar loop over raw pointers; also handles SIMD remainders.
unsafe fn cross_scalar_raw(a: RowPtrs, b: RowPtrs, out: RowPtrsMut, n: usize) {
    for i in 0..n {
        let (a0, a1, a2) = (a.x.add(i).read(), a.y.add(i).read(), a.z.add(i).read());
        let (b0, b1, b2) = (b.x.add(i).read(), b.y.add(i).read(), b.z.add(i).read());
        out.x.add(i).write(a1 * b2 - a2 * b1);
        out.y.add(i).write(a2 * b0 - a0 * b2);
        out.z.add(i).write(a0 * b1 - a1 * b0);
    }
}

// ============================================================================
// Intrinsic Paths
// ============================================================================

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn cross_avx2(a: RowPtrs, b: RowPtrs, out: RowPtrsMut, n: usize) {
    let mut i = 0;

    // Process 4 columns at a time (256 bits)
    while i + 4 <= n {
        let a0 = _mm256_loadu_pd(a.x.add(i));
        let a1 = _mm256_loadu_pd(a.y.add(i));
        let a2 = _mm256_loadu_pd(a.z.add(i));
        let b0 = _mm256_loadu_pd(b.x.add(i));
        let b1 = _mm256_loadu_pd(b.y.add(i));
        let b2 = _mm256_loadu_pd(b.z.add(i));

        let o0 = _mm256_sub_pd(_mm256_mul_pd(a1, b2), _mm256_mul_pd(a2, b1));
        let o1 = _mm256_sub_pd(_mm256_mul_pd(a2, b0), _mm256_mul_pd(a0, b2));
        let o2 = _mm256_sub_pd(_mm256_mul_pd(a0, b1), _mm256_mul_pd(a1, b0));

        _mm256_storeu_pd(out.x.add(i), o0);
        _mm256_storeu_pd(out.y.add(i), o1);
        _mm256_storeu_pd(out.z.add(i), o2);
        i += 4;
    }

    // Handle remainder
    cross_scalar_raw(a.offset(i), b.offset(i), out.offset(i), n - i);
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn cross_neon(a: RowPtrs, b: RowPtrs, out: RowPtrsMut, n: usize) {
    let mut i = 0;

    // Process 2 columns at a time (128 bits)
    while i + 2 <= n {
        let a0 = vld1q_f64(a.x.add(i));
        let a1 = vld1q_f64(a.y.add(i));
        let a2 = vld1q_f64(a.z.add(i));
        let b0 = vld1q_f64(b.x.add(i));
        let b1 = vld1q_f64(b.y.add(i));
        let b2 = vld1q_f64(b.z.add(i));

        let o0 = vsubq_f64(vmulq_f64(a1, b2), vmulq_f64(a2, b1));
        let o1 = vsubq_f64(vmulq_f64(a2, b0), vmulq_f64(a0, b2));
        let o2 = vsubq_f64(vmulq_f64(a0, b1), vmulq_f64(a1, b0));

        vst1q_f64(out.x.add(i), o0);
        vst1q_f64(out.y.add(i), o1);
        vst1q_f64(out.z.add(i), o2);
        i += 2;
    }

    cross_scalar_raw(a.offset(i), b.offset(i), out.offset(i), n - i);
}
