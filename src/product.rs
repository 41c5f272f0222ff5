//! Batched cross product over (3, N) buffers.
//!
//! [`product`] is the checked call surface: shapes are validated once and the
//! compute loop then runs without bounds checks. [`product_unchecked`] is the
//! raw-pointer surface for callers that validated their buffers already; its
//! preconditions are only asserted in debug builds.
#![allow(unsafe_code)]

use tracing::warn;

use crate::error::{Error, Result};
use crate::layout::{VectorBatch, VectorBatchMut, VectorBuffer};
use crate::simd::kernels::{self, RowPtrs, RowPtrsMut};
use crate::simd::SimdBackend;

fn check_shapes(expected: usize, others: &[usize]) -> Result<()> {
    if let Some(&found) = others.iter().find(|&&n| n != expected) {
        warn!(expected, found, "rejecting cross product with mismatched batch sizes");
        return Err(Error::ShapeMismatch { expected, found });
    }
    Ok(())
}

/// Computes `out[:, i] = data0[:, i] x data1[:, i]` for every column.
///
/// `N` is taken from `data0`. An empty batch is a no-op.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if `data1` or `out` has a different `N`.
///
/// # Example
///
/// ```
/// use trueno_cross::layout::{VectorBatch, VectorBatchMut};
/// use trueno_cross::product;
///
/// let x = [1.0, 0.0, 0.0];
/// let y = [0.0, 1.0, 0.0];
/// let mut z = [0.0; 3];
///
/// product(
///     &VectorBatch::from_rows(&x, 1)?,
///     &VectorBatch::from_rows(&y, 1)?,
///     &mut VectorBatchMut::from_rows(&mut z, 1)?,
/// )?;
/// assert_eq!(z, [0.0, 0.0, 1.0]);
/// # Ok::<(), trueno_cross::Error>(())
/// ```
pub fn product(data0: &VectorBatch<'_>, data1: &VectorBatch<'_>, out: &mut VectorBatchMut<'_>) -> Result<()> {
    product_with(SimdBackend::detect(), data0, data1, out)
}

pub(crate) fn product_with(
    backend: SimdBackend,
    data0: &VectorBatch<'_>,
    data1: &VectorBatch<'_>,
    out: &mut VectorBatchMut<'_>,
) -> Result<()> {
    check_shapes(data0.len(), &[data1.len(), out.len()])?;
    kernels::cross_rows(backend, data0.rows(), data1.rows(), out.rows_mut());
    Ok(())
}

/// In-place cross product: `lhs[:, i] = lhs[:, i] x rhs[:, i]`.
///
/// This is the aliasing pattern the out-of-place kernel cannot express
/// through borrowed views.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the batch sizes differ.
pub fn cross_assign(lhs: &mut VectorBatchMut<'_>, rhs: &VectorBatch<'_>) -> Result<()> {
    cross_assign_with(SimdBackend::detect(), lhs, rhs)
}

pub(crate) fn cross_assign_with(
    backend: SimdBackend,
    lhs: &mut VectorBatchMut<'_>,
    rhs: &VectorBatch<'_>,
) -> Result<()> {
    check_shapes(lhs.len(), &[rhs.len()])?;
    kernels::cross_rows_assign(backend, lhs.rows_mut(), rhs.rows());
    Ok(())
}

/// Allocates a new buffer holding `data0 x data1`.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the batch sizes differ.
pub fn cross(data0: &VectorBatch<'_>, data1: &VectorBatch<'_>) -> Result<VectorBuffer> {
    let mut out = VectorBuffer::zeros(data0.len());
    product(data0, data1, &mut out.view_mut())?;
    Ok(out)
}

/// Unchecked cross product over raw row-major (3, N) buffers.
///
/// Row `r` of each buffer starts at `ptr + r * row_stride`; the column axis is
/// unit-stride. With `n == 0` no memory is touched.
///
/// # Safety
///
/// - Each buffer must hold `2 * row_stride + n` valid doubles, and `row_stride >= n`
/// - `data0` and `data1` must be readable, `out` writable, for the whole call
/// - `out` may overlap an input only column-for-column (the same address
///   for the same row and column); any other overlap is undefined behavior
///
/// Debug builds assert the checkable preconditions; release builds skip them.
pub unsafe fn product_unchecked(
    data0: *const f64,
    data1: *const f64,
    out: *mut f64,
    n: usize,
    row_stride: usize,
) {
    if n == 0 {
        return;
    }
    debug_assert!(row_stride >= n, "row stride {row_stride} shorter than row length {n}");
    debug_assert!(!data0.is_null() && !data1.is_null() && !out.is_null(), "null buffer");
    debug_assert!(
        [data0 as usize, data1 as usize, out as usize]
            .iter()
            .all(|addr| addr % std::mem::align_of::<f64>() == 0),
        "misaligned buffer"
    );

    // SAFETY: forwarded to the caller's contract above
    unsafe {
        kernels::cross_raw(
            SimdBackend::detect(),
            RowPtrs::strided(data0, row_stride),
            RowPtrs::strided(data1, row_stride),
            RowPtrsMut::strided(out, row_stride),
            n,
        );
    }
}

/// Splits the N axis into chunks of `chunk_len` columns and computes them
/// on the rayon thread pool.
///
/// Chunks share no mutable state, so no synchronization happens between
/// them. Results are identical to [`product`].
///
/// # Errors
///
/// - [`Error::InvalidConfig`] if `chunk_len` is zero
/// - [`Error::ShapeMismatch`] if the batch sizes differ
#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
pub fn par_product(
    data0: &VectorBatch<'_>,
    data1: &VectorBatch<'_>,
    out: &mut VectorBatchMut<'_>,
    chunk_len: usize,
) -> Result<()> {
    par_product_with(SimdBackend::detect(), data0, data1, out, chunk_len)
}

#[cfg(feature = "parallel")]
pub(crate) fn par_product_with(
    backend: SimdBackend,
    data0: &VectorBatch<'_>,
    data1: &VectorBatch<'_>,
    out: &mut VectorBatchMut<'_>,
    chunk_len: usize,
) -> Result<()> {
    use rayon::prelude::*;

    if chunk_len == 0 {
        return Err(Error::InvalidConfig("chunk_len must be > 0".to_string()));
    }
    check_shapes(data0.len(), &[data1.len(), out.len()])?;

    let [ax, ay, az] = data0.rows();
    let [bx, by, bz] = data1.rows();
    let [ox, oy, oz] = out.rows_mut();

    let lhs = ax.par_chunks(chunk_len).zip(ay.par_chunks(chunk_len)).zip(az.par_chunks(chunk_len));
    let rhs = bx.par_chunks(chunk_len).zip(by.par_chunks(chunk_len)).zip(bz.par_chunks(chunk_len));
    let dst = ox
        .par_chunks_mut(chunk_len)
        .zip(oy.par_chunks_mut(chunk_len))
        .zip(oz.par_chunks_mut(chunk_len));

    lhs.zip(rhs).zip(dst).for_each(|((((a0, a1), a2), ((b0, b1), b2)), ((o0, o1), o2))| {
        kernels::cross_rows(backend, [a0, a1, a2], [b0, b1, b2], [o0, o1, o2]);
    });
    Ok(())
}


// ============================================================================
// Property-based tests with proptest
// ============================================================================
