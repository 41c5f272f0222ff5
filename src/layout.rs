//! Vector batch buffers in a fixed 3-row Structure-of-Arrays layout.
//!
//! ## Layout
//!
//! A batch of N 3-vectors is stored as three rows of N doubles each:
//! ```text
//! row 0 (x): [v0.x, v1.x, v2.x, ...]   <- base
//! row 1 (y): [v0.y, v1.y, v2.y, ...]   <- base + row_stride
//! row 2 (z): [v0.z, v1.z, v2.z, ...]   <- base + 2 * row_stride
//! ```
//!
//! The column axis is unit-stride; rows may be separated by padding
//! (`row_stride >= N`). Views carry the full `(base, row_stride, col_stride,
//! extents)` tuple and validate it once at construction, so the compute
//! loops can run over pre-sliced rows without per-element bounds checks.

use crate::error::{Error, Result};
use crate::simd::SIMD_ALIGNMENT;

/// Fixed outer extent: the x/y/z components.
pub const ROWS: usize = 3;

/// Row padding unit in elements (one AVX-512 register of doubles).
const ROW_PAD: usize = SIMD_ALIGNMENT / std::mem::size_of::<f64>();

/// Elements a layout addresses, counted from the base. `None` on overflow.
#[inline]
const fn required_len(len: usize, row_stride: usize) -> Option<usize> {
    if len == 0 {
        return Some(0);
    }
    match row_stride.checked_mul(ROWS - 1) {
        Some(v) => v.checked_add(len),
        None => None,
    }
}

fn check_layout(actual: usize, len: usize, row_stride: usize, col_stride: usize) -> Result<()> {
    if len == 0 {
        return Ok(());
    }
    if col_stride != 1 {
        return Err(Error::NonContiguous { col_stride });
    }
    if row_stride < len {
        return Err(Error::OverlappingRows { row_stride, len });
    }
    let Some(required) = required_len(len, row_stride) else {
        return Err(Error::BufferTooSmall { required: usize::MAX, actual });
    };
    if actual < required {
        return Err(Error::BufferTooSmall { required, actual });
    }
    Ok(())
}

/// Read-only view of a (3, N) batch of vectors.
#[derive(Debug, Clone, Copy)]
pub struct VectorBatch<'a> {
    data: &'a [f64],
    len: usize,
    row_stride: usize,
}

impl<'a> VectorBatch<'a> {
    /// Creates a view over tightly packed rows (`row_stride == n`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `data` holds fewer than `3 * n` values.
    ///
    /// # Example
    ///
    /// ```
    /// use trueno_cross::layout::VectorBatch;
    ///
    /// // columns [1, 0, 0] and [0, 1, 0]
    /// let data = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    /// let batch = VectorBatch::from_rows(&data, 2).unwrap();
    /// assert_eq!(batch.column(1), Some([0.0, 1.0, 0.0]));
    /// ```
    pub fn from_rows(data: &'a [f64], n: usize) -> Result<Self> {
        Self::strided(data, n, n, 1)
    }

    /// Creates a view from an explicit layout tuple.
    ///
    /// # Errors
    ///
    /// - [`Error::NonContiguous`] if `col_stride != 1`
    /// - [`Error::OverlappingRows`] if `row_stride < n`
    /// - [`Error::BufferTooSmall`] if `data` does not cover the last row
    pub fn strided(data: &'a [f64], n: usize, row_stride: usize, col_stride: usize) -> Result<Self> {
        check_layout(data.len(), n, row_stride, col_stride)?;
        Ok(Self { data, len: n, row_stride })
    }

    /// Number of columns (N).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true for an empty batch.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Elements between the starts of consecutive rows.
    #[must_use]
    pub const fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Elements between consecutive columns. Always 1.
    #[must_use]
    pub const fn col_stride(&self) -> usize {
        1
    }

    /// Returns one component row, or `None` if `r >= 3`.
    #[must_use]
    pub fn row(&self, r: usize) -> Option<&'a [f64]> {
        (r < ROWS).then(|| self.rows()[r])
    }

    /// Returns the x, y and z rows, each exactly N long.
    #[must_use]
    pub fn rows(&self) -> [&'a [f64]; ROWS] {
        if self.len == 0 {
            return [&[], &[], &[]];
        }
        let data: &'a [f64] = self.data;
        let s = self.row_stride;
        let n = self.len;
        [&data[..n], &data[s..s + n], &data[2 * s..2 * s + n]]
    }

    /// Returns column `i` as `[x, y, z]`.
    #[must_use]
    pub fn column(&self, i: usize) -> Option<[f64; ROWS]> {
        if i >= self.len {
            return None;
        }
        let [x, y, z] = self.rows();
        Some([x[i], y[i], z[i]])
    }
}

/// Writable view of a (3, N) batch of vectors.
#[derive(Debug)]
pub struct VectorBatchMut<'a> {
    data: &'a mut [f64],
    len: usize,
    row_stride: usize,
}

impl<'a> VectorBatchMut<'a> {
    /// Creates a writable view over tightly packed rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `data` holds fewer than `3 * n` values.
    pub fn from_rows(data: &'a mut [f64], n: usize) -> Result<Self> {
        Self::strided(data, n, n, 1)
    }

    /// Creates a writable view from an explicit layout tuple.
    ///
    /// Validation matches [`VectorBatch::strided`].
    pub fn strided(
        data: &'a mut [f64],
        n: usize,
        row_stride: usize,
        col_stride: usize,
    ) -> Result<Self> {
        check_layout(data.len(), n, row_stride, col_stride)?;
        Ok(Self { data, len: n, row_stride })
    }

    /// Number of columns (N).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true for an empty batch.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Elements between the starts of consecutive rows.
    #[must_use]
    pub const fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Reborrows as a read-only view.
    #[must_use]
    pub fn as_view(&self) -> VectorBatch<'_> {
        VectorBatch { data: &*self.data, len: self.len, row_stride: self.row_stride }
    }

    /// Returns the three rows as disjoint mutable slices, each exactly N long.
    pub fn rows_mut(&mut self) -> [&mut [f64]; ROWS] {
        if self.len == 0 {
            return [Default::default(), Default::default(), Default::default()];
        }
        let n = self.len;
        let (x, rest) = self.data.split_at_mut(self.row_stride);
        let (y, z) = rest.split_at_mut(self.row_stride);
        [&mut x[..n], &mut y[..n], &mut z[..n]]
    }

    /// Returns column `i` as `[x, y, z]`.
    #[must_use]
    pub fn column(&self, i: usize) -> Option<[f64; ROWS]> {
        self.as_view().column(i)
    }

    /// Overwrites column `i`. Returns false if `i` is out of range.
    pub fn set_column(&mut self, i: usize, v: [f64; ROWS]) -> bool {
        if i >= self.len {
            return false;
        }
        let [x, y, z] = self.rows_mut();
        x[i] = v[0];
        y[i] = v[1];
        z[i] = v[2];
        true
    }
}

/// Owned (3, N) batch with rows padded to a multiple of 8 doubles.
///
/// Padding keeps each row offset a whole number of SIMD registers from the
/// base, so a full-width chunk of one row never runs into the next. The base
/// itself is only guaranteed `f64` alignment; the kernels use unaligned loads.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorBuffer {
    data: Vec<f64>,
    len: usize,
    row_stride: usize,
}

impl VectorBuffer {
    /// Allocates a zeroed batch of `n` vectors.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        let row_stride = n.div_ceil(ROW_PAD) * ROW_PAD;
        Self { data: vec![0.0; ROWS * row_stride], len: n, row_stride }
    }

    /// Builds a batch from `[x, y, z]` columns.
    #[must_use]
    pub fn from_columns(columns: &[[f64; ROWS]]) -> Self {
        let mut buf = Self::zeros(columns.len());
        let s = buf.row_stride;
        for (i, c) in columns.iter().enumerate() {
            buf.data[i] = c[0];
            buf.data[s + i] = c[1];
            buf.data[2 * s + i] = c[2];
        }
        buf
    }

    /// Builds a batch from three component rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the rows differ in length.
    pub fn from_rows(rows: [&[f64]; ROWS]) -> Result<Self> {
        let n = rows[0].len();
        if let Some(bad) = rows.iter().find(|r| r.len() != n) {
            return Err(Error::ShapeMismatch { expected: n, found: bad.len() });
        }
        let mut buf = Self::zeros(n);
        let s = buf.row_stride;
        for (r, src) in rows.iter().enumerate() {
            buf.data[r * s..r * s + n].copy_from_slice(src);
        }
        Ok(buf)
    }

    /// Number of columns (N).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true for an empty batch.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Padded row stride in elements.
    #[must_use]
    pub const fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Full padded storage, rows laid out back to back.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the full padded storage.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Borrows the buffer as a read-only view.
    #[must_use]
    pub fn view(&self) -> VectorBatch<'_> {
        VectorBatch { data: &self.data, len: self.len, row_stride: self.row_stride }
    }

    /// Borrows the buffer as a writable view.
    pub fn view_mut(&mut self) -> VectorBatchMut<'_> {
        VectorBatchMut { data: &mut self.data, len: self.len, row_stride: self.row_stride }
    }

    /// Returns column `i` as `[x, y, z]`.
    #[must_use]
    pub fn column(&self, i: usize) -> Option<[f64; ROWS]> {
        self.view().column(i)
    }

    /// Iterates over all columns in order.
    pub fn columns(&self) -> impl Iterator<Item = [f64; ROWS]> + '_ {
        let [x, y, z] = self.view().rows();
        x.iter().zip(y).zip(z).map(|((&x, &y), &z)| [x, y, z])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_packed() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let batch = VectorBatch::from_rows(&data, 2).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.row_stride(), 2);
        assert_eq!(batch.col_stride(), 1);
        assert_eq!(batch.rows(), [&[1.0, 2.0][..], &[3.0, 4.0][..], &[5.0, 6.0][..]]);
        assert_eq!(batch.column(0), Some([1.0, 3.0, 5.0]));
        assert_eq!(batch.column(2), None);
    }

    #[test]
    fn test_strided_skips_padding() {
        // n = 2, rows padded to 4
        let data = [1.0, 2.0, -1.0, -1.0, 3.0, 4.0, -1.0, -1.0, 5.0, 6.0];
        let batch = VectorBatch::strided(&data, 2, 4, 1).unwrap();
        assert_eq!(batch.row(1), Some(&[3.0, 4.0][..]));
        assert_eq!(batch.row(2), Some(&[5.0, 6.0][..]));
        assert_eq!(batch.row(3), None);
    }

    #[test]
    fn test_strided_last_row_needs_only_n() {
        // 2 * stride + n = 10 exactly; trailing padding is not required
        let data = [0.0; 10];
        assert!(VectorBatch::strided(&data, 2, 4, 1).is_ok());
        assert_eq!(
            VectorBatch::strided(&data[..9], 2, 4, 1).unwrap_err(),
            Error::BufferTooSmall { required: 10, actual: 9 }
        );
    }

    #[test]
    fn test_rejects_non_unit_column_stride() {
        let data = [0.0; 9];
        assert_eq!(
            VectorBatch::strided(&data, 3, 1, 3).unwrap_err(),
            Error::NonContiguous { col_stride: 3 }
        );
    }

    #[test]
    fn test_rejects_overlapping_rows() {
        let data = [0.0; 12];
        assert_eq!(
            VectorBatch::strided(&data, 4, 2, 1).unwrap_err(),
            Error::OverlappingRows { row_stride: 2, len: 4 }
        );
    }

    #[test]
    fn test_too_small() {
        let data = [0.0; 5];
        assert!(matches!(
            VectorBatch::from_rows(&data, 2),
            Err(Error::BufferTooSmall { required: 6, actual: 5 })
        ));
    }

    #[test]
    fn test_overflowing_row_stride_is_too_small() {
        let stride = usize::MAX / 2 + 1;
        let data = [0.0; 4];
        assert_eq!(
            VectorBatch::strided(&data, 1, stride, 1).unwrap_err(),
            Error::BufferTooSmall { required: usize::MAX, actual: 4 }
        );

        let mut out = [0.0; 4];
        assert_eq!(
            VectorBatchMut::strided(&mut out, 1, stride, 1).unwrap_err(),
            Error::BufferTooSmall { required: usize::MAX, actual: 4 }
        );
    }

    #[test]
    fn test_empty_batch_accepts_any_layout() {
        let batch = VectorBatch::strided(&[], 0, 0, 7).unwrap();
        assert!(batch.is_empty());
        assert!(batch.rows().iter().all(|r| r.is_empty()));

        let mut nothing: [f64; 0] = [];
        let mut out = VectorBatchMut::from_rows(&mut nothing, 0).unwrap();
        assert!(out.rows_mut().iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_rows_mut_are_disjoint() {
        let mut data = [0.0; 9];
        {
            let mut view = VectorBatchMut::from_rows(&mut data, 3).unwrap();
            let [x, y, z] = view.rows_mut();
            x.fill(1.0);
            y.fill(2.0);
            z.fill(3.0);
        }
        assert_eq!(data, [1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_set_column() {
        let mut data = [0.0; 6];
        let mut view = VectorBatchMut::from_rows(&mut data, 2).unwrap();
        assert!(view.set_column(1, [7.0, 8.0, 9.0]));
        assert!(!view.set_column(2, [1.0, 1.0, 1.0]));
        assert_eq!(view.column(1), Some([7.0, 8.0, 9.0]));
        assert_eq!(data, [0.0, 7.0, 0.0, 8.0, 0.0, 9.0]);
    }

    #[test]
    fn test_buffer_padding() {
        assert_eq!(ROW_PAD * std::mem::size_of::<f64>(), SIMD_ALIGNMENT);
        let buf = VectorBuffer::zeros(5);
        assert_eq!(buf.row_stride(), 8);
        assert_eq!(VectorBuffer::zeros(8).row_stride(), 8);
        assert_eq!(VectorBuffer::zeros(9).row_stride(), 16);
        assert_eq!(VectorBuffer::zeros(0).row_stride(), 0);
        assert_eq!(buf.as_slice().len(), 24);
    }

    #[test]
    fn test_buffer_columns_round_trip() {
        let cols = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let buf = VectorBuffer::from_columns(&cols);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.columns().collect::<Vec<_>>(), cols.to_vec());
        assert_eq!(buf.view().row(1), Some(&[2.0, 5.0, 8.0][..]));
    }

    #[test]
    fn test_buffer_from_rows() {
        let buf = VectorBuffer::from_rows([&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]).unwrap();
        assert_eq!(buf.column(1), Some([2.0, 4.0, 6.0]));

        let err = VectorBuffer::from_rows([&[1.0, 2.0], &[3.0], &[5.0, 6.0]]).unwrap_err();
        assert_eq!(err, Error::ShapeMismatch { expected: 2, found: 1 });
    }
}
