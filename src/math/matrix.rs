use std::fmt;

use rand::Rng;

use crate::error::{NetError, Result};

/// Dense 2D matrix of `f64` stored as a flat row-major buffer.
///
/// `data.len() == rows * cols` for the whole lifetime of the value. Entry
/// `(r, c)` lives at `data[r * cols + c]`. `Clone` produces an independent
/// copy; no two live matrices share storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Wraps a row-major buffer. Fails if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        if data.len() != rows * cols {
            return Err(NetError::DimensionMismatch {
                op: "from_vec",
                left: (rows, cols),
                right: (1, data.len()),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from a slice of equally long rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Matrix> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(NetError::DimensionMismatch {
                    op: "from_rows",
                    left: (1, cols),
                    right: (1, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix { rows: rows.len(), cols, data })
    }

    /// A `values.len() x 1` column vector.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        }
    }

    /// Independent uniform samples from `[low, high]`, drawn from `rng` in
    /// row-major order.
    pub fn random_uniform<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        low: f64,
        high: f64,
        rng: &mut R,
    ) -> Matrix {
        let data = (0..rows * cols).map(|_| rng.gen_range(low..=high)).collect();
        Matrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of entries, `rows * cols`.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Borrows row `r`.
    ///
    /// # Panics
    /// Panics if `r >= rows`.
    pub fn row(&self, r: usize) -> &[f64] {
        assert!(r < self.rows, "row {} out of range for {} rows", r, self.rows);
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// # Panics
    /// Panics if `(r, c)` is outside the matrix.
    pub fn get(&self, r: usize, c: usize) -> f64 {
        assert!(r < self.rows && c < self.cols, "({}, {}) out of range for {}x{}", r, c, self.rows, self.cols);
        self.data[r * self.cols + c]
    }

    /// # Panics
    /// Panics if `(r, c)` is outside the matrix.
    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        assert!(r < self.rows && c < self.cols, "({}, {}) out of range for {}x{}", r, c, self.rows, self.cols);
        self.data[r * self.cols + c] = value;
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for r in 0..self.rows {
            for c in 0..self.cols {
                res.data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }

        res
    }

    /// Matrix product `self * rhs`. Requires `self.cols == rhs.rows`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(self.mismatch("multiply", rhs));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);
        self.accumulate_product(rhs, &mut res);
        Ok(res)
    }

    /// Fused `self * rhs + bias`, where `bias` is a `self.rows x 1` column
    /// added to every column of the product.
    ///
    /// Each output row is seeded with its bias before the products are
    /// accumulated, so no separate pass over the result is needed.
    pub fn multiply_with_bias(&self, rhs: &Matrix, bias: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(self.mismatch("multiply_with_bias", rhs));
        }
        if bias.rows != self.rows || bias.cols != 1 {
            return Err(NetError::DimensionMismatch {
                op: "multiply_with_bias",
                left: (self.rows, 1),
                right: bias.shape(),
            });
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);
        for r in 0..res.rows {
            let out = &mut res.data[r * res.cols..(r + 1) * res.cols];
            out.fill(bias.data[r]);
        }
        self.accumulate_product(rhs, &mut res);
        Ok(res)
    }

    /// `out += self * rhs`. Shapes are checked by the callers.
    ///
    /// Loop order is row / inner / column so both `rhs` and `out` are walked
    /// along contiguous rows.
    fn accumulate_product(&self, rhs: &Matrix, out: &mut Matrix) {
        let n = rhs.cols;
        for r in 0..self.rows {
            let a_row = &self.data[r * self.cols..(r + 1) * self.cols];
            let out_row = &mut out.data[r * n..(r + 1) * n];
            for (k, &a) in a_row.iter().enumerate() {
                let b_row = &rhs.data[k * n..(k + 1) * n];
                for (o, &b) in out_row.iter_mut().zip(b_row) {
                    *o += a * b;
                }
            }
        }
    }

    /// Multiplies every entry by `c` in place.
    pub fn scale(&mut self, c: f64) -> &mut Self {
        for x in &mut self.data {
            *x *= c;
        }
        self
    }

    /// `self[i] = f(self[i], other[i])` for every entry. Shapes must match.
    pub fn binary_element_wise<F>(&mut self, other: &Matrix, f: F) -> Result<&mut Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.zip_apply("binary_element_wise", other, f)
    }

    pub fn add_in_place(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.zip_apply("add", other, |a, b| a + b)
    }

    pub fn sub_in_place(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.zip_apply("sub", other, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product in place.
    pub fn hadamard_in_place(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.zip_apply("hadamard", other, |a, b| a * b)
    }

    fn zip_apply<F>(&mut self, op: &'static str, other: &Matrix, f: F) -> Result<&mut Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != other.shape() {
            return Err(self.mismatch(op, other));
        }
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a = f(*a, b);
        }
        Ok(self)
    }

    /// Applies `f` to every entry in place.
    pub fn unary_element_wise<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(f64) -> f64,
    {
        for x in &mut self.data {
            *x = f(*x);
        }
        self
    }

    /// Like `unary_element_wise` but leaves `self` untouched and returns a
    /// new matrix.
    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Adds a `rows x 1` column to every column of `self`.
    pub fn add_column(&mut self, column: &Matrix) -> Result<&mut Self> {
        if column.rows != self.rows || column.cols != 1 {
            return Err(NetError::DimensionMismatch {
                op: "add_column",
                left: (self.rows, 1),
                right: column.shape(),
            });
        }
        for r in 0..self.rows {
            let b = column.data[r];
            for x in &mut self.data[r * self.cols..(r + 1) * self.cols] {
                *x += b;
            }
        }
        Ok(self)
    }

    /// Sum of squared entries. Not normalised.
    pub fn squared_norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// Copies rows `[start, end)` into a new matrix with the same column
    /// count.
    pub fn slice_rows(&self, start: usize, end: usize) -> Result<Matrix> {
        if start > end || end > self.rows {
            return Err(NetError::SliceOutOfRange { start, end, rows: self.rows });
        }
        Ok(Matrix {
            rows: end - start,
            cols: self.cols,
            data: self.data[start * self.cols..end * self.cols].to_vec(),
        })
    }

    /// New matrix whose row `i` is row `indices[i]` of `self`.
    ///
    /// # Panics
    /// Panics if any index is `>= rows`.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Matrix { rows: indices.len(), cols: self.cols, data }
    }

    /// Row index of the largest entry in each column. Ties go to the lowest
    /// index; a matrix with no rows yields zeros.
    pub fn column_argmax(&self) -> Vec<usize> {
        (0..self.cols)
            .map(|c| {
                let mut best = 0;
                for r in 1..self.rows {
                    if self.data[r * self.cols + c] > self.data[best * self.cols + c] {
                        best = r;
                    }
                }
                best
            })
            .collect()
    }

    fn mismatch(&self, op: &'static str, other: &Matrix) -> NetError {
        NetError::DimensionMismatch {
            op,
            left: self.shape(),
            right: other.shape(),
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

/// Renders as `[[a, b]\n[c, d]]` with six decimals per entry.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for r in 0..self.rows {
            write!(f, "[")?;
            for (c, x) in self.row(r).iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:.6}", x)?;
            }
            write!(f, "]")?;
            if r + 1 < self.rows {
                writeln!(f)?;
            }
        }
        write!(f, "]")
    }
}
