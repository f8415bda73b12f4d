//! Shape-checked dense matrix primitives.
//!
//! Every function here is pure: arguments are borrowed as views and a freshly
//! allocated matrix is returned. A single sample is always a column vector of
//! shape `(n, 1)`.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

use crate::error::ShapeError;

pub type Matrix = Array2<f64>;
pub type MatrixView<'a> = ArrayView2<'a, f64>;

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Multiply `(m, n)` matrix by a vector of length `n`.
/// Element `i` of the result is the dot product of row `i` and `vector`.
pub fn vector_multiply(
    matrix: MatrixView,
    vector: ArrayView1<f64>,
) -> Result<Array1<f64>, ShapeError> {
    if matrix.ncols() != vector.len() {
        return Err(ShapeError::new(
            "vector_multiply",
            matrix.dim(),
            (vector.len(), 1),
        ));
    }
    Ok(matrix.rows().into_iter().map(|row| row.dot(&vector)).collect())
}

/// `(m, n) x (n, p) -> (m, p)`, one column of `b` at a time.
pub fn matrix_multiply(a: MatrixView, b: MatrixView) -> Result<Matrix, ShapeError> {
    if a.ncols() != b.nrows() {
        return Err(ShapeError::new("matrix_multiply", a.dim(), b.dim()));
    }

    let mut product = Matrix::zeros((a.nrows(), b.ncols()));
    for (j, column) in b.columns().into_iter().enumerate() {
        let result = vector_multiply(a, column)?;
        product.column_mut(j).assign(&result);
    }
    Ok(product)
}

pub fn transpose(a: MatrixView) -> Matrix {
    a.t().to_owned()
}

pub fn elementwise<F>(a: MatrixView, b: MatrixView, op: F) -> Result<Matrix, ShapeError>
where
    F: Fn(f64, f64) -> f64,
{
    if a.dim() != b.dim() {
        return Err(ShapeError::new("elementwise", a.dim(), b.dim()));
    }
    Ok(Zip::from(&a).and(&b).map_collect(|&x, &y| op(x, y)))
}

pub fn add_elementwise(a: MatrixView, b: MatrixView) -> Result<Matrix, ShapeError> {
    elementwise(a, b, add)
}

pub fn multiply_elementwise(a: MatrixView, b: MatrixView) -> Result<Matrix, ShapeError> {
    elementwise(a, b, multiply)
}

pub fn scalar_multiply(a: MatrixView, scalar: f64) -> Matrix {
    a.map(|&v| v * scalar)
}

pub fn fill(rows: usize, cols: usize, value: f64) -> Matrix {
    Matrix::from_elem((rows, cols), value)
}

/// Broadcast the single scalar of each row across `n` columns.
/// `a` must have exactly one column.
pub fn repeat_row(a: MatrixView, n: usize) -> Result<Matrix, ShapeError> {
    if a.ncols() != 1 {
        return Err(ShapeError::new("repeat_row", a.dim(), (a.nrows(), 1)));
    }
    Ok(Matrix::from_shape_fn((a.nrows(), n), |(i, _)| a[[i, 0]]))
}

/// Stack `n` copies of the single row of `a`.
/// `a` must have exactly one row.
pub fn repeat_column(a: MatrixView, n: usize) -> Result<Matrix, ShapeError> {
    if a.nrows() != 1 {
        return Err(ShapeError::new("repeat_column", a.dim(), (1, a.ncols())));
    }
    Ok(Matrix::from_shape_fn((n, a.ncols()), |(_, j)| a[[0, j]]))
}

/// Returns the rectified matrix and its derivative mask.
///
/// The derivative at exactly zero is taken as the right-derivative, so a zero
/// input yields output `0.0` and mask `1.0`.
pub fn relu_forward(a: MatrixView) -> (Matrix, Matrix) {
    let rectified = a.map(|&v| if v >= 0.0 { v } else { 0.0 });
    let mask = a.map(|&v| if v >= 0.0 { 1.0 } else { 0.0 });
    (rectified, mask)
}
