use std::ops::{AddAssign, Index, IndexMut, Mul, MulAssign, Sub, SubAssign};

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::activation::sigmoid;
use crate::error::FnnError;

/// Dense row-major matrix of `f64`.
///
/// Binary operators require matching shapes and panic otherwise: shapes are
/// fixed by the network topology, so a mismatch is a programming error.
/// Callers that must report a mismatch as a value use [`Matrix::ensure_shape`]
/// before computing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        debug_assert!(rows > 0 && cols > 0, "Matrix::filled: empty {}x{} shape", rows, cols);
        Matrix {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Builds a matrix from a flat row-major buffer.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Matrix {
        debug_assert!(rows > 0 && cols > 0, "Matrix::from_vec: empty {}x{} shape", rows, cols);
        assert_eq!(
            data.len(),
            rows * cols,
            "Matrix::from_vec: {} values cannot fill a {}x{} matrix",
            data.len(),
            rows,
            cols
        );
        Matrix { rows, cols, data }
    }

    /// Builds a matrix from nested rows.
    ///
    /// # Panics
    /// Panics if `data` is empty or the rows have different lengths.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        assert!(!data.is_empty(), "Matrix::from_data: no rows given");
        let rows = data.len();
        let cols = data[0].len();
        debug_assert!(cols > 0, "Matrix::from_data: empty rows");
        assert!(
            data.iter().all(|row| row.len() == cols),
            "Matrix::from_data: rows have different lengths"
        );
        Matrix {
            rows,
            cols,
            data: data.into_iter().flatten().collect(),
        }
    }

    /// A column vector (`values.len()` x 1).
    pub fn column(values: Vec<f64>) -> Matrix {
        let rows = values.len();
        debug_assert!(rows > 0, "Matrix::column: no values given");
        Matrix { rows, cols: 1, data: values }
    }

    /// Samples every entry from N(0, `std_dev`).
    ///
    /// # Panics
    /// Panics if `std_dev` is negative or not finite.
    pub fn random_normal<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        debug_assert!(rows > 0 && cols > 0, "Matrix::random_normal: empty {}x{} shape", rows, cols);
        let normal = Normal::new(0.0, std_dev)
            .unwrap_or_else(|e| panic!("invalid standard deviation {}: {}", std_dev, e));
        let data = (0..rows * cols).map(|_| normal.sample(&mut *rng)).collect();
        Matrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Element `(i, j)`, or `None` outside the matrix.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    /// Returns `ShapeMismatch` unless this matrix is `rows` x `cols`.
    pub fn ensure_shape(&self, rows: usize, cols: usize, op: &'static str) -> Result<(), FnnError> {
        if self.shape() == (rows, cols) {
            Ok(())
        } else {
            Err(FnnError::ShapeMismatch {
                op,
                expected: (rows, cols),
                actual: self.shape(),
            })
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        res
    }

    pub fn transpose_in_place(&mut self) {
        // Row and column vectors share their storage layout.
        if self.rows > 1 && self.cols > 1 {
            *self = self.transpose();
        } else {
            std::mem::swap(&mut self.rows, &mut self.cols);
        }
    }

    /// Element-wise (Hadamard) product, in place.
    pub fn hadamard_assign(&mut self, rhs: &Matrix) {
        self.assert_same_shape(rhs, "hadamard product");
        self.data
            .iter_mut()
            .zip(&rhs.data)
            .for_each(|(a, b)| *a *= b);
    }

    /// Applies the logistic function to every entry, in place.
    pub fn sigmoid_in_place(&mut self) {
        self.data.iter_mut().for_each(|x| *x = sigmoid(*x));
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    /// Flat index of the largest entry; the first one wins on ties.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (k, &x) in self.data.iter().enumerate() {
            if x > self.data[best] {
                best = k;
            }
        }
        best
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    fn assert_same_shape(&self, rhs: &Matrix, op: &str) {
        if self.shape() != rhs.shape() {
            panic!(
                "Matrices are of incorrect sizes for {}: {}x{} vs {}x{}",
                op, self.rows, self.cols, rhs.rows, rhs.cols
            );
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            i, j, self.rows, self.cols
        );
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            i, j, self.rows, self.cols
        );
        &mut self.data[i * self.cols + j]
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        self.assert_same_shape(rhs, "addition");
        self.data.iter_mut().zip(&rhs.data).for_each(|(a, b)| *a += b);
    }
}

impl SubAssign<&Matrix> for Matrix {
    fn sub_assign(&mut self, rhs: &Matrix) {
        self.assert_same_shape(rhs, "subtraction");
        self.data.iter_mut().zip(&rhs.data).for_each(|(a, b)| *a -= b);
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: &Matrix) -> Matrix {
        let mut res = self.clone();
        res -= rhs;
        res
    }
}

impl MulAssign<f64> for Matrix {
    fn mul_assign(&mut self, rhs: f64) {
        self.data.iter_mut().for_each(|x| *x *= rhs);
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        if self.cols != rhs.rows {
            panic!(
                "Matrices are of incorrect sizes for product: {}x{} * {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            );
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..self.rows {
            let lhs_row = &self.data[i * self.cols..(i + 1) * self.cols];
            let out_row = &mut res.data[i * rhs.cols..(i + 1) * rhs.cols];
            for (k, &a) in lhs_row.iter().enumerate() {
                let rhs_row = &rhs.data[k * rhs.cols..(k + 1) * rhs.cols];
                for (out, &b) in out_row.iter_mut().zip(rhs_row) {
                    *out += a * b;
                }
            }
        }

        res
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}
