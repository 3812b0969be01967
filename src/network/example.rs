use crate::math::matrix::Matrix;

/// One training or test sample: an input column and the expected output
/// column (one-hot for classification).
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub input: Matrix,
    pub output: Matrix,
}

impl Example {
    pub fn new(input: Matrix, output: Matrix) -> Example {
        Example { input, output }
    }

    /// Builds an example from plain vectors, both turned into columns.
    pub fn from_vecs(input: Vec<f64>, output: Vec<f64>) -> Example {
        Example {
            input: Matrix::column(input),
            output: Matrix::column(output),
        }
    }

    /// A one-hot expected output of `n_classes` rows.
    ///
    /// # Panics
    /// Panics if `class >= n_classes`.
    pub fn one_hot(input: Matrix, class: usize, n_classes: usize) -> Example {
        assert!(class < n_classes, "class {} out of range for {} classes", class, n_classes);
        let mut output = Matrix::zeros(n_classes, 1);
        output[(class, 0)] = 1.0;
        Example { input, output }
    }

    /// Index of the hot entry of the expected output.
    pub fn label(&self) -> usize {
        self.output.argmax()
    }
}
