use crate::error::FnnError;
use crate::math::matrix::Matrix;
use crate::network::{Example, Network};

/// Cross-entropy loss for independent sigmoid outputs.
pub struct CrossEntropyLoss;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// Computes the scalar loss of one sample:
    ///   C = -sum(y[i] * ln(a[i]) + (1 - y[i]) * ln(1 - a[i]))
    ///
    /// # Panics
    /// Panics if `predicted` and `expected` differ in shape.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        assert_eq!(predicted.shape(), expected.shape(), "loss operands differ in shape");
        predicted
            .as_slice()
            .iter()
            .zip(expected.as_slice())
            .map(|(a, y)| -(y * (a + EPS).ln() + (1.0 - y) * (1.0 - a + EPS).ln()))
            .sum()
    }

    /// Gradient of the loss with respect to the output pre-activation.
    ///
    /// The sigmoid derivative cancels against the loss derivative, leaving
    /// the plain error `a - y`. This is the first delta of backpropagation.
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        predicted - expected
    }

    /// Mean loss of `network` over `examples` (0 for an empty set).
    pub fn mean_loss(network: &Network, examples: &[Example]) -> Result<f64, FnnError> {
        if examples.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for example in examples {
            network.check_example(example)?;
            let output = network.feedforward(&example.input)?;
            total += CrossEntropyLoss::loss(&output, &example.output);
        }
        Ok(total / examples.len() as f64)
    }
}
