use crate::math::matrix::Matrix;

/// Weight and bias gradients, one entry per fully-connected layer, in layer
/// order. Produced by backpropagation and consumed by the update step.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Vec<Matrix>,
    pub biases: Vec<Matrix>,
}

impl Gradients {
    /// Zero gradients for a network with the given layer sizes.
    pub fn zeros(layer_sizes: &[usize]) -> Gradients {
        let (weights, biases) = layer_sizes
            .windows(2)
            .map(|pair| (Matrix::zeros(pair[1], pair[0]), Matrix::zeros(pair[1], 1)))
            .unzip();
        Gradients { weights, biases }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Adds `other` into `self`, layer by layer.
    pub fn accumulate(&mut self, other: &Gradients) {
        assert_eq!(self.len(), other.len(), "gradients of different depth");
        for (acc, g) in self.weights.iter_mut().zip(&other.weights) {
            *acc += g;
        }
        for (acc, g) in self.biases.iter_mut().zip(&other.biases) {
            *acc += g;
        }
    }
}
