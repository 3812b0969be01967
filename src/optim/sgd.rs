use crate::{layers::dense::FullyConnectedLayer, math::matrix::Matrix};

/// Mini-batch SGD with L2 weight decay.
///
/// - `learning_rate` — η
/// - `weight_decay`  — α, the regularization strength
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
    pub weight_decay: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64, weight_decay: f64) -> Sgd {
        Sgd { learning_rate, weight_decay }
    }

    /// Factor applied to the weights before the gradient step:
    /// `1 - α·η / training_set_len`.
    pub fn decay_factor(&self, training_set_len: usize) -> f64 {
        1.0 - self.weight_decay * self.learning_rate / training_set_len as f64
    }

    /// Applies one update to `layer` from gradients summed over `batch_len`
    /// examples:
    ///
    /// ```text
    /// W <- W * (1 - α·η/n) - (η/m) * ΣNablaW
    /// B <- B - (η/m) * ΣNablaB
    /// ```
    ///
    /// The sums are consumed and scaled in place.
    pub fn step(
        &self,
        layer: &mut FullyConnectedLayer,
        mut weights_grad: Matrix,
        mut biases_grad: Matrix,
        batch_len: usize,
        training_set_len: usize,
    ) {
        let scale = self.learning_rate / batch_len as f64;
        weights_grad *= scale;
        biases_grad *= scale;

        let weights = layer.weights_mut();
        *weights *= self.decay_factor(training_set_len);
        *weights -= &weights_grad;
        *layer.biases_mut() -= &biases_grad;
    }
}
