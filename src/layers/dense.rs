use rand::Rng;

use crate::error::FnnError;
use crate::layers::layer::NodeCount;
use crate::math::matrix::Matrix;

/// A fully-connected sigmoid layer.
///
/// `weights` is `nb_nodes x previous.nb_nodes()` and `biases` is
/// `nb_nodes x 1`; they are the only learned state of the network.
/// `previous` is the position of the predecessor in the owning network's
/// layer sequence (0 is the input layer). The network owns every layer, so
/// the link is an index rather than a reference.
#[derive(Debug, Clone)]
pub struct FullyConnectedLayer {
    nb_nodes: usize,
    previous: usize,
    weights: Matrix,
    biases: Matrix,
}

impl FullyConnectedLayer {
    /// Creates a layer linked to `previous` and draws its parameters.
    ///
    /// Biases come from N(0, 1). Weights come from N(0, 1/sqrt(n_prev)) so
    /// that the weighted input of a wide layer stays out of the flat tails of
    /// the sigmoid.
    pub fn new<R: Rng + ?Sized>(
        nb_nodes: usize,
        previous_index: usize,
        previous: &dyn NodeCount,
        rng: &mut R,
    ) -> FullyConnectedLayer {
        let fan_in = previous.nb_nodes();
        let std_dev = 1.0 / (fan_in as f64).sqrt();
        FullyConnectedLayer {
            nb_nodes,
            previous: previous_index,
            weights: Matrix::random_normal(nb_nodes, fan_in, std_dev, rng),
            biases: Matrix::random_normal(nb_nodes, 1, 1.0, rng),
        }
    }

    /// Rebuilds a layer from stored parameters, checking their shapes
    /// against `nb_nodes` and the predecessor.
    pub fn from_parameters(
        nb_nodes: usize,
        previous_index: usize,
        previous: &dyn NodeCount,
        weights: Matrix,
        biases: Matrix,
    ) -> Result<FullyConnectedLayer, FnnError> {
        weights.ensure_shape(nb_nodes, previous.nb_nodes(), "layer weights")?;
        biases.ensure_shape(nb_nodes, 1, "layer biases")?;
        Ok(FullyConnectedLayer {
            nb_nodes,
            previous: previous_index,
            weights,
            biases,
        })
    }

    pub fn previous(&self) -> usize {
        self.previous
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut Matrix {
        &mut self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    pub fn biases_mut(&mut self) -> &mut Matrix {
        &mut self.biases
    }

    /// `sigmoid(W * previous + B)`. `previous` must be `n_prev x 1`.
    pub(crate) fn activate(&self, previous: &Matrix) -> Matrix {
        let mut a = &self.weights * previous;
        a += &self.biases;
        a.sigmoid_in_place();
        a
    }
}

impl NodeCount for FullyConnectedLayer {
    fn nb_nodes(&self) -> usize {
        self.nb_nodes
    }
}
