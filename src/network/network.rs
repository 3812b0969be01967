use std::sync::Arc;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::activation::sigmoid_prime_from_output;
use crate::error::FnnError;
use crate::layers::{FullyConnectedLayer, InputLayer, LayerRef, NodeCount};
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::math::matrix::Matrix;
use crate::network::example::Example;
use crate::network::gradients::Gradients;
use crate::optim::sgd::Sgd;

/// A feedforward network of sigmoid layers trained with cross-entropy.
///
/// The network owns its input layer and its fully-connected layers; layer `k`
/// of `fully_connected` sits at position `k + 1` of [`Network::layer_sizes`].
/// Inference and gradient computation take `&self`; only
/// [`Network::sgd_batch`] mutates parameters.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<usize>,
    input: InputLayer,
    fully_connected: Vec<FullyConnectedLayer>,
    pool: Option<Arc<ThreadPool>>,
}

impl Network {
    /// Builds a randomly initialized network from entropy.
    pub fn new(layer_sizes: &[usize]) -> Result<Network, FnnError> {
        Network::with_rng(layer_sizes, &mut StdRng::from_entropy())
    }

    /// Builds a network whose parameters are fully determined by `seed`.
    pub fn with_seed(layer_sizes: &[usize], seed: u64) -> Result<Network, FnnError> {
        Network::with_rng(layer_sizes, &mut StdRng::seed_from_u64(seed))
    }

    /// Builds a network drawing every layer's parameters, in order, from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Result<Network, FnnError> {
        validate_topology(layer_sizes)?;

        let input = InputLayer::new(layer_sizes[0]);
        let mut fully_connected: Vec<FullyConnectedLayer> = Vec::with_capacity(layer_sizes.len() - 1);
        for (k, &nb_nodes) in layer_sizes.iter().enumerate().skip(1) {
            let layer = match fully_connected.last() {
                None => FullyConnectedLayer::new(nb_nodes, k - 1, &input, rng),
                Some(previous) => FullyConnectedLayer::new(nb_nodes, k - 1, previous, rng),
            };
            fully_connected.push(layer);
        }

        debug!("built network with layers {:?}", layer_sizes);
        Ok(Network {
            layers: layer_sizes.to_vec(),
            input,
            fully_connected,
            pool: None,
        })
    }

    /// Rebuilds a network from stored parameters, one weight and bias matrix
    /// per fully-connected layer.
    pub fn from_parameters(
        layer_sizes: &[usize],
        weights: Vec<Matrix>,
        biases: Vec<Matrix>,
    ) -> Result<Network, FnnError> {
        validate_topology(layer_sizes)?;
        let expected = layer_sizes.len() - 1;
        if weights.len() != expected || biases.len() != expected {
            return Err(FnnError::InvalidTopology(format!(
                "{} layer sizes need {} weight and bias matrices, got {} and {}",
                layer_sizes.len(),
                expected,
                weights.len(),
                biases.len()
            )));
        }

        let input = InputLayer::new(layer_sizes[0]);
        let mut fully_connected: Vec<FullyConnectedLayer> = Vec::with_capacity(expected);
        for (k, (w, b)) in weights.into_iter().zip(biases).enumerate() {
            let nb_nodes = layer_sizes[k + 1];
            let layer = match fully_connected.last() {
                None => FullyConnectedLayer::from_parameters(nb_nodes, k, &input, w, b)?,
                Some(previous) => FullyConnectedLayer::from_parameters(nb_nodes, k, previous, w, b)?,
            };
            fully_connected.push(layer);
        }

        Ok(Network {
            layers: layer_sizes.to_vec(),
            input,
            fully_connected,
            pool: None,
        })
    }

    /// Sets the concurrency hint. With more than one thread, the examples of
    /// a batch are backpropagated on a dedicated pool of that many workers.
    pub fn with_threads(mut self, threads: usize) -> Result<Network, FnnError> {
        self.pool = if threads > 1 {
            let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
            Some(Arc::new(pool))
        } else {
            None
        };
        Ok(self)
    }

    pub fn threads(&self) -> usize {
        self.pool.as_ref().map_or(1, |pool| pool.current_num_threads())
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.input.nb_nodes()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1]
    }

    pub fn nb_fully_connected_layers(&self) -> usize {
        self.fully_connected.len()
    }

    pub fn input_layer(&self) -> &InputLayer {
        &self.input
    }

    pub fn fully_connected_layer(&self, k: usize) -> &FullyConnectedLayer {
        &self.fully_connected[k]
    }

    pub fn fully_connected_layer_mut(&mut self, k: usize) -> &mut FullyConnectedLayer {
        &mut self.fully_connected[k]
    }

    pub fn fully_connected_layers(&self) -> &[FullyConnectedLayer] {
        &self.fully_connected
    }

    /// Layer at position `i` of the full sequence (0 is the input layer).
    pub fn layer(&self, i: usize) -> LayerRef<'_> {
        if i == 0 {
            LayerRef::Input(&self.input)
        } else {
            LayerRef::FullyConnected(&self.fully_connected[i - 1])
        }
    }

    /// Predecessor of fully-connected layer `k`.
    pub fn previous_layer(&self, k: usize) -> LayerRef<'_> {
        self.layer(self.fully_connected[k].previous())
    }

    /// Computes the network output for one input column.
    ///
    /// Only the latest activation is kept alive while walking the layers.
    pub fn feedforward(&self, input: &Matrix) -> Result<Matrix, FnnError> {
        input.ensure_shape(self.input_size(), 1, "feedforward input")?;
        let mut layers = self.fully_connected.iter();
        let mut activation = match layers.next() {
            Some(first) => first.activate(input),
            None => input.clone(),
        };
        for layer in layers {
            activation = layer.activate(&activation);
        }
        Ok(activation)
    }

    /// Computes every activation, from the input itself (index 0) to the
    /// output (index `nb_fully_connected_layers()`).
    pub fn feedforward_complete(&self, input: &Matrix) -> Result<Vec<Matrix>, FnnError> {
        input.ensure_shape(self.input_size(), 1, "feedforward input")?;
        Ok(self.activation_trace(input))
    }

    fn activation_trace(&self, input: &Matrix) -> Vec<Matrix> {
        let mut activations = Vec::with_capacity(self.layers.len());
        activations.push(input.clone());
        for layer in &self.fully_connected {
            let next = layer.activate(&activations[activations.len() - 1]);
            activations.push(next);
        }
        activations
    }

    /// Cross-entropy gradients of one example with respect to every weight
    /// and bias.
    ///
    /// With sigmoid outputs, the cross-entropy gradient with respect to the
    /// output pre-activation is the plain error `a - y`. Going backward:
    ///
    /// ```text
    /// D(L-1) = A(L) - Y
    /// D(k)   = [ W(k+1)^t * D(k+1) ] ° A(k+1) ° (1 - A(k+1))
    /// NablaW(k) = D(k) * A(k)^t
    /// NablaB(k) = D(k)
    /// ```
    pub fn backpropagation(&self, example: &Example) -> Result<Gradients, FnnError> {
        self.check_example(example)?;
        Ok(self.backpropagate(example))
    }

    fn backpropagate(&self, example: &Example) -> Gradients {
        let nb_fc = self.fully_connected.len();
        let activations = self.activation_trace(&example.input);

        let mut nabla_w = Vec::with_capacity(nb_fc);
        let mut nabla_b = Vec::with_capacity(nb_fc);

        let mut delta = CrossEntropyLoss::derivative(&activations[nb_fc], &example.output);
        nabla_w.push(&delta * &activations[nb_fc - 1].transpose());
        nabla_b.push(delta.clone());

        for k in (0..nb_fc - 1).rev() {
            let wt = self.fully_connected[k + 1].weights().transpose();
            let mut propagated = &wt * &delta;
            let sp = activations[k + 1].map(sigmoid_prime_from_output);
            propagated.hadamard_assign(&sp);
            delta = propagated;

            nabla_w.push(&delta * &activations[k].transpose());
            nabla_b.push(delta.clone());
        }

        nabla_w.reverse();
        nabla_b.reverse();
        Gradients { weights: nabla_w, biases: nabla_b }
    }

    /// Sums the raw (unscaled) gradients of every example in `batch`.
    ///
    /// Every example is validated before any computation. With a worker
    /// pool, each example is backpropagated independently and the results
    /// are summed on the calling thread once all workers are done.
    pub fn batch_gradients(&self, batch: &[&Example]) -> Result<Gradients, FnnError> {
        if batch.is_empty() {
            return Err(FnnError::InvalidTrainingInput("batch must hold at least one example".into()));
        }
        for example in batch {
            self.check_example(example)?;
        }

        let mut sum = Gradients::zeros(&self.layers);
        match &self.pool {
            Some(pool) => {
                let per_example: Vec<Gradients> =
                    pool.install(|| batch.par_iter().map(|ex| self.backpropagate(ex)).collect());
                for g in &per_example {
                    sum.accumulate(g);
                }
            }
            None => {
                for example in batch {
                    sum.accumulate(&self.backpropagate(example));
                }
            }
        }
        Ok(sum)
    }

    /// Runs one mini-batch SGD update with L2 weight decay.
    ///
    /// `training_set_len` is the size of the whole training set and scales
    /// the decay term; `eta` is the learning rate and `alpha` the decay
    /// strength. Parameters are only touched after the gradients of the
    /// whole batch are summed.
    pub fn sgd_batch(
        &mut self,
        batch: &[&Example],
        training_set_len: usize,
        eta: f64,
        alpha: f64,
    ) -> Result<(), FnnError> {
        if training_set_len == 0 {
            return Err(FnnError::InvalidTrainingInput("training set length must be at least 1".into()));
        }
        let nabla = self.batch_gradients(batch)?;

        let sgd = Sgd::new(eta, alpha);
        for (layer, (w, b)) in self
            .fully_connected
            .iter_mut()
            .zip(nabla.weights.into_iter().zip(nabla.biases))
        {
            sgd.step(layer, w, b, batch.len(), training_set_len);
        }
        Ok(())
    }

    /// Checks that `example` fits the input and output layers.
    pub fn check_example(&self, example: &Example) -> Result<(), FnnError> {
        example.input.ensure_shape(self.input_size(), 1, "example input")?;
        if example.output.shape() != (self.output_size(), 1) {
            return Err(FnnError::InvalidTrainingInput(format!(
                "expected output must be {}x1, got {}x{}",
                self.output_size(),
                example.output.rows(),
                example.output.cols()
            )));
        }
        Ok(())
    }
}

fn validate_topology(layer_sizes: &[usize]) -> Result<(), FnnError> {
    if layer_sizes.len() < 2 {
        return Err(FnnError::InvalidTopology(format!(
            "need at least 2 layer sizes, got {}",
            layer_sizes.len()
        )));
    }
    if let Some(pos) = layer_sizes.iter().position(|&n| n == 0) {
        return Err(FnnError::InvalidTopology(format!("layer {} has no nodes", pos)));
    }
    Ok(())
}
