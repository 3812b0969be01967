use crate::{
    error::FnnError,
    network::{Example, Network},
    train::{loop_fn::train_loop, train_config::TrainConfig},
};

/// Trains `network` with mini-batch SGD and L2 weight decay.
///
/// Runs `epochs * (examples.len() / batch_size)` batch updates with an
/// entropy-seeded shuffle. Use [`train_loop`] with a [`TrainConfig`] for a
/// seeded shuffle, loss monitoring or progress reports.
pub fn train_network(
    network: &mut Network,
    examples: &[Example],
    epochs: usize,
    batch_size: usize,
    eta: f64,
    alpha: f64,
) -> Result<(), FnnError> {
    train_loop(network, examples, &TrainConfig::new(epochs, batch_size, eta, alpha))
}
