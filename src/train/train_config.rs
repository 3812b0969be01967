use std::sync::mpsc;

use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`       — total number of full passes over the training data
/// - `batch_size`   — examples per mini-batch; use `1` for online SGD
/// - `eta`          — learning rate
/// - `alpha`        — L2 weight-decay strength
/// - `seed`         — seeds the per-epoch shuffle; `None` draws from entropy
/// - `monitor_loss` — compute the mean training loss after every epoch
///                    (one extra forward pass over the whole set)
/// - `progress_tx`  — optional channel sender; one `EpochStats` is sent per
///                    completed epoch. A dropped receiver does not stop the
///                    run.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub eta: f64,
    pub alpha: f64,
    pub seed: Option<u64>,
    pub monitor_loss: bool,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig`: entropy shuffle, no loss monitoring,
    /// no progress channel.
    pub fn new(epochs: usize, batch_size: usize, eta: f64, alpha: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            eta,
            alpha,
            seed: None,
            monitor_loss: false,
            progress_tx: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_loss_monitoring(mut self) -> Self {
        self.monitor_loss = true;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }
}
