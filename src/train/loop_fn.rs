use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::FnnError;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::network::{Example, Network};
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` in place for `config.epochs` epochs of mini-batch SGD.
///
/// Each epoch visits the examples in a fresh random order and applies
/// `examples.len() / batch_size` updates; a trailing partial batch is
/// dropped. The whole training set size scales the weight decay.
///
/// # Errors
/// Returns `InvalidTrainingInput` if `examples` is empty or `batch_size` is
/// zero, and `ShapeMismatch`/`InvalidTrainingInput` if any example does not
/// fit the network. All checks happen before the first update.
pub fn train_loop(
    network: &mut Network,
    examples: &[Example],
    config: &TrainConfig,
) -> Result<(), FnnError> {
    if examples.is_empty() {
        return Err(FnnError::InvalidTrainingInput("training set is empty".into()));
    }
    if config.batch_size == 0 {
        return Err(FnnError::InvalidTrainingInput("batch size must be at least 1".into()));
    }
    for example in examples {
        network.check_example(example)?;
    }

    let n = examples.len();
    let batches_per_epoch = n / config.batch_size;
    if batches_per_epoch == 0 {
        warn!(
            "batch size {} exceeds the {} training examples; no update will be applied",
            config.batch_size, n
        );
    } else if n % config.batch_size != 0 {
        debug!("dropping {} trailing examples per epoch", n % config.batch_size);
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut order: Vec<&Example> = examples.iter().collect();

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        order.shuffle(&mut rng);
        for batch in order.chunks_exact(config.batch_size) {
            network.sgd_batch(batch, n, config.eta, config.alpha)?;
        }

        let elapsed_ms = t_start.elapsed().as_millis() as u64;
        let train_loss = if config.monitor_loss {
            Some(CrossEntropyLoss::mean_loss(network, examples)?)
        } else {
            None
        };

        match train_loss {
            Some(loss) => info!(
                "epoch {}/{}: {} batches in {} ms, loss {:.6}",
                epoch, config.epochs, batches_per_epoch, elapsed_ms, loss
            ),
            None => info!(
                "epoch {}/{}: {} batches in {} ms",
                epoch, config.epochs, batches_per_epoch, elapsed_ms
            ),
        }

        if let Some(ref tx) = config.progress_tx {
            let stats = EpochStats {
                epoch,
                total_epochs: config.epochs,
                batches: batches_per_epoch,
                train_loss,
                elapsed_ms,
            };
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(stats);
        }
    }

    Ok(())
}
