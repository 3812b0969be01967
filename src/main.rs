//! digit-scanner command-line tool.
//!
//! Creates, trains and tests feedforward networks on the MNIST digits, and
//! reads digits from image files.
//!
//!   digit-scanner --layers 784,30,10 --fnnout net.txt train --mnist data/
//!   digit-scanner --fnnin net.txt test --mnist data/ --images 10000
//!   digit-scanner --fnnin net.txt guess --image three.png --invert

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use digit_scanner::canvas::guess_input;
use digit_scanner::data::{image_file_to_input, load_mnist, MnistSet};
use digit_scanner::{evaluate, persist, train_loop, Network, TrainSettings};

#[derive(Debug, Parser)]
#[command(name = "digit-scanner", author, version, about)]
struct Cli {
    /// Create a new network with these layer sizes, e.g. 784,30,10
    #[arg(long, value_delimiter = ',', conflicts_with = "fnnin")]
    layers: Option<Vec<usize>>,

    /// Load the network from this file (.json or text layout)
    #[arg(long)]
    fnnin: Option<PathBuf>,

    /// Save the network to this file when done
    #[arg(long)]
    fnnout: Option<PathBuf>,

    /// Worker threads used to process a batch
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Seed for the initial weights of a new network
    #[arg(long)]
    seed: Option<u64>,

    /// Print the time taken by the command
    #[arg(long)]
    time: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train the network on the MNIST training set
    Train {
        /// Folder holding the MNIST files
        #[arg(long)]
        mnist: PathBuf,

        /// JSON file with training settings; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of images to train on
        #[arg(long)]
        images: Option<usize>,

        /// Number of leading images to skip
        #[arg(long)]
        skip: Option<usize>,

        #[arg(long)]
        epochs: Option<usize>,

        /// Mini-batch size
        #[arg(long)]
        batch: Option<usize>,

        /// Learning rate
        #[arg(long)]
        eta: Option<f64>,

        /// Weight-decay strength
        #[arg(long)]
        alpha: Option<f64>,

        /// Seed for the per-epoch shuffle
        #[arg(long)]
        shuffle_seed: Option<u64>,

        /// Report the training loss after every epoch
        #[arg(long)]
        monitor: bool,
    },

    /// Measure accuracy on the MNIST test set
    Test {
        /// Folder holding the MNIST files
        #[arg(long)]
        mnist: PathBuf,

        /// Number of images to test on
        #[arg(long, default_value_t = 10_000)]
        images: usize,

        /// Number of leading images to skip
        #[arg(long, default_value_t = 0)]
        skip: usize,
    },

    /// Guess the digit drawn in an image file
    Guess {
        #[arg(long)]
        image: PathBuf,

        /// The picture is dark ink on a light background
        #[arg(long)]
        invert: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let network = build_network(&cli)?;
    let mut network = network
        .with_threads(cli.threads)
        .context("cannot start worker threads")?;

    let begin = Instant::now();
    match cli.command {
        Some(Command::Train {
            mnist,
            config,
            images,
            skip,
            epochs,
            batch,
            eta,
            alpha,
            shuffle_seed,
            monitor,
        }) => {
            let mut settings = match config {
                Some(path) => TrainSettings::from_file(&path)?,
                None => TrainSettings::default(),
            };
            settings.images = images.unwrap_or(settings.images);
            settings.skip = skip.unwrap_or(settings.skip);
            settings.epochs = epochs.unwrap_or(settings.epochs);
            settings.batch_size = batch.unwrap_or(settings.batch_size);
            settings.eta = eta.unwrap_or(settings.eta);
            settings.alpha = alpha.unwrap_or(settings.alpha);
            settings.seed = shuffle_seed.or(settings.seed);
            settings.validate()?;

            let examples = load_mnist(&mnist, MnistSet::Train, settings.skip, Some(settings.images))?;
            let mut config = settings.train_config();
            if monitor {
                config = config.with_loss_monitoring();
            }
            info!(
                "training {:?} on {} images: {} epochs, batch {}, eta {}, alpha {}",
                network.layer_sizes(),
                examples.len(),
                settings.epochs,
                settings.batch_size,
                settings.eta,
                settings.alpha
            );
            train_loop(&mut network, &examples, &config)?;
        }
        Some(Command::Test { mnist, images, skip }) => {
            let examples = load_mnist(&mnist, MnistSet::Test, skip, Some(images))?;
            let evaluation = evaluate(&network, &examples)?;
            println!("{:.2} %", evaluation.accuracy() * 100.0);
        }
        Some(Command::Guess { image, invert }) => {
            if network.input_size() != 28 * 28 {
                bail!("network expects {} inputs, images give 784", network.input_size());
            }
            let input = image_file_to_input(&image, 28, 28, invert)?;
            let guess = guess_input(&network, &input)?;
            println!("{}", guess.digit);
            for (digit, score) in guess.scores.iter().enumerate() {
                info!("{}: {:.4}", digit, score);
            }
        }
        None => {}
    }
    if cli.time {
        println!("{:.3} s", begin.elapsed().as_secs_f64());
    }

    if let Some(path) = &cli.fnnout {
        persist::save(&network, path)?;
    }
    Ok(())
}

fn build_network(cli: &Cli) -> Result<Network> {
    match (&cli.layers, &cli.fnnin) {
        (Some(layers), _) => {
            let network = match cli.seed {
                Some(seed) => Network::with_seed(layers, seed)?,
                None => Network::new(layers)?,
            };
            Ok(network)
        }
        (None, Some(path)) => Ok(persist::load(path)?),
        (None, None) => bail!("give either --layers or --fnnin"),
    }
}
