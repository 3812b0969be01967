pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod optim;
pub mod network;
pub mod train;
pub mod data;
pub mod persist;
pub mod canvas;
pub mod config;

// Convenience re-exports
pub use error::{DataError, FnnError};
pub use math::matrix::Matrix;
pub use layers::{FullyConnectedLayer, InputLayer, LayerRef, NodeCount};
pub use network::{Example, Gradients, Network};
pub use loss::cross_entropy::CrossEntropyLoss;
pub use optim::sgd::Sgd;
pub use train::{evaluate, train_loop, train_network, EpochStats, Evaluation, TrainConfig};
pub use canvas::{DigitCanvas, Guess};
pub use config::TrainSettings;
