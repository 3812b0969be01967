pub mod dense;
pub mod input;
pub mod layer;

pub use dense::FullyConnectedLayer;
pub use input::InputLayer;
pub use layer::{LayerRef, NodeCount};
