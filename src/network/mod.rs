pub mod example;
pub mod gradients;
pub mod network;

pub use example::Example;
pub use gradients::Gradients;
pub use network::Network;
