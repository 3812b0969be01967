pub mod idx;
pub mod image;

pub use idx::{load_mnist, parse_idx_pair, MnistSet, MNIST_CLASSES};
pub use self::image::{image_bytes_to_input, image_file_to_input};
