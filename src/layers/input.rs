use crate::layers::layer::NodeCount;

/// The raw feature vector. Holds no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLayer {
    nb_nodes: usize,
}

impl InputLayer {
    pub fn new(nb_nodes: usize) -> InputLayer {
        InputLayer { nb_nodes }
    }
}

impl NodeCount for InputLayer {
    fn nb_nodes(&self) -> usize {
        self.nb_nodes
    }
}
