use crate::layers::dense::FullyConnectedLayer;
use crate::layers::input::InputLayer;

/// The one capability every layer shares.
pub trait NodeCount {
    fn nb_nodes(&self) -> usize;
}

/// Borrowed view over either kind of layer.
///
/// There are exactly two kinds; code that only needs the node count of "the
/// previous layer" goes through [`NodeCount`] and does not care which.
#[derive(Debug, Clone, Copy)]
pub enum LayerRef<'a> {
    Input(&'a InputLayer),
    FullyConnected(&'a FullyConnectedLayer),
}

impl NodeCount for LayerRef<'_> {
    fn nb_nodes(&self) -> usize {
        match self {
            LayerRef::Input(layer) => layer.nb_nodes(),
            LayerRef::FullyConnected(layer) => layer.nb_nodes(),
        }
    }
}
