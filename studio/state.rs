use std::sync::Arc;

use digit_scanner::canvas::GRID_SIDE;
use digit_scanner::Network;

pub type SharedState = Arc<StudioState>;

/// Everything the request handlers need: the network being served and where
/// it was loaded from.
#[derive(Debug)]
pub struct StudioState {
    pub network: Network,
    pub model_name: String,
}

impl StudioState {
    /// Fails unless the network reads a full drawing grid.
    pub fn new(network: Network, model_name: String) -> Result<StudioState, String> {
        let expected = GRID_SIDE * GRID_SIDE;
        if network.input_size() != expected {
            return Err(format!(
                "model {} takes {} inputs, the drawing pad gives {}",
                model_name,
                network.input_size(),
                expected
            ));
        }
        Ok(StudioState { network, model_name })
    }
}
