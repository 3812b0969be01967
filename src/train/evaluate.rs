use log::info;

use crate::error::FnnError;
use crate::network::{Example, Network};

/// Classification score of a network over a labelled set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    /// Fraction of correct guesses in [0, 1]; 0 for an empty set.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Counts the examples whose highest output matches the hot label.
pub fn evaluate(network: &Network, examples: &[Example]) -> Result<Evaluation, FnnError> {
    let mut correct = 0;
    for example in examples {
        network.check_example(example)?;
        let output = network.feedforward(&example.input)?;
        if output.argmax() == example.label() {
            correct += 1;
        }
    }
    let evaluation = Evaluation { correct, total: examples.len() };
    info!(
        "evaluated {} examples: {} correct ({:.2}%)",
        evaluation.total,
        evaluation.correct,
        evaluation.accuracy() * 100.0
    );
    Ok(evaluation)
}
