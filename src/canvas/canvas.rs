use serde::Serialize;

use crate::error::FnnError;
use crate::math::matrix::Matrix;
use crate::network::Network;

/// Side of the drawing grid, in cells.
pub const GRID_SIDE: usize = 28;
/// Width of one cell in pointer coordinates.
pub const CELL_WIDTH: f64 = 10.0;
const MAX_INTENSITY: f64 = 255.0;

/// A 28x28 grid of intensities in [0, 255] that a user draws a digit on.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitCanvas {
    cells: Vec<f64>,
}

/// The network's reading of a canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guess {
    pub digit: usize,
    pub scores: Vec<f64>,
}

impl Default for DigitCanvas {
    fn default() -> Self {
        DigitCanvas::new()
    }
}

impl DigitCanvas {
    pub fn new() -> DigitCanvas {
        DigitCanvas { cells: vec![0.0; GRID_SIDE * GRID_SIDE] }
    }

    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = 0.0);
    }

    pub fn intensity(&self, i: usize, j: usize) -> f64 {
        self.cells[i * GRID_SIDE + j]
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&c| c == 0.0)
    }

    /// Inks cell `(i, j)`; a cell only ever gets darker.
    pub fn scan(&mut self, i: usize, j: usize, value: f64) {
        if i >= GRID_SIDE || j >= GRID_SIDE {
            return;
        }
        let cell = &mut self.cells[i * GRID_SIDE + j];
        *cell = cell.max(value.clamp(0.0, MAX_INTENSITY));
    }

    /// Applies the brush at pointer position `(x, y)` (x to the right, y
    /// down, `CELL_WIDTH` units per cell).
    ///
    /// The cell under the pointer gets full ink minus 20 per unit of
    /// off-centre distance. The vertical and horizontal neighbours on the
    /// pointer's side get ink proportional to how far the pointer leans
    /// toward them.
    pub fn stroke(&mut self, x: f64, y: f64) {
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return;
        }
        let i = (y / CELL_WIDTH).floor() as usize;
        let j = (x / CELL_WIDTH).floor() as usize;
        if i >= GRID_SIDE || j >= GRID_SIDE {
            return;
        }

        let half = CELL_WIDTH / 2.0;
        let lean_y = (i as f64 * CELL_WIDTH - y + half) / half;
        let lean_x = (j as f64 * CELL_WIDTH - x + half) / half;
        // Positive lean means the pointer sits in the upper/left half.
        let (coeff_y, down) = if lean_y < 0.0 { (-lean_y, true) } else { (lean_y, false) };
        let (coeff_x, right) = if lean_x < 0.0 { (-lean_x, true) } else { (lean_x, false) };

        self.scan(i, j, MAX_INTENSITY - 20.0 * (coeff_y + coeff_x));
        if i > 0 && i < GRID_SIDE - 1 {
            let ni = if down { i + 1 } else { i - 1 };
            self.scan(ni, j, MAX_INTENSITY * coeff_y);
        }
        if j > 0 && j < GRID_SIDE - 1 {
            let nj = if right { j + 1 } else { j - 1 };
            self.scan(i, nj, MAX_INTENSITY * coeff_x);
        }
    }

    /// The grid as a `784 x 1` network input scaled to [0, 1].
    pub fn to_input(&self) -> Matrix {
        Matrix::column(self.cells.iter().map(|c| c / MAX_INTENSITY).collect())
    }

    /// Runs the network on the current drawing.
    pub fn guess(&self, network: &Network) -> Result<Guess, FnnError> {
        guess_input(network, &self.to_input())
    }
}

/// Runs the network on an input column and picks the best-scoring class.
pub fn guess_input(network: &Network, input: &Matrix) -> Result<Guess, FnnError> {
    let output = network.feedforward(input)?;
    Ok(Guess {
        digit: output.argmax(),
        scores: output.into_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centred_stroke_inks_only_its_cell() {
        let mut canvas = DigitCanvas::new();
        canvas.stroke(105.0, 55.0); // centre of row 5, column 10
        assert_eq!(canvas.intensity(5, 10), 255.0);
        assert_eq!(canvas.intensity(4, 10), 0.0);
        assert_eq!(canvas.intensity(5, 9), 0.0);
    }

    #[test]
    fn off_centre_stroke_bleeds_toward_pointer() {
        let mut canvas = DigitCanvas::new();
        // Row 5 spans y in [50, 60); y = 58.5 leans 0.7 toward row 6.
        canvas.stroke(105.0, 58.5);
        assert!((canvas.intensity(5, 10) - (255.0 - 20.0 * 0.7)).abs() < 1e-9);
        assert!((canvas.intensity(6, 10) - 255.0 * 0.7).abs() < 1e-9);
        assert_eq!(canvas.intensity(4, 10), 0.0);
    }

    #[test]
    fn ink_never_lightens_and_reset_clears() {
        let mut canvas = DigitCanvas::new();
        canvas.scan(3, 3, 200.0);
        canvas.scan(3, 3, 50.0);
        canvas.scan(3, 4, 900.0);
        assert_eq!(canvas.intensity(3, 3), 200.0);
        assert_eq!(canvas.intensity(3, 4), 255.0);
        canvas.reset();
        assert!(canvas.is_blank());
    }

    #[test]
    fn strokes_outside_the_grid_are_ignored() {
        let mut canvas = DigitCanvas::new();
        canvas.stroke(-5.0, 20.0);
        canvas.stroke(20.0, 280.0);
        canvas.stroke(f64::NAN, 3.0);
        assert!(canvas.is_blank());
    }

    #[test]
    fn guess_reports_one_score_per_class() {
        let network = Network::with_seed(&[784, 10], 5).unwrap();
        let mut canvas = DigitCanvas::new();
        canvas.stroke(140.0, 140.0);
        let guess = canvas.guess(&network).unwrap();
        assert_eq!(guess.scores.len(), 10);
        assert!(guess.digit < 10);
        let best = guess.scores.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(guess.scores[guess.digit], best);
    }
}
