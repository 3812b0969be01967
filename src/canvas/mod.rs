pub mod canvas;

pub use canvas::{guess_input, DigitCanvas, Guess, CELL_WIDTH, GRID_SIDE};
