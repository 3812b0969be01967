pub mod draw;
pub mod guess;
