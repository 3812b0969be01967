pub mod model;

pub use model::{load, load_json, load_text, save, save_json, save_text, ModelFile};
