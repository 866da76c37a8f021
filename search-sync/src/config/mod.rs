//! Configuration and dependency initialization for the search sync setup.

mod dependencies;
mod settings;

pub use dependencies::{load_index_config, Dependencies};
pub use settings::{ConnectionMode, Settings};
