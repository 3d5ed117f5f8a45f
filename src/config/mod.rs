// Re-export all items from the submodules
mod env_vars;
mod settings;

pub use env_vars::{expand_env_vars, expand_with, normalize_path_for_os};
pub use settings::SupportSettings;
