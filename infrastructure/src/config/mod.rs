//! Configuration loading
//!
//! Raw TOML structures plus a figment-based loader that merges defaults,
//! the global config file, the project config file, and an explicit path.

mod file_config;
mod loader;

pub use file_config::{FileConfig, FilePipelineConfig, FileProviderConfig, FileProviderEndpoint};
pub use loader::ConfigLoader;
