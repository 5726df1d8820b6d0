// svg-icon-components - React icon components from a folder of SVG files
//
// This is the library crate containing the generation pipeline and data structures.
// The binary crate (main.rs) provides the CLI entry point.

pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod summary;

// Re-export commonly used types for convenience
pub use config::{CONFIG_FILE_NAME, ConfigError, ConfigManager};
pub use models::{GeneratorConfig, IconRecord, JsxRuntime, OptimizationProfile, PluginSpec};
pub use services::{GenerateError, GenerationOutcome, IconGenerator};
pub use summary::GenerationSummary;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
