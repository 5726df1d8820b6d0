//! Data models for the icon generator.
//!
//! - [`GeneratorConfig`]: settings loaded from `react-svg-icon-components.json`
//! - [`IconRecord`]: one input SVG and the component name derived from it
//! - [`OptimizationProfile`]: an SVGO-shaped list of optimization passes

pub mod config;
pub mod icon;
pub mod profile;

pub use config::{GeneratorConfig, JsxRuntime};
pub use icon::{IconRecord, SVG_SUFFIX, component_name};
pub use profile::{OptimizationProfile, PluginSpec};
