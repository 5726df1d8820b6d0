use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::profile::OptimizationProfile;

/// Configuration from react-svg-icon-components.json
///
/// Required paths are optional at the type level so that a config without them
/// still loads; the generator reports them when it needs them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    #[serde(default)]
    pub icons_path: Option<Utf8PathBuf>,

    #[serde(default)]
    pub output_dir: Option<Utf8PathBuf>,

    #[serde(default)]
    pub jsx_runtime: JsxRuntime,

    #[serde(default = "default_typescript")]
    pub typescript: bool,

    #[serde(default = "default_component_prefix")]
    pub component_prefix: String,

    #[serde(default)]
    pub use_default_optimization: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svgo_config: Option<OptimizationProfile>,
}

/// JSX runtime the generated components target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsxRuntime {
    /// `import * as React from "react"` at the top of every component
    #[default]
    Classic,
    /// React 17+ automatic runtime, no React import
    Automatic,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            icons_path: None,
            output_dir: None,
            jsx_runtime: JsxRuntime::Classic,
            typescript: default_typescript(),
            component_prefix: default_component_prefix(),
            use_default_optimization: false,
            svgo_config: None,
        }
    }
}

impl GeneratorConfig {
    /// Extension of generated component files
    pub fn component_extension(&self) -> &'static str {
        if self.typescript { "tsx" } else { "jsx" }
    }

    /// Extension of the barrel index file
    pub fn index_extension(&self) -> &'static str {
        if self.typescript { "ts" } else { "js" }
    }
}

fn default_typescript() -> bool {
    true
}

fn default_component_prefix() -> String {
    "SvgIcon".to_string()
}
