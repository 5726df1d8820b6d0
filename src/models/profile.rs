use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An optimization pipeline in SVGO's configuration shape.
///
/// ```json
/// { "multipass": false, "plugins": ["removeDimensions", { "name": "cleanupIds", "params": { "remove": true } }] }
/// ```
///
/// Without a `plugins` key the profile runs `preset-default`, as SVGO does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multipass: Option<bool>,

    #[serde(default = "default_plugins")]
    pub plugins: Vec<PluginSpec>,
}

fn default_plugins() -> Vec<PluginSpec> {
    vec![PluginSpec::named("preset-default")]
}

/// One entry of a profile's plugin list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PluginSpec {
    /// Bare pass name, run with its default parameters
    Name(String),

    /// Pass name with parameters
    Configured {
        name: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<Value>,

        /// Keys written next to `name` instead of under `params`
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl PluginSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn with_params(name: impl Into<String>, params: Value) -> Self {
        Self::Configured {
            name: name.into(),
            params: Some(params),
            extra: Map::new(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Configured { name, .. } => name,
        }
    }

    /// Look up a parameter, preferring `params` over top-level keys
    pub fn param(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Name(_) => None,
            Self::Configured { params, extra, .. } => params
                .as_ref()
                .and_then(|p| p.get(key))
                .or_else(|| extra.get(key)),
        }
    }

    pub fn bool_param(&self, key: &str) -> Option<bool> {
        self.param(key).and_then(Value::as_bool)
    }
}

impl OptimizationProfile {
    pub fn new(plugins: Vec<PluginSpec>) -> Self {
        Self {
            multipass: None,
            plugins,
        }
    }

    /// Names of the configured plugins, in order
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(PluginSpec::name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugin_names().any(|n| n == name)
    }
}
