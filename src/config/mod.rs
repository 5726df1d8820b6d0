use crate::models::GeneratorConfig;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "react-svg-icon-components.json";

/// Configuration body printed when no config file exists
pub const EXAMPLE_CONFIG: &str = r#"{
  "iconsPath": "icons",
  "outputDir": "ui-kit/icons",
  "jsxRuntime": "classic",
  "typescript": true,
  "useDefaultOptimization": true,
  "componentPrefix": "Icon"
}"#;

/// Errors that can occur while loading the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file \"{0}\" not found")]
    NotFound(Utf8PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Instructions for creating a config file, shown next to [`ConfigError::NotFound`]
    pub fn remediation(&self) -> Option<String> {
        match self {
            Self::NotFound(path) => {
                let file_name = path.file_name().unwrap_or(CONFIG_FILE_NAME);
                Some(format!(
                    "To create a new config file, run the following command:\n   touch {}\n\nThen, add following config into created file:\n{}",
                    file_name, EXAMPLE_CONFIG
                ))
            }
            _ => None,
        }
    }
}

/// Configuration manager for locating and loading the generator config.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Look for [`CONFIG_FILE_NAME`] inside `dir`.
    pub fn new<P: AsRef<Utf8Path>>(dir: P) -> Self {
        Self {
            config_path: dir.as_ref().join(CONFIG_FILE_NAME),
        }
    }

    /// Use an explicit config file path.
    pub fn with_path<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Look for [`CONFIG_FILE_NAME`] in the process working directory.
    pub fn from_current_dir() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|e| anyhow::anyhow!("Working directory is not valid UTF-8: {}", e))?;
        Ok(Self::new(cwd))
    }

    /// Load and parse the configuration file.
    ///
    /// Unlike optional settings files, a missing generator config is fatal:
    /// there is nothing to generate without `iconsPath` and `outputDir`.
    pub fn load(&self) -> Result<GeneratorConfig, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let file_contents = fs::read_to_string(&self.config_path).map_err(|source| {
            ConfigError::Read {
                path: self.config_path.clone(),
                source,
            }
        })?;

        let config: GeneratorConfig =
            serde_json::from_str(&file_contents).map_err(|source| ConfigError::Parse {
                path: self.config_path.clone(),
                source,
            })?;

        tracing::info!("Loaded config from {}", self.config_path);
        tracing::debug!(
            "Config - icons: {:?}, output: {:?}, runtime: {:?}, typescript: {}, prefix: {}",
            config.icons_path,
            config.output_dir,
            config.jsx_runtime,
            config.typescript,
            config.component_prefix
        );

        Ok(config)
    }

    /// Get the configuration file path.
    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}
