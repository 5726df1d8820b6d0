use super::color::ColorClassifier;
use super::profile::{SelectedProfile, select_profile, synthesizes_per_icon};
use super::svg::{ComponentTransformer, ExpandProps, TransformError, TransformOptions, TransformState};
use crate::models::{GeneratorConfig, IconRecord};
use crate::summary::GenerationSummary;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use tempfile::TempDir;
use thiserror::Error;
use tokio::fs;

/// Prefix of the staging directory created next to the output directory
const STAGING_PREFIX: &str = ".svg-icon-components-";

/// Errors that abort a generator run
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Config file does not set \"{0}\"")]
    MissingSetting(&'static str),

    #[error("Icons folder \"{0}\" does not exist")]
    InputDirMissing(Utf8PathBuf),

    #[error("Output directory {output_dir} contains {inner}, which would be deleted when the output is replaced")]
    UnsafeOutputDir {
        output_dir: Utf8PathBuf,
        inner: Utf8PathBuf,
    },

    #[error("{first} and {second} both generate component {component}")]
    NameCollision {
        component: String,
        first: Utf8PathBuf,
        second: Utf8PathBuf,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to transform {path}: {source}")]
    Transform {
        path: Utf8PathBuf,
        #[source]
        source: TransformError,
    },
}

impl GenerateError {
    fn io(path: &Utf8Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// How a run ended
#[derive(Debug)]
pub enum GenerationOutcome {
    /// The icons folder holds no `.svg` files; nothing was written
    NoIcons { icons_path: Utf8PathBuf },
    Generated(GenerationSummary),
}

/// Generates one component per SVG icon plus a barrel index.
///
/// Output is written to a staging directory first and only replaces the
/// contents of `outputDir` once every icon and the index succeeded.
pub struct IconGenerator<'a, T, C> {
    config: &'a GeneratorConfig,
    transformer: T,
    classifier: C,
}

impl<'a, T, C> IconGenerator<'a, T, C>
where
    T: ComponentTransformer,
    C: ColorClassifier,
{
    pub fn new(config: &'a GeneratorConfig, transformer: T, classifier: C) -> Self {
        Self {
            config,
            transformer,
            classifier,
        }
    }

    /// Run the whole batch.
    pub async fn run(&self) -> Result<GenerationOutcome, GenerateError> {
        let icons_path = self
            .config
            .icons_path
            .as_deref()
            .ok_or(GenerateError::MissingSetting("iconsPath"))?;

        let icons_exist = fs::try_exists(icons_path)
            .await
            .map_err(GenerateError::io(icons_path))?;
        if !icons_exist {
            return Err(GenerateError::InputDirMissing(icons_path.to_path_buf()));
        }

        let icons = self.enumerate_icons(icons_path).await?;
        if icons.is_empty() {
            tracing::info!("No SVG files in {}", icons_path);
            return Ok(GenerationOutcome::NoIcons {
                icons_path: icons_path.to_path_buf(),
            });
        }

        let output_dir = self
            .config
            .output_dir
            .as_deref()
            .ok_or(GenerateError::MissingSetting("outputDir"))?;

        check_name_collisions(&icons)?;
        check_output_dir(output_dir, icons_path).await?;

        fs::create_dir_all(output_dir)
            .await
            .map_err(GenerateError::io(output_dir))?;
        let staging = create_staging_dir(output_dir)?;
        let staging_path = Utf8Path::from_path(staging.path())
            .ok_or_else(|| GenerateError::Io {
                path: output_dir.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "staging directory path is not valid UTF-8",
                ),
            })?
            .to_path_buf();

        tracing::info!(
            "Generating {} components into {} (staging {})",
            icons.len(),
            output_dir,
            staging_path
        );
        tracing::debug!(
            "Optimization profile: {}",
            if synthesizes_per_icon(self.config) {
                "synthesized per icon"
            } else if self.config.svgo_config.is_some() {
                "svgoConfig from the config file"
            } else {
                "engine defaults"
            }
        );

        let mut summary = GenerationSummary::new(output_dir);
        let mut exports = Vec::with_capacity(icons.len());

        for icon in &icons {
            let bytes = self.generate_icon(icon, &staging_path).await?;
            summary.record_component(&icon.component_name, bytes);
            exports.push(icon.export_line());
        }

        let index_path = staging_path.join(format!("index.{}", self.config.index_extension()));
        fs::write(&index_path, exports.join("\n"))
            .await
            .map_err(GenerateError::io(&index_path))?;

        publish(&staging_path, output_dir).await?;
        drop(staging);

        let resolved = fs::canonicalize(output_dir)
            .await
            .ok()
            .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
            .unwrap_or_else(|| output_dir.to_path_buf());
        summary.finish(resolved);
        summary.log_summary();

        Ok(GenerationOutcome::Generated(summary))
    }

    /// List the icons in `icons_dir`, sorted by file name.
    ///
    /// Only names ending in `.svg` (case-sensitive) count.
    pub async fn enumerate_icons(&self, icons_dir: &Utf8Path) -> Result<Vec<IconRecord>, GenerateError> {
        let mut entries = fs::read_dir(icons_dir)
            .await
            .map_err(GenerateError::io(icons_dir))?;

        let mut icons = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(GenerateError::io(icons_dir))?
        {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                tracing::warn!("Skipping non UTF-8 file name in {}: {:?}", icons_dir, file_name);
                continue;
            };
            if let Some(icon) =
                IconRecord::from_file_name(icons_dir, file_name, &self.config.component_prefix)
            {
                icons.push(icon);
            }
        }

        icons.sort_by(|a, b| a.source_path.cmp(&b.source_path));
        tracing::debug!("Found {} SVG files in {}", icons.len(), icons_dir);
        Ok(icons)
    }

    /// Transform one icon into `dir`, returning the size of the written file
    async fn generate_icon(&self, icon: &IconRecord, dir: &Utf8Path) -> Result<u64, GenerateError> {
        let svg = fs::read_to_string(&icon.source_path)
            .await
            .map_err(GenerateError::io(&icon.source_path))?;

        let component = self.render_icon(icon, &svg)?;

        let file_path = dir.join(icon.component_file_name(self.config.component_extension()));
        fs::write(&file_path, component)
            .await
            .map_err(GenerateError::io(&file_path))?;

        let size = fs::metadata(&file_path)
            .await
            .map_err(GenerateError::io(&file_path))?
            .len();

        tracing::debug!("Generated {} ({} bytes)", file_path, size);
        Ok(size)
    }

    /// Run the transformer for one icon with its selected profile
    pub fn render_icon(&self, icon: &IconRecord, svg: &str) -> Result<String, GenerateError> {
        let selected = select_profile(self.config, &self.classifier, svg);
        if let SelectedProfile::Synthesized { multi_color, .. } = &selected {
            tracing::debug!(
                "{}: {}",
                icon.icon_name,
                if *multi_color {
                    "multi-color, keeping colors"
                } else {
                    "single-color, using currentColor"
                }
            );
        }

        let options = TransformOptions {
            optimize: true,
            svgo_config: selected.as_profile(),
            icon: false,
            typescript: self.config.typescript,
            jsx_runtime: self.config.jsx_runtime,
            expand_props: ExpandProps::End,
        };
        let state = TransformState {
            component_name: &icon.component_name,
        };

        self.transformer
            .transform(svg, &options, &state)
            .map_err(|source| GenerateError::Transform {
                path: icon.source_path.clone(),
                source,
            })
    }
}

/// Fail when two icons derive the same component name
pub fn check_name_collisions(icons: &[IconRecord]) -> Result<(), GenerateError> {
    let mut seen: HashMap<&str, &IconRecord> = HashMap::new();
    for icon in icons {
        if let Some(first) = seen.insert(&icon.component_name, icon) {
            return Err(GenerateError::NameCollision {
                component: icon.component_name.clone(),
                first: first.source_path.clone(),
                second: icon.source_path.clone(),
            });
        }
    }
    Ok(())
}

/// Parent of the staging directory for `output_dir`
fn staging_parent(output_dir: &Utf8Path) -> &Utf8Path {
    match output_dir.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    }
}

/// Refuse an output directory whose replacement would delete the staged
/// files or the icons themselves
async fn check_output_dir(output_dir: &Utf8Path, icons_path: &Utf8Path) -> Result<(), GenerateError> {
    let Ok(output) = fs::canonicalize(output_dir).await else {
        // Not created yet, so it cannot contain anything
        return Ok(());
    };

    for inner in [staging_parent(output_dir), icons_path] {
        let resolved = fs::canonicalize(inner)
            .await
            .map_err(GenerateError::io(inner))?;
        if resolved.starts_with(&output) {
            return Err(GenerateError::UnsafeOutputDir {
                output_dir: output_dir.to_path_buf(),
                inner: inner.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Staging directory beside `output_dir`, so publishing is a same-filesystem rename
fn create_staging_dir(output_dir: &Utf8Path) -> Result<TempDir, GenerateError> {
    let parent = staging_parent(output_dir);

    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent)
        .map_err(GenerateError::io(parent))
}

/// Empty `output_dir` and move every staged file into it
async fn publish(staging: &Utf8Path, output_dir: &Utf8Path) -> Result<(), GenerateError> {
    empty_dir(output_dir).await?;

    let mut entries = fs::read_dir(staging)
        .await
        .map_err(GenerateError::io(staging))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(GenerateError::io(staging))?
    {
        let target = output_dir.as_std_path().join(entry.file_name());
        fs::rename(entry.path(), &target)
            .await
            .map_err(GenerateError::io(output_dir))?;
    }

    tracing::debug!("Published staged output to {}", output_dir);
    Ok(())
}

/// Remove everything inside `dir`, keeping `dir` itself
async fn empty_dir(dir: &Utf8Path) -> Result<(), GenerateError> {
    let mut entries = fs::read_dir(dir).await.map_err(GenerateError::io(dir))?;
    while let Some(entry) = entries.next_entry().await.map_err(GenerateError::io(dir))? {
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(GenerateError::io(dir))?;
        let removed = if file_type.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };
        removed.map_err(GenerateError::io(dir))?;
    }
    Ok(())
}
