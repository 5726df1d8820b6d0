//! Optimization profile selection.
//!
//! An explicit `svgoConfig` always wins, then `useDefaultOptimization`. Only
//! when neither is set is a profile synthesized per icon, recoloring to
//! `currentColor` when the icon looks single-color.

use super::color::ColorClassifier;
use crate::models::{GeneratorConfig, OptimizationProfile, PluginSpec};
use serde_json::json;

/// Cleanup passes appended after the preset, in order
const CLEANUP_PASSES: &[&str] = &[
    "removeDimensions",
    "convertStyleToAttrs",
    "cleanupAttrs",
    "removeEmptyContainers",
    "removeHiddenElems",
    "removeMetadata",
    "collapseGroups",
];

/// The profile an icon is transformed with
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedProfile<'a> {
    /// `useDefaultOptimization`: the engine's own defaults
    EngineDefaults,
    /// `svgoConfig` from the config file
    UserSupplied(&'a OptimizationProfile),
    /// Built for this icon from the multi-color heuristic
    Synthesized {
        profile: OptimizationProfile,
        multi_color: bool,
    },
}

impl SelectedProfile<'_> {
    /// Profile to hand to the transformer; `None` means engine defaults
    pub fn as_profile(&self) -> Option<&OptimizationProfile> {
        match self {
            Self::EngineDefaults => None,
            Self::UserSupplied(profile) => Some(profile),
            Self::Synthesized { profile, .. } => Some(profile),
        }
    }
}

/// True when profiles are synthesized per icon rather than shared by the batch
pub fn synthesizes_per_icon(config: &GeneratorConfig) -> bool {
    config.svgo_config.is_none() && !config.use_default_optimization
}

/// Pick the optimization profile for one icon.
///
/// The classifier is consulted only when a profile has to be synthesized.
pub fn select_profile<'a, C>(
    config: &'a GeneratorConfig,
    classifier: &C,
    svg: &str,
) -> SelectedProfile<'a>
where
    C: ColorClassifier + ?Sized,
{
    if let Some(profile) = &config.svgo_config {
        return SelectedProfile::UserSupplied(profile);
    }
    if config.use_default_optimization {
        return SelectedProfile::EngineDefaults;
    }

    let multi_color = classifier.is_multi_color(svg);
    SelectedProfile::Synthesized {
        profile: synthesize_profile(multi_color),
        multi_color,
    }
}

/// Build the heuristic profile.
///
/// Base: `preset-default` keeping the viewBox, then the cleanup passes and
/// id removal. Single-color icons also get every color forced to `currentColor`.
pub fn synthesize_profile(multi_color: bool) -> OptimizationProfile {
    let mut plugins = vec![PluginSpec::with_params(
        "preset-default",
        json!({ "overrides": { "removeViewBox": false } }),
    )];
    plugins.extend(CLEANUP_PASSES.iter().map(|&name| PluginSpec::named(name)));
    plugins.push(PluginSpec::with_params("cleanupIds", json!({ "remove": true })));

    if !multi_color {
        plugins.push(PluginSpec::with_params(
            "convertColors",
            json!({ "currentColor": true }),
        ));
    }

    OptimizationProfile::new(plugins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::color::{LiteralColorClassifier, MockColorClassifier};

    #[test]
    fn test_synthesized_pipeline_order() {
        let profile = synthesize_profile(false);
        let names: Vec<&str> = profile.plugin_names().collect();
        assert_eq!(
            names,
            [
                "preset-default",
                "removeDimensions",
                "convertStyleToAttrs",
                "cleanupAttrs",
                "removeEmptyContainers",
                "removeHiddenElems",
                "removeMetadata",
                "collapseGroups",
                "cleanupIds",
                "convertColors",
            ]
        );
        assert_eq!(profile.plugins[8].bool_param("remove"), Some(true));
        assert_eq!(profile.plugins[9].bool_param("currentColor"), Some(true));
    }

    #[test]
    fn test_multi_color_profile_keeps_colors() {
        let profile = synthesize_profile(true);
        assert!(!profile.contains("convertColors"));
        assert_eq!(profile.plugin_names().last(), Some("cleanupIds"));
    }

    #[test]
    fn test_user_profile_wins_without_classifying() {
        let config = GeneratorConfig {
            svgo_config: Some(OptimizationProfile::new(vec![PluginSpec::named("removeTitle")])),
            use_default_optimization: true,
            ..GeneratorConfig::default()
        };
        let mut classifier = MockColorClassifier::new();
        classifier.expect_is_multi_color().never();

        let selected = select_profile(&config, &classifier, "<svg/>");
        assert_eq!(
            selected,
            SelectedProfile::UserSupplied(config.svgo_config.as_ref().unwrap())
        );
        assert!(!synthesizes_per_icon(&config));
    }

    #[test]
    fn test_default_optimization_skips_classifier() {
        let config = GeneratorConfig {
            use_default_optimization: true,
            ..GeneratorConfig::default()
        };
        let mut classifier = MockColorClassifier::new();
        classifier.expect_is_multi_color().never();

        let selected = select_profile(&config, &classifier, "<svg/>");
        assert_eq!(selected, SelectedProfile::EngineDefaults);
        assert!(selected.as_profile().is_none());
    }

    #[test]
    fn test_synthesis_consults_classifier_once_per_icon() {
        let config = GeneratorConfig::default();
        let mut classifier = MockColorClassifier::new();
        classifier
            .expect_is_multi_color()
            .withf(|svg: &str| svg == "<svg/>")
            .times(1)
            .return_const(true);

        let selected = select_profile(&config, &classifier, "<svg/>");
        assert!(matches!(
            selected,
            SelectedProfile::Synthesized { multi_color: true, .. }
        ));
        assert!(synthesizes_per_icon(&config));
    }

    #[test]
    fn test_literal_classifier_drives_recoloring() {
        let config = GeneratorConfig::default();
        let single = select_profile(&config, &LiteralColorClassifier, r##"<svg fill="#000"/>"##);
        let multi = select_profile(
            &config,
            &LiteralColorClassifier,
            r##"<svg><path fill="#000"/><path fill="#fff"/></svg>"##,
        );

        assert!(single.as_profile().unwrap().contains("convertColors"));
        assert!(!multi.as_profile().unwrap().contains("convertColors"));
    }
}
