//! SVG to React component transformation.
//!
//! The generator only talks to [`ComponentTransformer`]. [`NativeTransformer`]
//! is the built-in implementation: parse with quick-xml, run the optimization
//! passes of the selected profile, then emit JSX.

pub mod jsx;
pub mod optimize;
pub mod tree;

use crate::models::{JsxRuntime, OptimizationProfile};
use thiserror::Error;

pub use optimize::{Pass, engine_default_profile, resolve_passes};
pub use tree::{Document, Element, Node, parse_svg};

/// Errors raised while transforming one SVG
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Malformed SVG at byte {position}: {message}")]
    Xml { position: usize, message: String },

    #[error("Element <{0}> is never closed")]
    UnclosedElement(String),

    #[error("No root element found")]
    NoRootElement,

    #[error("Root element is <{0}>, expected <svg>")]
    UnexpectedRoot(String),
}

/// Where caller props are spread on the root `<svg>`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpandProps {
    /// Before the element's own attributes, which then win
    Start,
    /// After the element's own attributes, so caller props win
    #[default]
    End,
    /// Component takes no props
    None,
}

/// Options for one transformation
#[derive(Debug, Clone, Copy)]
pub struct TransformOptions<'a> {
    /// Run the optimization step before emitting JSX
    pub optimize: bool,
    /// Profile for the optimization step; `None` uses [`engine_default_profile`]
    pub svgo_config: Option<&'a OptimizationProfile>,
    /// Replace width/height with `1em`
    pub icon: bool,
    pub typescript: bool,
    pub jsx_runtime: JsxRuntime,
    pub expand_props: ExpandProps,
}

impl Default for TransformOptions<'_> {
    fn default() -> Self {
        Self {
            optimize: true,
            svgo_config: None,
            icon: false,
            typescript: false,
            jsx_runtime: JsxRuntime::Classic,
            expand_props: ExpandProps::End,
        }
    }
}

/// Per-call naming state
#[derive(Debug, Clone, Copy)]
pub struct TransformState<'a> {
    pub component_name: &'a str,
}

/// Turns SVG markup into component source code.
pub trait ComponentTransformer {
    fn transform(
        &self,
        svg: &str,
        options: &TransformOptions<'_>,
        state: &TransformState<'_>,
    ) -> Result<String, TransformError>;
}

/// Built-in transformer: quick-xml parse, optimization passes, JSX emission
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeTransformer;

impl NativeTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl ComponentTransformer for NativeTransformer {
    fn transform(
        &self,
        svg: &str,
        options: &TransformOptions<'_>,
        state: &TransformState<'_>,
    ) -> Result<String, TransformError> {
        let mut doc = parse_svg(svg)?;

        if options.optimize {
            match options.svgo_config {
                Some(profile) => optimize::optimize(&mut doc, profile, state.component_name),
                None => optimize::optimize(&mut doc, &engine_default_profile(), state.component_name),
            }
        }

        let root = doc.root().ok_or(TransformError::NoRootElement)?;
        Ok(jsx::render_component(root, state.component_name, options))
    }
}
