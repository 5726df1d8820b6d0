//! Services module - the icon generation pipeline.
//!
//! # Components
//!
//! - [`IconGenerator`]: the batch loop. Enumerates `*.svg` inputs, rejects
//!   component name collisions, transforms each icon into a staging directory,
//!   writes the barrel index and finally publishes everything into `outputDir`.
//!
//! - [`color`]: the multi-color heuristic behind [`ColorClassifier`]. Counts
//!   distinct color literals to decide whether an icon can be recolored with
//!   `currentColor`.
//!
//! - [`profile`]: picks the optimization profile per icon. An explicit
//!   `svgoConfig` wins, then `useDefaultOptimization`, then a profile
//!   synthesized from the heuristic.
//!
//! - [`svg`]: the [`ComponentTransformer`] seam and its native implementation
//!   (quick-xml parsing, SVGO-named optimization passes, JSX emission).
//!
//! # Usage Example
//!
//! ```ignore
//! use svg_icon_components::services::{IconGenerator, LiteralColorClassifier, NativeTransformer};
//!
//! let generator = IconGenerator::new(&config, NativeTransformer::new(), LiteralColorClassifier);
//! match generator.run().await? {
//!     GenerationOutcome::NoIcons { .. } => println!("nothing to do"),
//!     GenerationOutcome::Generated(summary) => println!("{summary}"),
//! }
//! ```

pub mod color;
pub mod generator;
pub mod profile;
pub mod svg;

pub use color::{ColorClassifier, LiteralColorClassifier, is_multi_color_svg};
pub use generator::{GenerateError, GenerationOutcome, IconGenerator, check_name_collisions};
pub use profile::{SelectedProfile, select_profile, synthesize_profile};
pub use svg::{ComponentTransformer, ExpandProps, NativeTransformer, TransformError, TransformOptions, TransformState};
