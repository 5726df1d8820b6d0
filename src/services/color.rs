//! Multi-color heuristic.
//!
//! Counts distinct color literals in raw SVG text. Icons with at most one
//! literal are treated as single-color and become candidates for `currentColor`
//! recoloring; anything with more is left alone.
//!
//! This is a textual proxy, not a paint analysis. It does not see named colors
//! (`red`), `currentColor`, `none`, `url(#gradient)` paint servers, or
//! `rgba(`/`hsla(` functions, and `#FFF` and `#fff` count as two colors.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Hex colors (6 digits, else 3) and the `rgb(` / `hsl(` function openers
static COLOR_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#(?:[0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})|rgb\(|hsl\(").expect("Invalid color regex")
});

/// Decides whether an icon's artwork uses more than one color.
#[cfg_attr(test, mockall::automock)]
pub trait ColorClassifier {
    fn is_multi_color(&self, svg: &str) -> bool;
}

/// Classifier backed by distinct color-literal counting
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralColorClassifier;

impl ColorClassifier for LiteralColorClassifier {
    fn is_multi_color(&self, svg: &str) -> bool {
        is_multi_color_svg(svg)
    }
}

/// Distinct color literals in `svg`, in no particular order
pub fn color_literals(svg: &str) -> HashSet<&str> {
    COLOR_LITERAL.find_iter(svg).map(|m| m.as_str()).collect()
}

/// True when `svg` contains more than one distinct color literal
pub fn is_multi_color_svg(svg: &str) -> bool {
    let literals = color_literals(svg);
    tracing::trace!("Color literals found: {:?}", literals);
    literals.len() > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_distinct_hex_is_multi_color() {
        let svg = r##"<svg><rect fill="#FF0000"/><circle fill="#00FF00"/></svg>"##;
        assert!(is_multi_color_svg(svg));
    }

    #[test]
    fn test_repeated_hex_is_single_color() {
        let svg = r##"<svg><rect fill="#FF0000"/><circle fill="#FF0000"/></svg>"##;
        assert!(!is_multi_color_svg(svg));
    }

    #[test]
    fn test_named_colors_are_invisible() {
        assert!(!is_multi_color_svg(r#"<svg fill="red"/>"#));
        assert!(!is_multi_color_svg(
            r#"<svg><path fill="red"/><path fill="blue"/></svg>"#
        ));
    }

    #[test]
    fn test_case_sensitive_literals() {
        let svg = r##"<svg><path fill="#FFF"/><path stroke="#fff"/></svg>"##;
        assert!(is_multi_color_svg(svg));
    }

    #[test]
    fn test_function_openers() {
        // rgb( and hsl( are one literal each, whatever their arguments
        let svg = r#"<svg><path fill="rgb(1,2,3)"/><path fill="rgb(4,5,6)"/></svg>"#;
        assert!(!is_multi_color_svg(svg));

        let svg = r#"<svg><path fill="rgb(1,2,3)"/><path fill="hsl(4,5%,6%)"/></svg>"#;
        assert!(is_multi_color_svg(svg));

        let svg = r#"<svg><path fill="rgba(1,2,3,0.5)"/><path fill="hsla(4,5%,6%,1)"/></svg>"#;
        assert_eq!(color_literals(svg).len(), 0);
    }

    #[test]
    fn test_hex_lengths() {
        assert_eq!(
            color_literals(r##"<path fill="#abcdef"/>"##),
            HashSet::from(["#abcdef"])
        );
        assert_eq!(
            color_literals(r##"<path fill="#abc"/>"##),
            HashSet::from(["#abc"])
        );
        // 8-digit hex is seen through its first six digits
        assert_eq!(
            color_literals(r##"<path fill="#11223344"/>"##),
            HashSet::from(["#112233"])
        );
    }

    #[test]
    fn test_mock_classifier_is_usable_through_trait() {
        let mut mock = MockColorClassifier::new();
        mock.expect_is_multi_color().returning(|_| true);
        assert!(mock.is_multi_color("<svg/>"));
    }

    proptest! {
        #[test]
        fn prop_single_literal_repeated_is_single_color(
            hex in "[0-9a-f]{6}",
            repeats in 1usize..8,
        ) {
            let body: String = (0..repeats)
                .map(|_| format!(r##"<path fill="#{}"/>"##, hex))
                .collect();
            let svg = format!("<svg>{}</svg>", body);
            prop_assert!(!is_multi_color_svg(&svg));
        }

        #[test]
        fn prop_two_distinct_literals_are_multi_color(
            a in "[0-9a-f]{6}",
            b in "[0-9a-f]{6}",
        ) {
            prop_assume!(a != b);
            let svg = format!(r##"<svg><path fill="#{}"/><path fill="#{}"/></svg>"##, a, b);
            prop_assert!(is_multi_color_svg(&svg));
        }

        #[test]
        fn prop_text_without_hash_or_functions_is_single_color(text in "[a-z <>=\"/]{0,200}") {
            prop_assert!(!is_multi_color_svg(&text));
        }
    }
}
