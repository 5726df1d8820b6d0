//! Optimization passes over the SVG tree.
//!
//! Pass names and parameters follow SVGO so that an existing `svgoConfig`
//! block can be pasted into the generator config. Only the passes in [`Pass`]
//! exist; other names are skipped with a warning.

use super::tree::{Document, Element, Node};
use crate::models::{OptimizationProfile, PluginSpec};
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Name of the preset bundling the default passes
pub const PRESET_DEFAULT: &str = "preset-default";

/// Upper bound on pipeline repetitions when `multipass` is on
const MAX_MULTIPASS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    RemoveDoctype,
    RemoveXmlProcInst,
    RemoveComments,
    RemoveMetadata,
    RemoveEditorsNsData,
    CleanupAttrs,
    CleanupIds,
    RemoveUselessDefs,
    ConvertColors,
    RemoveViewBox,
    RemoveHiddenElems,
    RemoveEmptyText,
    CollapseGroups,
    RemoveEmptyAttrs,
    RemoveEmptyContainers,
    RemoveTitle,
    RemoveDesc,
    RemoveDimensions,
    ConvertStyleToAttrs,
    PrefixIds,
}

impl Pass {
    /// Members of `preset-default`, in execution order
    pub const PRESET_DEFAULT: &'static [Pass] = &[
        Pass::RemoveDoctype,
        Pass::RemoveXmlProcInst,
        Pass::RemoveComments,
        Pass::RemoveMetadata,
        Pass::RemoveEditorsNsData,
        Pass::CleanupAttrs,
        Pass::CleanupIds,
        Pass::RemoveUselessDefs,
        Pass::ConvertColors,
        Pass::RemoveViewBox,
        Pass::RemoveHiddenElems,
        Pass::RemoveEmptyText,
        Pass::CollapseGroups,
        Pass::RemoveEmptyAttrs,
        Pass::RemoveEmptyContainers,
        Pass::RemoveTitle,
        Pass::RemoveDesc,
    ];

    const ALL: &'static [Pass] = &[
        Pass::RemoveDoctype,
        Pass::RemoveXmlProcInst,
        Pass::RemoveComments,
        Pass::RemoveMetadata,
        Pass::RemoveEditorsNsData,
        Pass::CleanupAttrs,
        Pass::CleanupIds,
        Pass::RemoveUselessDefs,
        Pass::ConvertColors,
        Pass::RemoveViewBox,
        Pass::RemoveHiddenElems,
        Pass::RemoveEmptyText,
        Pass::CollapseGroups,
        Pass::RemoveEmptyAttrs,
        Pass::RemoveEmptyContainers,
        Pass::RemoveTitle,
        Pass::RemoveDesc,
        Pass::RemoveDimensions,
        Pass::ConvertStyleToAttrs,
        Pass::PrefixIds,
    ];

    /// SVGO name of the pass
    pub fn name(self) -> &'static str {
        match self {
            Pass::RemoveDoctype => "removeDoctype",
            Pass::RemoveXmlProcInst => "removeXMLProcInst",
            Pass::RemoveComments => "removeComments",
            Pass::RemoveMetadata => "removeMetadata",
            Pass::RemoveEditorsNsData => "removeEditorsNSData",
            Pass::CleanupAttrs => "cleanupAttrs",
            Pass::CleanupIds => "cleanupIds",
            Pass::RemoveUselessDefs => "removeUselessDefs",
            Pass::ConvertColors => "convertColors",
            Pass::RemoveViewBox => "removeViewBox",
            Pass::RemoveHiddenElems => "removeHiddenElems",
            Pass::RemoveEmptyText => "removeEmptyText",
            Pass::CollapseGroups => "collapseGroups",
            Pass::RemoveEmptyAttrs => "removeEmptyAttrs",
            Pass::RemoveEmptyContainers => "removeEmptyContainers",
            Pass::RemoveTitle => "removeTitle",
            Pass::RemoveDesc => "removeDesc",
            Pass::RemoveDimensions => "removeDimensions",
            Pass::ConvertStyleToAttrs => "convertStyleToAttrs",
            Pass::PrefixIds => "prefixIds",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }
}

/// A pass with the parameters it was configured with
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredPass {
    pub pass: Pass,
    pub params: Map<String, Value>,
}

impl ConfiguredPass {
    fn new(pass: Pass) -> Self {
        Self {
            pass,
            params: Map::new(),
        }
    }

    fn bool_param(&self, key: &str, default: bool) -> bool {
        self.params.get(key).and_then(Value::as_bool).unwrap_or(default)
    }
}

/// Expand a profile into the ordered list of passes to run
pub fn resolve_passes(profile: &OptimizationProfile) -> Vec<ConfiguredPass> {
    let mut passes = Vec::new();

    for spec in &profile.plugins {
        if spec.name() == PRESET_DEFAULT {
            let overrides = spec.param("overrides").and_then(Value::as_object);
            for &pass in Pass::PRESET_DEFAULT {
                match overrides.and_then(|o| o.get(pass.name())) {
                    Some(Value::Bool(false)) => {
                        tracing::trace!("Preset member {} disabled", pass.name());
                    }
                    Some(Value::Object(params)) => passes.push(ConfiguredPass {
                        pass,
                        params: params.clone(),
                    }),
                    _ => passes.push(ConfiguredPass::new(pass)),
                }
            }
            continue;
        }

        match Pass::from_name(spec.name()) {
            Some(pass) => passes.push(ConfiguredPass {
                pass,
                params: spec_params(spec),
            }),
            None => tracing::warn!("Unknown optimization pass \"{}\", skipping", spec.name()),
        }
    }

    passes
}

/// Profile used when none is configured: the default preset, then `prefixIds`
/// so icons placed on one page keep distinct ids
pub fn engine_default_profile() -> OptimizationProfile {
    OptimizationProfile::new(vec![
        PluginSpec::named(PRESET_DEFAULT),
        PluginSpec::named(Pass::PrefixIds.name()),
    ])
}

fn spec_params(spec: &PluginSpec) -> Map<String, Value> {
    match spec {
        PluginSpec::Name(_) => Map::new(),
        PluginSpec::Configured { params, extra, .. } => {
            let mut merged = extra.clone();
            if let Some(Value::Object(params)) = params {
                merged.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            merged
        }
    }
}

/// Run every pass of `profile` over `doc`.
///
/// `id_prefix` is the `prefixIds` prefix when the pass sets none.
pub fn optimize(doc: &mut Document, profile: &OptimizationProfile, id_prefix: &str) {
    let passes = resolve_passes(profile);
    let rounds = if profile.multipass.unwrap_or(false) {
        MAX_MULTIPASS
    } else {
        1
    };

    for round in 0..rounds {
        let before = (rounds > 1).then(|| doc.clone());
        for pass in &passes {
            apply(doc, pass, id_prefix);
        }
        if before.as_ref() == Some(&*doc) {
            tracing::trace!("Optimization settled after {} rounds", round + 1);
            break;
        }
    }
}

fn apply(doc: &mut Document, configured: &ConfiguredPass, id_prefix: &str) {
    match configured.pass {
        Pass::RemoveDoctype => doc.nodes.retain(|n| !matches!(n, Node::Doctype(_))),
        Pass::RemoveXmlProcInst => doc.nodes.retain(|n| match n {
            Node::Declaration(_) => false,
            Node::ProcessingInstruction(pi) => !pi.starts_with("xml "),
            _ => true,
        }),
        Pass::RemoveComments => remove_comments(doc),
        Pass::RemoveMetadata => remove_elements_named(doc, "metadata"),
        Pass::RemoveTitle => remove_elements_named(doc, "title"),
        Pass::RemoveDesc => remove_elements_named(doc, "desc"),
        Pass::RemoveEditorsNsData => remove_editors_ns_data(doc),
        Pass::CleanupAttrs => for_each_element(doc, cleanup_attrs),
        Pass::RemoveEmptyAttrs => for_each_element(doc, remove_empty_attrs),
        Pass::CleanupIds => cleanup_ids(doc, configured),
        Pass::RemoveUselessDefs => for_each_element(doc, remove_useless_defs),
        Pass::ConvertColors => convert_colors(doc, configured),
        Pass::RemoveViewBox => remove_view_box(doc),
        Pass::RemoveHiddenElems => retain_elements(doc, &|el| !is_hidden(el)),
        Pass::RemoveEmptyText => retain_elements(doc, &|el| !is_empty_text(el)),
        Pass::CollapseGroups => collapse_groups(doc),
        Pass::RemoveEmptyContainers => remove_empty_containers(doc),
        Pass::RemoveDimensions => remove_dimensions(doc),
        Pass::ConvertStyleToAttrs => for_each_element(doc, convert_style_to_attrs),
        Pass::PrefixIds => prefix_ids(doc, configured, id_prefix),
    }
}

fn for_each_element(doc: &mut Document, mut f: impl FnMut(&mut Element)) {
    for node in &mut doc.nodes {
        if let Node::Element(el) = node {
            el.walk_mut(&mut f);
        }
    }
}

/// Drop descendant elements failing `keep`, bottom-up so a parent sees its final children
fn retain_elements(doc: &mut Document, keep: &dyn Fn(&Element) -> bool) {
    fn visit(el: &mut Element, keep: &dyn Fn(&Element) -> bool) {
        for child in el.child_elements_mut() {
            visit(child, keep);
        }
        el.children.retain(|n| n.as_element().is_none_or(keep));
    }

    if let Some(root) = doc.root_mut() {
        visit(root, keep);
    }
}

fn remove_elements_named(doc: &mut Document, name: &str) {
    retain_elements(doc, &|el| el.name != name);
}

fn remove_comments(doc: &mut Document) {
    fn keep(node: &Node) -> bool {
        // `<!--! ... -->` marks a legal comment
        !matches!(node, Node::Comment(text) if !text.starts_with('!'))
    }

    doc.nodes.retain(keep);
    for_each_element(doc, |el| el.children.retain(keep));
}

fn cleanup_attrs(el: &mut Element) {
    for value in el.attributes.values_mut() {
        *value = value.split_whitespace().collect::<Vec<_>>().join(" ");
    }
}

/// Conditional processing attributes stay even when empty
const CONDITIONAL_ATTRS: &[&str] = &["requiredFeatures", "requiredExtensions", "systemLanguage"];

fn remove_empty_attrs(el: &mut Element) {
    el.attributes
        .retain(|name, value| !value.is_empty() || CONDITIONAL_ATTRS.contains(&name.as_str()));
}

// --- editor namespaces ---

const EDITOR_NAMESPACES: &[&str] = &[
    "http://creativecommons.org/ns#",
    "http://inkscape.sourceforge.net/DTD/sodipodi-0.dtd",
    "http://ns.adobe.com/AdobeIllustrator/10.0/",
    "http://ns.adobe.com/AdobeSVGViewerExtensions/3.0/",
    "http://ns.adobe.com/Extensibility/1.0/",
    "http://ns.adobe.com/Flows/1.0/",
    "http://ns.adobe.com/GenericCustomNamespace/1.0/",
    "http://ns.adobe.com/Graphs/1.0/",
    "http://ns.adobe.com/ImageReplacement/1.0/",
    "http://ns.adobe.com/SaveForWeb/1.0/",
    "http://ns.adobe.com/Variables/1.0/",
    "http://ns.adobe.com/XPath/1.0/",
    "http://purl.org/dc/elements/1.1/",
    "http://schemas.microsoft.com/visio/2003/SVGExtensions/",
    "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd",
    "http://taptrix.com/vectorillustrator/svg_extensions",
    "http://www.bohemiancoding.com/sketch/ns",
    "http://www.figma.com/figma/ns",
    "http://www.inkscape.org/namespaces/inkscape",
    "http://www.serif.com/",
    "http://www.vector.evaxdesign.sk",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
];

fn remove_editors_ns_data(doc: &mut Document) {
    let mut prefixes = HashSet::new();
    if let Some(root) = doc.root() {
        root.walk(&mut |el| {
            for (name, value) in &el.attributes {
                if let Some(prefix) = name.strip_prefix("xmlns:") {
                    if EDITOR_NAMESPACES.contains(&value.as_str()) {
                        prefixes.insert(prefix.to_string());
                    }
                }
            }
        });
    }
    if prefixes.is_empty() {
        return;
    }

    let in_editor_ns = |name: &str| {
        name.split_once(':')
            .is_some_and(|(prefix, _)| prefixes.contains(prefix))
    };

    retain_elements(doc, &|el| !in_editor_ns(&el.name));
    for_each_element(doc, |el| {
        el.attributes.retain(|name, _| {
            let declares_editor_ns = name
                .strip_prefix("xmlns:")
                .is_some_and(|prefix| prefixes.contains(prefix));
            !declares_editor_ns && !in_editor_ns(name)
        });
    });
}

// --- ids ---

static URL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*['"]?#([^'")\s]+)['"]?\s*\)"#).expect("Invalid url() regex")
});

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn is_href(name: &str) -> bool {
    name == "href" || name.ends_with(":href")
}

/// Short id number `n`: a, b, ..., Z, aa, ab, ...
fn short_id(mut n: usize) -> String {
    let base = ID_ALPHABET.len();
    let mut out = Vec::new();
    loop {
        out.push(ID_ALPHABET[n % base]);
        if n < base {
            break;
        }
        n = n / base - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn cleanup_ids(doc: &mut Document, configured: &ConfiguredPass) {
    let remove = configured.bool_param("remove", true);
    let minify = configured.bool_param("minify", true);
    let force = configured.bool_param("force", false);
    let preserve: HashSet<String> = configured
        .params
        .get("preserve")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let preserve_prefixes: Vec<String> = configured
        .params
        .get("preservePrefixes")
        .and_then(Value::as_array)
        .map(|p| p.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default();

    let Some(root) = doc.root() else { return };

    // Styles and scripts may reference ids we cannot see
    let mut has_style_or_script = false;
    let mut ids = Vec::new();
    let mut referenced = HashSet::new();
    root.walk(&mut |el| {
        if el.name == "style" || el.name == "script" {
            has_style_or_script = true;
        }
        for (name, value) in &el.attributes {
            if name == "id" {
                ids.push(value.clone());
            } else if is_href(name) {
                if let Some(target) = value.strip_prefix('#') {
                    referenced.insert(target.to_string());
                }
            } else {
                for caps in URL_REFERENCE.captures_iter(value) {
                    referenced.insert(caps[1].to_string());
                }
            }
        }
    });
    if has_style_or_script && !force {
        tracing::debug!("cleanupIds skipped: document has <style> or <script>");
        return;
    }

    let is_preserved =
        |id: &str| preserve.contains(id) || preserve_prefixes.iter().any(|p| id.starts_with(p.as_str()));

    // Ids left as they are; a short id must not collide with them
    let kept: HashSet<&str> = ids
        .iter()
        .map(String::as_str)
        .filter(|id| is_preserved(id) || (!remove && !referenced.contains(*id)))
        .collect();

    let mut renames: HashMap<String, String> = HashMap::new();
    if minify {
        let mut counter = 0;
        for id in &ids {
            if !referenced.contains(id) || is_preserved(id) || renames.contains_key(id) {
                continue;
            }
            let new_id = loop {
                let candidate = short_id(counter);
                counter += 1;
                if !is_preserved(&candidate) && !kept.contains(candidate.as_str()) {
                    break candidate;
                }
            };
            renames.insert(id.clone(), new_id);
        }
    }

    for_each_element(doc, |el| {
        let unused = el
            .attr("id")
            .is_some_and(|id| remove && !referenced.contains(id) && !is_preserved(id));
        if unused {
            el.remove_attr("id");
        }
        if renames.is_empty() {
            return;
        }
        for (name, value) in el.attributes.iter_mut() {
            if name == "id" {
                if let Some(new_id) = renames.get(value.as_str()) {
                    *value = new_id.clone();
                }
            } else if is_href(name) {
                let new_target = value.strip_prefix('#').and_then(|t| renames.get(t));
                if let Some(new_id) = new_target {
                    *value = format!("#{}", new_id);
                }
            } else if URL_REFERENCE.is_match(value) {
                *value = URL_REFERENCE
                    .replace_all(value, |caps: &Captures<'_>| match renames.get(&caps[1]) {
                        Some(new_id) => format!("url(#{})", new_id),
                        None => caps[0].to_string(),
                    })
                    .into_owned();
            }
        }
    });
}

/// Prefix ids and their references so several icons can share a page
fn prefix_ids(doc: &mut Document, configured: &ConfiguredPass, default_prefix: &str) {
    let prefix = configured
        .params
        .get("prefix")
        .and_then(Value::as_str)
        .unwrap_or(default_prefix);
    let delim = configured
        .params
        .get("delim")
        .and_then(Value::as_str)
        .unwrap_or("__");
    if prefix.is_empty() {
        return;
    }

    let marker = format!("{}{}", prefix, delim);
    let prefixed = |id: &str| -> String {
        if id.starts_with(&marker) {
            id.to_string()
        } else {
            format!("{}{}", marker, id)
        }
    };

    for_each_element(doc, |el| {
        for (name, value) in el.attributes.iter_mut() {
            if name == "id" {
                *value = prefixed(value.as_str());
            } else if is_href(name) {
                let target = value.strip_prefix('#').map(|t| prefixed(t));
                if let Some(target) = target {
                    *value = format!("#{}", target);
                }
            } else if URL_REFERENCE.is_match(value) {
                *value = URL_REFERENCE
                    .replace_all(value, |caps: &Captures<'_>| format!("url(#{})", prefixed(&caps[1])))
                    .into_owned();
            }
        }
    });
}

// --- defs ---

fn remove_useless_defs(el: &mut Element) {
    if el.name != "defs" {
        return;
    }
    let children = std::mem::take(&mut el.children);
    el.children = collect_useful(children);
}

/// Keep elements that can be referenced (have an id) or style the document
fn collect_useful(nodes: Vec<Node>) -> Vec<Node> {
    let mut useful = Vec::new();
    for node in nodes {
        if let Node::Element(el) = node {
            if el.has_attr("id") || el.name == "style" {
                useful.push(Node::Element(el));
            } else {
                useful.extend(collect_useful(el.children));
            }
        }
    }
    useful
}

// --- colors ---

const COLOR_ATTRS: &[&str] = &[
    "color",
    "fill",
    "flood-color",
    "lighting-color",
    "stop-color",
    "stroke",
];

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgb\(\s*(\d+(?:\.\d+)?%?)\s*[,\s]\s*(\d+(?:\.\d+)?%?)\s*[,\s]\s*(\d+(?:\.\d+)?%?)\s*\)$")
        .expect("Invalid rgb() regex")
});

static LONG_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("Invalid hex regex"));

fn convert_colors(doc: &mut Document, configured: &ConfiguredPass) {
    let current_color = configured.params.get("currentColor");
    let rgb2hex = configured.bool_param("rgb2hex", true);
    let shorthex = configured.bool_param("shorthex", true);

    fn visit(el: &mut Element, convert: &dyn Fn(&str) -> Option<String>) {
        // Mask luminance depends on the literal colors
        if el.name == "mask" {
            return;
        }
        for (name, value) in el.attributes.iter_mut() {
            if COLOR_ATTRS.contains(&name.as_str()) {
                if let Some(converted) = convert(value.as_str()) {
                    *value = converted;
                }
            }
        }
        for child in el.child_elements_mut() {
            visit(child, convert);
        }
    }

    let convert = |value: &str| -> Option<String> {
        match current_color {
            Some(Value::Bool(true)) => to_current_color(value, None),
            Some(Value::String(matching)) => to_current_color(value, Some(matching.as_str())),
            _ => minify_color(value, rgb2hex, shorthex),
        }
    };

    if let Some(root) = doc.root_mut() {
        visit(root, &convert);
    }
}

fn to_current_color(value: &str, only: Option<&str>) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("currentColor")
        || trimmed.starts_with("url(")
    {
        return None;
    }
    match only {
        Some(matching) if !trimmed.eq_ignore_ascii_case(matching) => None,
        _ => Some("currentColor".to_string()),
    }
}

fn minify_color(value: &str, rgb2hex: bool, shorthex: bool) -> Option<String> {
    let mut color = value.trim().to_string();

    if rgb2hex {
        if let Some(caps) = RGB_FUNCTION.captures(&color) {
            let channels: Option<Vec<u8>> = (1..=3).map(|i| rgb_channel(&caps[i])).collect();
            if let Some(c) = channels {
                color = format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2]);
            }
        }
    }

    if color.starts_with('#') {
        color = color.to_ascii_lowercase();
    }

    if shorthex && LONG_HEX.is_match(&color) {
        let b = color.as_bytes();
        if b[1] == b[2] && b[3] == b[4] && b[5] == b[6] {
            color = format!("#{}{}{}", b[1] as char, b[3] as char, b[5] as char);
        }
    }

    (color != value).then_some(color)
}

fn rgb_channel(raw: &str) -> Option<u8> {
    let value = match raw.strip_suffix('%') {
        Some(percent) => percent.parse::<f64>().ok()? * 2.55,
        None => raw.parse::<f64>().ok()?,
    };
    Some(value.round().clamp(0.0, 255.0) as u8)
}

// --- dimensions ---

fn parse_length(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").parse().ok()
}

fn view_box_numbers(view_box: &str) -> Option<[f64; 4]> {
    let numbers: Vec<f64> = view_box
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<_, _>>()
        .ok()?;
    numbers.try_into().ok()
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn remove_view_box(doc: &mut Document) {
    let Some(root) = doc.root_mut() else { return };
    let (Some(view_box), Some(width), Some(height)) = (
        root.attr("viewBox").and_then(view_box_numbers),
        root.attr("width").and_then(parse_length),
        root.attr("height").and_then(parse_length),
    ) else {
        return;
    };

    if view_box == [0.0, 0.0, width, height] {
        root.remove_attr("viewBox");
    }
}

fn remove_dimensions(doc: &mut Document) {
    let Some(root) = doc.root_mut() else { return };

    if root.has_attr("viewBox") {
        root.remove_attr("width");
        root.remove_attr("height");
        return;
    }

    let (Some(width), Some(height)) = (
        root.attr("width").and_then(parse_length),
        root.attr("height").and_then(parse_length),
    ) else {
        return;
    };

    root.set_attr(
        "viewBox",
        format!("0 0 {} {}", format_number(width), format_number(height)),
    );
    root.remove_attr("width");
    root.remove_attr("height");
}

// --- hidden and empty elements ---

fn is_zero(el: &Element, attr: &str) -> bool {
    el.attr(attr).and_then(parse_length) == Some(0.0)
}

fn is_hidden(el: &Element) -> bool {
    if el.attr("display") == Some("none") {
        return true;
    }
    if el.attr("opacity").and_then(parse_length) == Some(0.0) && el.name != "clipPath" {
        return true;
    }
    match el.name.as_str() {
        "circle" => is_zero(el, "r"),
        "ellipse" => is_zero(el, "rx") || is_zero(el, "ry"),
        "rect" | "image" | "pattern" => is_zero(el, "width") || is_zero(el, "height"),
        "path" => el.attr("d").is_none_or(|d| d.trim().is_empty()),
        "polyline" | "polygon" => el.attr("points").is_none_or(|p| p.trim().is_empty()),
        _ => false,
    }
}

fn is_empty_text(el: &Element) -> bool {
    match el.name.as_str() {
        "text" | "tspan" => el.children.is_empty(),
        "tref" => !el.attributes.keys().any(|k| is_href(k)),
        _ => false,
    }
}

const CONTAINER_ELEMENTS: &[&str] = &[
    "a",
    "defs",
    "g",
    "glyph",
    "marker",
    "mask",
    "missing-glyph",
    "pattern",
    "svg",
    "switch",
    "symbol",
];

fn remove_empty_containers(doc: &mut Document) {
    retain_elements(doc, &|el| {
        let removable = CONTAINER_ELEMENTS.contains(&el.name.as_str())
            && el.children.is_empty()
            // A filter on an empty group can still paint
            && !(el.name == "g" && el.has_attr("filter"))
            // Referenced paint servers may be empty but still meaningful
            && !(matches!(el.name.as_str(), "pattern" | "mask") && el.has_attr("id"));
        !removable
    });
}

// --- groups ---

const INHERITABLE_ATTRS: &[&str] = &[
    "clip-rule",
    "color",
    "color-interpolation",
    "color-interpolation-filters",
    "color-profile",
    "color-rendering",
    "cursor",
    "direction",
    "dominant-baseline",
    "fill",
    "fill-opacity",
    "fill-rule",
    "font",
    "font-family",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "glyph-orientation-horizontal",
    "glyph-orientation-vertical",
    "image-rendering",
    "letter-spacing",
    "marker",
    "marker-end",
    "marker-mid",
    "marker-start",
    "paint-order",
    "pointer-events",
    "shape-rendering",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "text-anchor",
    "text-rendering",
    "visibility",
    "word-spacing",
    "writing-mode",
];

fn collapse_groups(doc: &mut Document) {
    fn visit(el: &mut Element) {
        for child in el.child_elements_mut() {
            visit(child);
        }
        if el.name == "switch" {
            return;
        }

        let mut collapsed = Vec::with_capacity(el.children.len());
        for node in std::mem::take(&mut el.children) {
            match node {
                Node::Element(mut group) if group.name == "g" => {
                    move_attrs_to_only_child(&mut group);
                    if group.attributes.is_empty() {
                        collapsed.extend(group.children);
                    } else {
                        collapsed.push(Node::Element(group));
                    }
                }
                other => collapsed.push(other),
            }
        }
        el.children = collapsed;
    }

    if let Some(root) = doc.root_mut() {
        visit(root);
    }
}

/// Push a group's attributes down to its single child element when that is lossless
fn move_attrs_to_only_child(group: &mut Element) {
    if group.attributes.is_empty() || group.children.len() != 1 {
        return;
    }
    if ["id", "class", "style", "filter"]
        .iter()
        .any(|a| group.has_attr(a))
    {
        return;
    }
    let clips = group.has_attr("clip-path") || group.has_attr("mask");
    let Some(Node::Element(child)) = group.children.first_mut() else {
        return;
    };
    if child.has_attr("id") {
        return;
    }
    if clips && child.has_attr("transform") {
        return;
    }

    // Check every attribute first so a failed move leaves both untouched
    let movable = group.attributes.keys().all(|name| {
        !child.has_attr(name) || name == "transform" || INHERITABLE_ATTRS.contains(&name.as_str())
    });
    if !movable {
        return;
    }

    for (name, value) in std::mem::take(&mut group.attributes) {
        if name == "transform" {
            let combined = match child.attr("transform") {
                Some(own) => format!("{} {}", value, own),
                None => value,
            };
            child.set_attr("transform", combined);
        } else if !child.has_attr(&name) {
            child.set_attr(name, value);
        }
    }
}

// --- styles ---

/// Presentation attributes a `style` declaration may be lifted into
fn is_presentation_attr(name: &str) -> bool {
    INHERITABLE_ATTRS.contains(&name)
        || matches!(
            name,
            "alignment-baseline"
                | "baseline-shift"
                | "clip"
                | "clip-path"
                | "display"
                | "enable-background"
                | "filter"
                | "flood-color"
                | "flood-opacity"
                | "lighting-color"
                | "mask"
                | "opacity"
                | "overflow"
                | "stop-color"
                | "stop-opacity"
                | "text-decoration"
                | "unicode-bidi"
                | "vector-effect"
        )
}

fn convert_style_to_attrs(el: &mut Element) {
    let Some(style) = el.attr("style").map(str::to_string) else {
        return;
    };

    let mut remaining = Vec::new();
    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            if !declaration.trim().is_empty() {
                remaining.push(declaration.trim().to_string());
            }
            continue;
        };
        let property = property.trim();
        let value = value.trim();
        if is_presentation_attr(property) && !value.contains("!important") {
            // Declarations win over attributes
            el.set_attr(property, value);
        } else {
            remaining.push(format!("{}:{}", property, value));
        }
    }

    if remaining.is_empty() {
        el.remove_attr("style");
    } else {
        el.set_attr("style", remaining.join(";"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::svg::tree::parse_svg;
    use serde_json::json;

    fn run(markup: &str, profile: serde_json::Value) -> Element {
        let profile: OptimizationProfile = serde_json::from_value(profile).unwrap();
        let mut doc = parse_svg(markup).unwrap();
        optimize(&mut doc, &profile, "Icon");
        doc.root().unwrap().clone()
    }

    fn names(el: &Element) -> Vec<&str> {
        el.child_elements().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_pass_names_round_trip() {
        for &pass in Pass::ALL {
            assert_eq!(Pass::from_name(pass.name()), Some(pass));
        }
        assert_eq!(Pass::from_name("removeXMLProcInst"), Some(Pass::RemoveXmlProcInst));
        assert_eq!(Pass::from_name("mergePaths"), None);
    }

    #[test]
    fn test_preset_overrides_disable_members() {
        let profile: OptimizationProfile = serde_json::from_value(json!({
            "plugins": [
                { "name": "preset-default", "params": { "overrides": { "removeViewBox": false } } },
                "removeDimensions",
                "unknownPass"
            ]
        }))
        .unwrap();

        let passes: Vec<Pass> = resolve_passes(&profile).into_iter().map(|p| p.pass).collect();
        assert!(!passes.contains(&Pass::RemoveViewBox));
        assert!(passes.contains(&Pass::CollapseGroups));
        assert_eq!(passes.last(), Some(&Pass::RemoveDimensions));
        assert_eq!(passes.len(), Pass::PRESET_DEFAULT.len());
    }

    #[test]
    fn test_preset_override_object_becomes_params() {
        let profile: OptimizationProfile = serde_json::from_value(json!({
            "plugins": [{ "name": "preset-default", "params": { "overrides": { "cleanupIds": { "minify": false } } } }]
        }))
        .unwrap();

        let cleanup = resolve_passes(&profile)
            .into_iter()
            .find(|p| p.pass == Pass::CleanupIds)
            .unwrap();
        assert!(!cleanup.bool_param("minify", true));
    }

    #[test]
    fn test_default_preset_strips_editor_noise() {
        let root = run(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:sketch="http://www.bohemiancoding.com/sketch/ns" sketch:type="MSPage"><!-- drawn --><title>t</title><desc>d</desc><metadata>m</metadata><sketch:meta/><path d="M0 0"/></svg>"#,
            json!({ "plugins": ["preset-default"] }),
        );

        assert_eq!(names(&root), ["path"]);
        assert!(!root.has_attr("xmlns:sketch"));
        assert!(!root.has_attr("sketch:type"));
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_cleanup_attrs_collapses_whitespace() {
        let root = run(
            "<svg><path d=\"M0 0\n    L10   10 \"/></svg>",
            json!({ "plugins": ["cleanupAttrs"] }),
        );
        assert_eq!(root.child_elements().next().unwrap().attr("d"), Some("M0 0 L10 10"));
    }

    #[test]
    fn test_remove_dimensions() {
        let root = run(
            r#"<svg width="24" height="24" viewBox="0 0 24 24"/>"#,
            json!({ "plugins": ["removeDimensions"] }),
        );
        assert_eq!(root.attr("viewBox"), Some("0 0 24 24"));
        assert!(!root.has_attr("width") && !root.has_attr("height"));

        let root = run(
            r#"<svg width="16px" height="12"/>"#,
            json!({ "plugins": ["removeDimensions"] }),
        );
        assert_eq!(root.attr("viewBox"), Some("0 0 16 12"));
        assert!(!root.has_attr("width"));
    }

    #[test]
    fn test_remove_view_box_only_when_redundant() {
        let root = run(
            r#"<svg width="24" height="24" viewBox="0 0 24 24"/>"#,
            json!({ "plugins": ["removeViewBox"] }),
        );
        assert!(!root.has_attr("viewBox"));

        let root = run(
            r#"<svg width="48" height="48" viewBox="0 0 24 24"/>"#,
            json!({ "plugins": ["removeViewBox"] }),
        );
        assert!(root.has_attr("viewBox"));
    }

    #[test]
    fn test_convert_colors_to_current_color() {
        let root = run(
            r##"<svg><path fill="#FF0000" stroke="none"/><path fill="url(#g)"/><mask><rect fill="#fff"/></mask></svg>"##,
            json!({ "plugins": [{ "name": "convertColors", "params": { "currentColor": true } }] }),
        );

        let children: Vec<&Element> = root.child_elements().collect();
        assert_eq!(children[0].attr("fill"), Some("currentColor"));
        assert_eq!(children[0].attr("stroke"), Some("none"));
        assert_eq!(children[1].attr("fill"), Some("url(#g)"));
        let mask_rect = children[2].child_elements().next().unwrap();
        assert_eq!(mask_rect.attr("fill"), Some("#fff"));
    }

    #[test]
    fn test_convert_colors_current_color_matching_string() {
        let root = run(
            r##"<svg><path fill="#000"/><path fill="#f00"/></svg>"##,
            json!({ "plugins": [{ "name": "convertColors", "params": { "currentColor": "#000" } }] }),
        );
        let fills: Vec<_> = root.child_elements().map(|c| c.attr("fill").unwrap()).collect();
        assert_eq!(fills, ["currentColor", "#f00"]);
    }

    #[test]
    fn test_convert_colors_minifies() {
        let root = run(
            r##"<svg><path fill="#AABBCC"/><path fill="rgb(255, 0, 0)"/><path fill="#123456"/></svg>"##,
            json!({ "plugins": ["convertColors"] }),
        );
        let fills: Vec<_> = root.child_elements().map(|c| c.attr("fill").unwrap()).collect();
        assert_eq!(fills, ["#abc", "#f00", "#123456"]);
    }

    #[test]
    fn test_cleanup_ids_removes_unused_and_minifies_referenced() {
        let root = run(
            r##"<svg><defs><linearGradient id="gradient-long-name"/></defs><path id="unused" fill="url(#gradient-long-name)"/><use href="#gradient-long-name"/></svg>"##,
            json!({ "plugins": [{ "name": "cleanupIds", "remove": true }] }),
        );

        let defs = root.child_elements().next().unwrap();
        assert_eq!(defs.child_elements().next().unwrap().attr("id"), Some("a"));
        let path = root.child_elements().nth(1).unwrap();
        assert!(!path.has_attr("id"));
        assert_eq!(path.attr("fill"), Some("url(#a)"));
        assert_eq!(root.child_elements().nth(2).unwrap().attr("href"), Some("#a"));
    }

    #[test]
    fn test_cleanup_ids_respects_preserve_and_style() {
        let root = run(
            r#"<svg><path id="keep"/><path id="drop"/></svg>"#,
            json!({ "plugins": [{ "name": "cleanupIds", "params": { "preserve": ["keep"] } }] }),
        );
        let ids: Vec<_> = root.child_elements().map(|c| c.attr("id")).collect();
        assert_eq!(ids, [Some("keep"), None]);

        let root = run(
            r#"<svg><style>#drop{fill:red}</style><path id="drop"/></svg>"#,
            json!({ "plugins": ["cleanupIds"] }),
        );
        assert_eq!(root.child_elements().nth(1).unwrap().attr("id"), Some("drop"));
    }

    #[test]
    fn test_cleanup_ids_minify_skips_ids_that_stay() {
        let root = run(
            r##"<svg><path id="a"/><linearGradient id="grad"/><rect fill="url(#grad)"/></svg>"##,
            json!({ "plugins": [{ "name": "cleanupIds", "params": { "remove": false } }] }),
        );

        let ids: Vec<_> = root.child_elements().map(|c| c.attr("id")).collect();
        assert_eq!(ids, [Some("a"), Some("b"), None]);
        assert_eq!(root.child_elements().nth(2).unwrap().attr("fill"), Some("url(#b)"));
    }

    #[test]
    fn test_prefix_ids_rewrites_ids_and_references() {
        let root = run(
            r##"<svg><clipPath id="c"/><path clip-path="url(#c)"/><use xlink:href="#c"/></svg>"##,
            json!({ "plugins": ["prefixIds"] }),
        );

        let children: Vec<&Element> = root.child_elements().collect();
        assert_eq!(children[0].attr("id"), Some("Icon__c"));
        assert_eq!(children[1].attr("clip-path"), Some("url(#Icon__c)"));
        assert_eq!(children[2].attr("xlink:href"), Some("#Icon__c"));
    }

    #[test]
    fn test_prefix_ids_params_and_multipass() {
        let root = run(
            r##"<svg><mask id="m"/><g mask="url(#m)"><path d="M0 0"/></g></svg>"##,
            json!({
                "multipass": true,
                "plugins": [{ "name": "prefixIds", "params": { "prefix": "logo", "delim": "-" } }]
            }),
        );
        assert_eq!(root.child_elements().next().unwrap().attr("id"), Some("logo-m"));
        assert_eq!(root.child_elements().nth(1).unwrap().attr("mask"), Some("url(#logo-m)"));
    }

    #[test]
    fn test_engine_defaults_prefix_minified_ids() {
        let markup = r##"<svg><defs><linearGradient id="paint0"/></defs><path fill="url(#paint0)" d="M0 0"/></svg>"##;
        let profile = engine_default_profile();

        let mut first = parse_svg(markup).unwrap();
        optimize(&mut first, &profile, "IconSun");
        let mut second = parse_svg(markup).unwrap();
        optimize(&mut second, &profile, "IconMoon");

        let fill = |doc: &Document| {
            doc.root()
                .unwrap()
                .child_elements()
                .find(|c| c.name == "path")
                .and_then(|c| c.attr("fill"))
                .map(str::to_string)
        };
        assert_eq!(fill(&first).as_deref(), Some("url(#IconSun__a)"));
        assert_eq!(fill(&second).as_deref(), Some("url(#IconMoon__a)"));
    }

    #[test]
    fn test_profile_without_plugins_runs_default_preset() {
        let root = run(
            r#"<svg><title>t</title><path d="M0 0"/></svg>"#,
            json!({ "multipass": true }),
        );
        assert_eq!(names(&root), ["path"]);
    }

    #[test]
    fn test_short_id_sequence() {
        assert_eq!(short_id(0), "a");
        assert_eq!(short_id(25), "z");
        assert_eq!(short_id(26), "A");
        assert_eq!(short_id(51), "Z");
        assert_eq!(short_id(52), "aa");
        assert_eq!(short_id(53), "ab");
    }

    #[test]
    fn test_remove_hidden_elems() {
        let root = run(
            r#"<svg><rect width="0" height="10"/><circle r="0"/><path d=""/><g display="none"><path d="M0 0"/></g><path d="M1 1"/></svg>"#,
            json!({ "plugins": ["removeHiddenElems"] }),
        );
        assert_eq!(names(&root), ["path"]);
    }

    #[test]
    fn test_empty_containers_cascade() {
        let root = run(
            r#"<svg><g><g><defs/></g></g><g filter="url(#f)"/><path d="M0 0"/></svg>"#,
            json!({ "plugins": ["removeEmptyContainers"] }),
        );
        assert_eq!(names(&root), ["g", "path"]);
        assert!(root.child_elements().next().unwrap().has_attr("filter"));
    }

    #[test]
    fn test_collapse_groups() {
        let root = run(
            r#"<svg><g><g fill="red" transform="translate(1)"><path transform="scale(2)" d="M0 0"/></g></g></svg>"#,
            json!({ "plugins": ["collapseGroups"] }),
        );
        assert_eq!(names(&root), ["path"]);
        let path = root.child_elements().next().unwrap();
        assert_eq!(path.attr("fill"), Some("red"));
        assert_eq!(path.attr("transform"), Some("translate(1) scale(2)"));
    }

    #[test]
    fn test_collapse_groups_keeps_conflicting_non_inheritable() {
        let root = run(
            r#"<svg><g opacity="0.5"><path opacity="0.5" d="M0 0"/></g></svg>"#,
            json!({ "plugins": ["collapseGroups"] }),
        );
        assert_eq!(names(&root), ["g"]);
    }

    #[test]
    fn test_remove_useless_defs() {
        let root = run(
            r#"<svg><defs><g><linearGradient id="a"/></g><path d="M0 0"/></defs></svg>"#,
            json!({ "plugins": ["removeUselessDefs"] }),
        );
        let defs = root.child_elements().next().unwrap();
        assert_eq!(names(defs), ["linearGradient"]);
    }

    #[test]
    fn test_convert_style_to_attrs() {
        let root = run(
            r#"<svg><path style="fill: red; stroke-width:2; transition: none; color: blue !important" d="M0 0"/></svg>"#,
            json!({ "plugins": ["convertStyleToAttrs"] }),
        );
        let path = root.child_elements().next().unwrap();
        assert_eq!(path.attr("fill"), Some("red"));
        assert_eq!(path.attr("stroke-width"), Some("2"));
        assert_eq!(path.attr("style"), Some("transition:none;color:blue !important"));
    }

    #[test]
    fn test_remove_empty_text_and_attrs() {
        let root = run(
            r#"<svg><text/><text>hi</text><path class="" systemLanguage="" d="M0 0"/></svg>"#,
            json!({ "plugins": ["removeEmptyText", "removeEmptyAttrs"] }),
        );
        assert_eq!(names(&root), ["text", "path"]);
        let path = root.child_elements().nth(1).unwrap();
        assert!(!path.has_attr("class"));
        assert!(path.has_attr("systemLanguage"));
    }

    #[test]
    fn test_multipass_reaches_fixed_point() {
        // Removing the hidden path empties the group after the container pass already ran
        let markup = r#"<svg><g><path d=""/></g></svg>"#;
        let single = run(
            markup,
            json!({ "plugins": ["removeEmptyContainers", "removeHiddenElems"] }),
        );
        assert_eq!(names(&single), ["g"]);

        let multi = run(
            markup,
            json!({ "multipass": true, "plugins": ["removeEmptyContainers", "removeHiddenElems"] }),
        );
        assert!(names(&multi).is_empty());
    }
}
