//! React component emission from an SVG tree

use super::tree::{Element, Node};
use super::{ExpandProps, TransformOptions};
use crate::models::JsxRuntime;
use heck::{ToLowerCamelCase, ToUpperCamelCase};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Render `root` as the body of a React function component named `component_name`
pub fn render_component(root: &Element, component_name: &str, options: &TransformOptions<'_>) -> String {
    let mut out = String::new();

    if options.jsx_runtime == JsxRuntime::Classic {
        out.push_str("import * as React from \"react\";\n");
    }
    if options.typescript && options.expand_props != ExpandProps::None {
        out.push_str("import type { SVGProps } from \"react\";\n");
    }

    let params = match (options.expand_props, options.typescript) {
        (ExpandProps::None, _) => "()",
        (_, true) => "(props: SVGProps<SVGSVGElement>)",
        (_, false) => "(props)",
    };
    let _ = writeln!(out, "const {} = {} => (", component_name, params);

    let mut root = root.clone();
    if options.icon {
        root.set_attr("width", "1em");
        root.set_attr("height", "1em");
    }
    write_element(&mut out, &root, 1, Some(options.expand_props));

    out.push_str(");\n");
    let _ = writeln!(out, "export default {};", component_name);
    out
}

fn write_element(out: &mut String, el: &Element, depth: usize, spread: Option<ExpandProps>) {
    let indent = INDENT.repeat(depth);
    let _ = write!(out, "{}<{}", indent, el.name);

    if spread == Some(ExpandProps::Start) {
        out.push_str(" {...props}");
    }
    for (name, value) in &el.attributes {
        out.push(' ');
        write_attribute(out, name, value);
    }
    if spread == Some(ExpandProps::End) {
        out.push_str(" {...props}");
    }

    let children: Vec<&Node> = el.children.iter().filter(|n| is_rendered(n)).collect();
    if children.is_empty() {
        out.push_str(" />\n");
        return;
    }

    // A lone text child stays inline: <title>Close</title>
    if let [Node::Text(text)] = children.as_slice() {
        let _ = writeln!(out, ">{}</{}>", jsx_text(text), el.name);
        return;
    }

    out.push_str(">\n");
    for child in children {
        match child {
            Node::Element(child) => write_element(out, child, depth + 1, None),
            Node::Text(text) => {
                let _ = writeln!(out, "{}{}{}", indent, INDENT, jsx_text(text));
            }
            Node::CData(text) => {
                let _ = writeln!(out, "{}{}{{{}}}", indent, INDENT, js_string(text));
            }
            _ => {}
        }
    }
    let _ = writeln!(out, "{}</{}>", indent, el.name);
}

/// Comments and prolog nodes have no JSX equivalent
fn is_rendered(node: &Node) -> bool {
    matches!(node, Node::Element(_) | Node::Text(_) | Node::CData(_))
}

fn write_attribute(out: &mut String, name: &str, value: &str) {
    let prop = jsx_attribute_name(name);

    if name == "style" {
        let _ = write!(out, "{}={{{}}}", prop, style_object(value));
    } else if needs_expression(value) {
        let _ = write!(out, "{}={{{}}}", prop, js_string(value));
    } else {
        let _ = write!(out, "{}=\"{}\"", prop, value);
    }
}

/// React prop name for an SVG attribute
pub fn jsx_attribute_name(name: &str) -> String {
    match name {
        "class" => "className".to_string(),
        "for" => "htmlFor".to_string(),
        "tabindex" => "tabIndex".to_string(),
        _ if name.starts_with("data-") || name.starts_with("aria-") => name.to_string(),
        _ if name.contains('-') || name.contains(':') => name.to_lower_camel_case(),
        _ => name.to_string(),
    }
}

/// Attribute values JSX cannot hold between plain double quotes
fn needs_expression(value: &str) -> bool {
    value
        .chars()
        .any(|c| matches!(c, '"' | '{' | '}' | '&' | '\n' | '\r' | '\\'))
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn jsx_text(text: &str) -> String {
    let plain = !text.starts_with(char::is_whitespace)
        && !text.ends_with(char::is_whitespace)
        && !text
            .chars()
            .any(|c| matches!(c, '{' | '}' | '<' | '>' | '&' | '"' | '\''));
    if plain {
        text.to_string()
    } else {
        format!("{{{}}}", js_string(text))
    }
}

/// `fill:red;stroke-width:2` as `{ fill: "red", strokeWidth: "2" }`
fn style_object(style: &str) -> String {
    let entries: Vec<String> = style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(property, value)| {
            format!(
                "{}: {}",
                style_property_name(property.trim()),
                js_string(value.trim())
            )
        })
        .collect();

    if entries.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", entries.join(", "))
    }
}

fn style_property_name(property: &str) -> String {
    if property.starts_with("--") {
        // Custom properties keep their exact name
        js_string(property)
    } else if property.starts_with("-ms-") {
        property.to_lower_camel_case()
    } else if property.starts_with('-') {
        property.to_upper_camel_case()
    } else {
        property.to_lower_camel_case()
    }
}
