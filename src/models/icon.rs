use camino::{Utf8Path, Utf8PathBuf};

/// File suffix an input must carry to be treated as an icon (case-sensitive)
pub const SVG_SUFFIX: &str = ".svg";

/// One icon of the batch, derived from its source file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRecord {
    /// File name without the `.svg` suffix
    pub icon_name: String,

    /// `componentPrefix` followed by the capitalized icon name
    pub component_name: String,

    pub source_path: Utf8PathBuf,
}

impl IconRecord {
    /// Build a record for `file_name` inside `icons_dir`.
    ///
    /// Returns `None` when the name does not end in `.svg`.
    pub fn from_file_name(icons_dir: &Utf8Path, file_name: &str, prefix: &str) -> Option<Self> {
        let icon_name = file_name.strip_suffix(SVG_SUFFIX)?;

        Some(Self {
            icon_name: icon_name.to_string(),
            component_name: component_name(prefix, icon_name),
            source_path: icons_dir.join(file_name),
        })
    }

    /// File name of the generated component, e.g. `IconArrow.tsx`
    pub fn component_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.component_name, extension)
    }

    /// Re-export line for the barrel file
    pub fn export_line(&self) -> String {
        format!(
            "export {{ default as {name} }} from \"./{name}\";",
            name = self.component_name
        )
    }
}

/// Derive a component name: prefix + icon name with its first character uppercased.
///
/// Only the first character changes, so `arrow-left.svg` yields `IconArrow-left`.
pub fn component_name(prefix: &str, icon_name: &str) -> String {
    let mut chars = icon_name.chars();
    let mut name = String::with_capacity(prefix.len() + icon_name.len());
    name.push_str(prefix);
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    name
}
