//! draw.io CSV import header.
//!
//! The header is a block of `#` comment lines that draw.io reads as import
//! instructions (node labels, styles, connections, layout) before the CSV
//! data itself.

use crate::error::{RenderError, Result};
use crate::record::Schema;
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comment line that separates the header from the CSV data
pub const DATA_SEPARATOR: &str = "## CSV data starts below this line";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%([A-Za-z0-9_][A-Za-z0-9_ .-]*)%").unwrap());

/// Automatic layout applied by draw.io after import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Auto,
    None,
    HorizontalTree,
    VerticalTree,
    HorizontalFlow,
    VerticalFlow,
    Organic,
    Circle,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Layout::Auto),
            "none" => Ok(Layout::None),
            "horizontaltree" | "tree-horizontal" => Ok(Layout::HorizontalTree),
            "verticaltree" | "tree-vertical" => Ok(Layout::VerticalTree),
            "horizontalflow" | "flow-horizontal" => Ok(Layout::HorizontalFlow),
            "verticalflow" | "flow-vertical" => Ok(Layout::VerticalFlow),
            "organic" | "organicgraph" => Ok(Layout::Organic),
            "circle" | "circlelayout" => Ok(Layout::Circle),
            _ => Err(format!(
                "Unknown layout: {}. Valid options: auto, none, horizontaltree, verticaltree, horizontalflow, verticalflow, organic, circle",
                s
            )),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layout::Auto => "auto",
            Layout::None => "none",
            Layout::HorizontalTree => "horizontaltree",
            Layout::VerticalTree => "verticaltree",
            Layout::HorizontalFlow => "horizontalflow",
            Layout::VerticalFlow => "verticalflow",
            Layout::Organic => "organicgraph",
            Layout::Circle => "circlelayout",
        };
        f.write_str(name)
    }
}

/// An edge set between rows.
///
/// `from` and `to` name columns whose (list-split) values are node
/// identities. `invert` flips only the drawn arrow; `label` and `style` pass
/// through to draw.io untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_connection_style")]
    pub style: String,
}

fn default_connection_style() -> String {
    "curved=1;endArrow=blockThin;endFill=1;fontSize=11;".to_string()
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            invert: false,
            label: String::new(),
            style: default_connection_style(),
        }
    }

    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }
}

/// Import instructions for a draw.io CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DrawioHeader {
    /// Node label, `%Column%` placeholders are substituted by draw.io
    pub label: String,
    /// Node style, usually pointing at an image column
    pub style: String,
    pub parentstyle: Option<String>,
    /// Column that uniquely names a node
    pub identity: Option<String>,
    /// Column naming a node's container
    pub parent: Option<String>,
    pub namespace: String,
    pub connections: Vec<Connection>,
    pub left: Option<String>,
    pub top: Option<String>,
    pub width: String,
    pub height: String,
    pub padding: i32,
    /// Columns kept out of the node metadata
    pub ignore: Vec<String>,
    pub link: Option<String>,
    pub nodespacing: u32,
    pub levelspacing: u32,
    pub edgespacing: u32,
    pub layout: Layout,
}

impl Default for DrawioHeader {
    fn default() -> Self {
        Self {
            label: "%Name%".to_string(),
            style: "%Image%".to_string(),
            parentstyle: None,
            identity: None,
            parent: None,
            namespace: "csvimport-".to_string(),
            connections: Vec::new(),
            left: None,
            top: None,
            width: "auto".to_string(),
            height: "auto".to_string(),
            padding: 0,
            ignore: vec!["Image".to_string()],
            link: None,
            nodespacing: 40,
            levelspacing: 100,
            edgespacing: 40,
            layout: Layout::Auto,
        }
    }
}

impl DrawioHeader {
    /// Columns referenced by connections and identity must be emitted.
    ///
    /// Unknown `%placeholders%` are only warned about: draw.io keeps them as
    /// literal text, which is ugly but not broken.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        for connection in &self.connections {
            for column in [&connection.from, &connection.to] {
                if !schema.contains(column) {
                    return Err(RenderError::config(format!(
                        "drawio connection column '{}' is not in the output columns",
                        column
                    )));
                }
            }
        }
        if let Some(identity) = &self.identity {
            if !schema.contains(identity) {
                return Err(RenderError::config(format!(
                    "drawio identity column '{}' is not in the output columns",
                    identity
                )));
            }
        }
        for placeholder in self.unknown_placeholders(schema) {
            tracing::warn!(placeholder = %placeholder, "drawio placeholder does not match any column");
        }
        Ok(())
    }

    /// `%Column%` references in label/style templates that the schema lacks
    pub fn unknown_placeholders(&self, schema: &Schema) -> Vec<String> {
        let mut unknown = Vec::new();
        let templates = [Some(&self.label), Some(&self.style), self.parentstyle.as_ref()];
        for template in templates.into_iter().flatten() {
            for capture in PLACEHOLDER.captures_iter(template) {
                let name = capture[1].to_string();
                if !schema.contains(&name) && !unknown.contains(&name) {
                    unknown.push(name);
                }
            }
        }
        unknown
    }

    /// The `#` comment block, ending with the data separator line.
    pub fn to_comment_block(&self) -> String {
        let mut out = String::new();
        let mut line = |key: &str, value: &str| {
            out.push_str(&format!("# {}: {}\n", key, value));
        };

        line("label", &self.label);
        line("style", &self.style);
        if let Some(parentstyle) = &self.parentstyle {
            line("parentstyle", parentstyle);
        }
        for connection in &self.connections {
            // Serializing a struct of strings and a bool cannot fail
            let json = serde_json::to_string(connection).unwrap_or_default();
            line("connect", &json);
        }
        line("identity", self.identity.as_deref().unwrap_or("-"));
        line("parent", self.parent.as_deref().unwrap_or("-"));
        line("namespace", &self.namespace);
        if let Some(left) = &self.left {
            line("left", left);
        }
        if let Some(top) = &self.top {
            line("top", top);
        }
        line("width", &self.width);
        line("height", &self.height);
        line("padding", &self.padding.to_string());
        line("ignore", &self.ignore.join(","));
        if let Some(link) = &self.link {
            line("link", link);
        }
        line("nodespacing", &self.nodespacing.to_string());
        line("levelspacing", &self.levelspacing.to_string());
        line("edgespacing", &self.edgespacing.to_string());
        line("layout", &self.layout.to_string());

        out.push_str(DATA_SEPARATOR);
        out.push('\n');
        out
    }
}
