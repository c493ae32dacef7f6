//! Rendering settings.
//!
//! One [`RenderSettings`] value is built per invocation (from the config file
//! and CLI flags) and passed explicitly to every projector.

pub mod config;

use crate::error::{RenderError, Result};
use crate::record::{Schema, Value};
use crate::render::drawio::DrawioHeader;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output format of a render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned box table (default)
    #[default]
    Table,
    /// Comma-separated values
    Csv,
    /// JSON array of objects
    Json,
    /// YAML sequence of mappings
    Yaml,
    /// HTML report page
    Html,
    /// Markdown pipe table
    Markdown,
    /// Graphviz DOT graph
    Dot,
    /// Mermaid flowchart
    Mermaid,
    /// draw.io CSV import
    Drawio,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "html" => Ok(OutputFormat::Html),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            "mermaid" | "mmd" => Ok(OutputFormat::Mermaid),
            "drawio" | "draw.io" => Ok(OutputFormat::Drawio),
            _ => Err(format!(
                "Unknown format: {}. Valid options: table, csv, json, yaml, html, markdown, dot, mermaid, drawio",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Dot => "dot",
            OutputFormat::Mermaid => "mermaid",
            OutputFormat::Drawio => "drawio",
        }
    }

    /// Detect format from a destination path
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_lowercase();
        if name.ends_with(".drawio.csv") {
            return Some(OutputFormat::Drawio);
        }
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            "html" | "htm" => Some(OutputFormat::Html),
            "md" | "markdown" => Some(OutputFormat::Markdown),
            "dot" | "gv" => Some(OutputFormat::Dot),
            "mmd" | "mermaid" => Some(OutputFormat::Mermaid),
            "txt" => Some(OutputFormat::Table),
            _ => None,
        }
    }

    /// Whether several titled tables can share one artifact
    pub fn supports_sections(&self) -> bool {
        matches!(
            self,
            OutputFormat::Table | OutputFormat::Csv | OutputFormat::Markdown | OutputFormat::Html
        )
    }

    /// Whether appending to an existing artifact is meaningful
    pub fn supports_append(&self) -> bool {
        !matches!(self, OutputFormat::Dot | OutputFormat::Mermaid)
    }

    /// Whether append mode rewrites a merged artifact instead of adding bytes
    pub fn merges_on_append(&self) -> bool {
        matches!(
            self,
            OutputFormat::Json | OutputFormat::Yaml | OutputFormat::Html | OutputFormat::Drawio
        )
    }

    fn needs_graph(&self) -> bool {
        matches!(self, OutputFormat::Dot | OutputFormat::Mermaid)
    }
}

/// A location in an object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Where rendered output goes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    #[default]
    Stdout,
    File(PathBuf),
    Object(ObjectLocation),
}

impl FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "-" {
            return Ok(Destination::Stdout);
        }
        if let Some(rest) = s.strip_prefix("s3://") {
            return match rest.split_once('/') {
                Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
                    Ok(Destination::Object(ObjectLocation {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }))
                }
                _ => Err(format!(
                    "Invalid object location: {}. Expected s3://bucket/key",
                    s
                )),
            };
        }
        Ok(Destination::File(PathBuf::from(s)))
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => write!(f, "stdout"),
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Object(location) => write!(f, "{}", location),
        }
    }
}

/// How booleans appear in textual output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolStyle {
    /// "Yes" / "No"
    #[default]
    Text,
    /// ✅ / ❌
    Emoji,
}

impl BoolStyle {
    pub fn render(self, value: bool) -> &'static str {
        match (self, value) {
            (BoolStyle::Text, true) => "Yes",
            (BoolStyle::Text, false) => "No",
            (BoolStyle::Emoji, true) => "✅",
            (BoolStyle::Emoji, false) => "❌",
        }
    }
}

/// Named table border preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    /// ASCII borders
    #[default]
    Default,
    Light,
    Rounded,
    Bold,
    Double,
}

impl FromStr for TableStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "ascii" => Ok(TableStyle::Default),
            "light" => Ok(TableStyle::Light),
            "rounded" => Ok(TableStyle::Rounded),
            "bold" => Ok(TableStyle::Bold),
            "double" => Ok(TableStyle::Double),
            _ => Err(format!(
                "Unknown table style: {}. Valid options: default, light, rounded, bold, double",
                s
            )),
        }
    }
}

impl fmt::Display for TableStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableStyle::Default => write!(f, "default"),
            TableStyle::Light => write!(f, "light"),
            TableStyle::Rounded => write!(f, "rounded"),
            TableStyle::Bold => write!(f, "bold"),
            TableStyle::Double => write!(f, "double"),
        }
    }
}

/// Columns a graph is derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GraphColumns {
    /// Column holding the source node
    pub from: String,
    /// Column holding one or more target nodes
    pub to: String,
}

/// Everything a single render needs to know
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub format: OutputFormat,
    pub destination: Destination,
    pub append: bool,
    pub title: Option<String>,
    pub sort_key: Option<String>,
    pub bool_style: BoolStyle,
    pub table_style: TableStyle,
    /// Keep each buffered group as its own table
    pub separate_tables: bool,
    /// Wrap cells wider than this many columns (table output only)
    pub max_column_width: Option<usize>,
    /// Joins list cells in text output; splits multi-value graph cells
    pub list_separator: String,
    pub graph: Option<GraphColumns>,
    pub drawio: Option<DrawioHeader>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            destination: Destination::Stdout,
            append: false,
            title: None,
            sort_key: None,
            bool_style: BoolStyle::Text,
            table_style: TableStyle::Default,
            separate_tables: false,
            max_column_width: None,
            list_separator: ",".to_string(),
            graph: None,
            drawio: None,
        }
    }
}

impl RenderSettings {
    /// Flatten a cell for textual output
    pub fn text(&self, value: &Value) -> String {
        value.to_text(self.bool_style, &self.list_separator)
    }

    /// Graph columns, required for DOT and Mermaid output
    pub fn graph_columns(&self) -> Result<&GraphColumns> {
        self.graph.as_ref().ok_or_else(|| {
            RenderError::config(format!(
                "{} output requires from/to columns",
                self.format
            ))
        })
    }

    /// Diagram header, required for draw.io output
    pub fn drawio_header(&self) -> Result<&DrawioHeader> {
        self.drawio
            .as_ref()
            .ok_or_else(|| RenderError::config("drawio output requires a diagram header"))
    }

    /// Check the settings against the schema before anything is written.
    ///
    /// Format extensions are only inspected for the format that owns them.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        if self.max_column_width == Some(0) {
            return Err(RenderError::config("max column width must be at least 1"));
        }
        if self.list_separator.is_empty() {
            return Err(RenderError::config("list separator must not be empty"));
        }

        if self.format.needs_graph() {
            let graph = self.graph_columns()?;
            for column in [&graph.from, &graph.to] {
                if !schema.contains(column) {
                    return Err(RenderError::config(format!(
                        "graph column '{}' is not in the output columns",
                        column
                    )));
                }
            }
        }

        if self.format == OutputFormat::Drawio {
            let header = self.drawio_header()?;
            header.validate(schema)?;
            if self.append && header.identity.is_none() {
                return Err(RenderError::config(
                    "appending to a drawio file requires an identity column",
                ));
            }
        }

        if self.append {
            if self.destination == Destination::Stdout {
                return Err(RenderError::config(
                    "append requires a file or object destination",
                ));
            }
            if !self.format.supports_append() {
                return Err(RenderError::config(format!(
                    "{} output cannot be appended to",
                    self.format
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::drawio::Connection;

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("draw.io".parse::<OutputFormat>(), Ok(OutputFormat::Drawio));
        assert_eq!("mmd".parse::<OutputFormat>(), Ok(OutputFormat::Mermaid));
        assert!("excel".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/peering.drawio.csv")),
            Some(OutputFormat::Drawio)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("report.HTML")),
            Some(OutputFormat::Html)
        );
        assert_eq!(OutputFormat::from_path(Path::new("report")), None);
    }

    #[test]
    fn test_destination_parse() {
        assert_eq!("-".parse::<Destination>(), Ok(Destination::Stdout));
        assert_eq!(
            "s3://reports/vpc/overview.html".parse::<Destination>(),
            Ok(Destination::Object(ObjectLocation {
                bucket: "reports".to_string(),
                key: "vpc/overview.html".to_string(),
            }))
        );
        assert!("s3://bucket-only".parse::<Destination>().is_err());
        assert_eq!(
            "out.csv".parse::<Destination>(),
            Ok(Destination::File(PathBuf::from("out.csv")))
        );
    }

    #[test]
    fn test_unknown_table_style() {
        assert_eq!("Rounded".parse::<TableStyle>(), Ok(TableStyle::Rounded));
        assert!("fancy".parse::<TableStyle>().is_err());
    }

    #[test]
    fn test_graph_format_requires_columns() {
        let schema = Schema::new(["ID", "Targets"]);
        let mut settings = RenderSettings {
            format: OutputFormat::Dot,
            ..Default::default()
        };
        assert!(settings.validate(&schema).unwrap_err().is_config());

        settings.graph = Some(GraphColumns {
            from: "ID".to_string(),
            to: "Missing".to_string(),
        });
        assert!(settings.validate(&schema).unwrap_err().is_config());

        settings.graph = Some(GraphColumns {
            from: "ID".to_string(),
            to: "Targets".to_string(),
        });
        assert!(settings.validate(&schema).is_ok());
    }

    #[test]
    fn test_graph_columns_ignored_for_other_formats() {
        let settings = RenderSettings {
            format: OutputFormat::Csv,
            graph: Some(GraphColumns {
                from: "Nope".to_string(),
                to: "Nope".to_string(),
            }),
            ..Default::default()
        };
        assert!(settings.validate(&Schema::new(["Name"])).is_ok());
    }

    #[test]
    fn test_append_rules() {
        let schema = Schema::new(["Name"]);
        let console = RenderSettings {
            format: OutputFormat::Csv,
            append: true,
            ..Default::default()
        };
        assert!(console.validate(&schema).is_err());

        let dot = RenderSettings {
            format: OutputFormat::Dot,
            append: true,
            destination: Destination::File(PathBuf::from("g.dot")),
            graph: Some(GraphColumns {
                from: "Name".to_string(),
                to: "Name".to_string(),
            }),
            ..Default::default()
        };
        assert!(dot.validate(&schema).is_err());
    }

    #[test]
    fn test_drawio_append_needs_identity() {
        let schema = Schema::new(["Name", "Peers"]);
        let mut header = DrawioHeader::default();
        header.connections.push(Connection::new("Name", "Peers"));
        let mut settings = RenderSettings {
            format: OutputFormat::Drawio,
            append: true,
            destination: Destination::File(PathBuf::from("d.csv")),
            drawio: Some(header),
            ..Default::default()
        };
        assert!(settings.validate(&schema).is_err());

        if let Some(header) = settings.drawio.as_mut() {
            header.identity = Some("Name".to_string());
        }
        assert!(settings.validate(&schema).is_ok());
    }

    #[test]
    fn test_zero_width_rejected() {
        let settings = RenderSettings {
            max_column_width: Some(0),
            ..Default::default()
        };
        assert!(settings.validate(&Schema::new(["A"])).is_err());
    }
}
