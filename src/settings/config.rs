//! YAML configuration file.
//!
//! ```yaml
//! output:
//!   format: table
//!   table_style: rounded
//!   max_column_width: 40
//!   emoji: true
//! graph:
//!   from: VpcId
//!   to: PeerVpcIds
//! drawio:
//!   identity: Name
//!   layout: horizontalflow
//!   connections:
//!     - from: Name
//!       to: Peers
//! ```
//!
//! Every field is optional. Values from the file are applied first and CLI
//! flags override them.

use super::{BoolStyle, GraphColumns, OutputFormat, RenderSettings, TableStyle};
use crate::render::drawio::DrawioHeader;
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Output defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub table_style: Option<TableStyle>,
    /// Wrap table cells wider than this
    pub max_column_width: Option<usize>,
    /// Render booleans as ✅/❌ instead of Yes/No
    pub emoji: Option<bool>,
    pub separate_tables: Option<bool>,
    /// Delimiter used to join and split list values
    pub list_separator: Option<String>,
    /// Column that orders the records
    pub sort_by: Option<String>,
    pub title: Option<String>,
}

/// Complete configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub output: OutputConfig,
    /// Columns that DOT and Mermaid output derive edges from
    pub graph: Option<GraphColumns>,
    /// draw.io import header
    pub drawio: Option<DrawioHeader>,
}

impl RenderConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: RenderConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// `<config dir>/cloudscope/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cloudscope").join("config.yaml"))
    }

    /// An explicit path must exist; the default location is optional.
    pub fn discover(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "using default config file");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Copy every value the file sets onto `settings`
    pub fn apply_to(&self, settings: &mut RenderSettings) {
        let output = &self.output;
        if let Some(format) = output.format {
            settings.format = format;
        }
        if let Some(style) = output.table_style {
            settings.table_style = style;
        }
        if output.max_column_width.is_some() {
            settings.max_column_width = output.max_column_width;
        }
        if let Some(emoji) = output.emoji {
            settings.bool_style = if emoji {
                BoolStyle::Emoji
            } else {
                BoolStyle::Text
            };
        }
        if let Some(separate) = output.separate_tables {
            settings.separate_tables = separate;
        }
        if let Some(separator) = &output.list_separator {
            settings.list_separator = separator.clone();
        }
        if output.sort_by.is_some() {
            settings.sort_key = output.sort_by.clone();
        }
        if output.title.is_some() {
            settings.title = output.title.clone();
        }
        if self.graph.is_some() {
            settings.graph = self.graph.clone();
        }
        if self.drawio.is_some() {
            settings.drawio = self.drawio.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::drawio::Layout;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
output:
  format: drawio
  table_style: rounded
  emoji: true
  sort_by: Name
drawio:
  identity: Name
  layout: horizontalflow
  connections:
    - from: Name
      to: Peers
      invert: true
"#;
        let config: RenderConfig = serde_yaml::from_str(yaml).unwrap();
        let drawio = config.drawio.as_ref().unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Drawio));
        assert_eq!(drawio.layout, Layout::HorizontalFlow);
        assert_eq!(drawio.label, "%Name%");
        assert!(drawio.connections[0].invert);
        assert_eq!(drawio.connections[0].label, "");

        let mut settings = RenderSettings::default();
        config.apply_to(&mut settings);
        assert_eq!(settings.format, OutputFormat::Drawio);
        assert_eq!(settings.table_style, TableStyle::Rounded);
        assert_eq!(settings.bool_style, BoolStyle::Emoji);
        assert_eq!(settings.sort_key.as_deref(), Some("Name"));
        assert!(settings.drawio.is_some());
    }

    #[test]
    fn test_empty_config_changes_nothing() {
        let config: RenderConfig = serde_yaml::from_str("{}").unwrap();
        let mut settings = RenderSettings::default();
        config.apply_to(&mut settings);
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<RenderConfig, _> = serde_yaml::from_str("output:\n  colour: red\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let err = RenderConfig::discover(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "graph:\n  from: VpcId\n  to: PeerVpcIds\n").unwrap();

        let config = RenderConfig::load(&path).unwrap();
        assert_eq!(config.graph.unwrap().to, "PeerVpcIds");
    }
}
