//! JSON Schema of the configuration file.
//!
//! Exported through the `schema` subcommand so editors can validate
//! `config.yaml` files.

use crate::settings::config::RenderConfig;
use schemars::{schema_for, Schema};

/// Schema for [`RenderConfig`]
pub fn config_schema() -> Schema {
    schema_for!(RenderConfig)
}

/// Pretty-printed schema document
pub fn config_schema_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&config_schema())
}
