//! Integration tests for the `schema` subcommand and configuration files.

use jsonschema::Validator;
use serde_json::{json, Value};
use std::process::Command;

fn config_schema() -> Value {
    let output = Command::new(env!("CARGO_BIN_EXE_cloudscope"))
        .arg("schema")
        .output()
        .expect("Failed to execute cloudscope");
    assert!(
        output.status.success(),
        "Command failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("schema output is not JSON")
}

fn validator() -> Validator {
    Validator::new(&config_schema()).expect("Failed to compile schema")
}

#[test]
fn test_schema_matches_library() {
    let from_binary = config_schema();
    let from_library: Value =
        serde_json::from_str(&cloudscope::json_schema::config_schema_json().unwrap()).unwrap();
    assert_eq!(from_binary, from_library);
}

#[test]
fn test_full_config_is_valid() {
    let config = json!({
        "output": {
            "format": "drawio",
            "table_style": "rounded",
            "max_column_width": 40,
            "emoji": true,
            "separate_tables": false,
            "list_separator": ";",
            "sort_by": "Name",
            "title": "Peering"
        },
        "graph": {"from": "VpcId", "to": "PeerVpcIds"},
        "drawio": {
            "identity": "Name",
            "layout": "horizontalflow",
            "connections": [{"from": "Name", "to": "Peers", "invert": true}]
        }
    });
    assert!(validator().is_valid(&config));
}

#[test]
fn test_empty_config_is_valid() {
    assert!(validator().is_valid(&json!({})));
}

#[test]
fn test_invalid_configs_rejected() {
    let validator = validator();
    assert!(!validator.is_valid(&json!({"output": {"format": "excel"}})));
    assert!(!validator.is_valid(&json!({"output": {"colour": "red"}})));
    assert!(!validator.is_valid(&json!({"graph": {"from": "VpcId"}})));
    assert!(!validator.is_valid(&json!({"drawio": {"layout": "spiral"}})));
}
