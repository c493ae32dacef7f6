//! Integration tests for the render command.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn cloudscope_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cloudscope"))
}

fn write_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn vpcs(dir: &TempDir) -> PathBuf {
    write_input(
        dir,
        "vpcs.json",
        r#"[
  {"Name": "vpc-2", "Account": "prod", "Public": false, "Peers": []},
  {"Name": "vpc-1", "Account": "dev", "Public": true, "Peers": ["vpc-2"]},
  {"Name": "vpc-3", "Account": "prod", "Public": false, "Peers": ["vpc-1", "vpc-2"]}
]"#,
    )
}

fn render(args: &[&str]) -> Output {
    let mut cmd = cloudscope_bin();
    cmd.arg("render").args(args);
    // Keep user config files out of the tests
    cmd.env("XDG_CONFIG_HOME", "/nonexistent-cloudscope-config");
    cmd.output().expect("Failed to execute cloudscope")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "Command failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_csv_to_stdout_sorted() {
    let dir = TempDir::new().unwrap();
    let input = vpcs(&dir);

    let output = render(&[
        path_str(&input),
        "-o",
        "csv",
        "--sort-by",
        "Name",
        "--columns",
        "Name,Public",
    ]);
    assert_eq!(stdout(&output), "Name,Public\nvpc-1,Yes\nvpc-2,No\nvpc-3,No\n");
}

#[test]
fn test_json_file_inferred_from_extension() {
    let dir = TempDir::new().unwrap();
    let input = vpcs(&dir);
    let dest = dir.path().join("out/vpcs.json");

    let output = render(&[path_str(&input), "-f", path_str(&dest), "--sort-by", "Name"]);
    assert!(stdout(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Output written to"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Name"], "vpc-1");
    assert_eq!(rows[0]["Public"], true);
    assert_eq!(rows[2]["Peers"], serde_json::json!(["vpc-1", "vpc-2"]));
}

#[test]
fn test_default_table_output() {
    let dir = TempDir::new().unwrap();
    let input = vpcs(&dir);

    let out = stdout(&render(&[
        path_str(&input),
        "--columns",
        "Name,Public",
        "--sort-by",
        "Name",
        "--title",
        "VPCs",
        "--emoji",
    ]));
    assert!(out.contains("VPCs"));
    assert!(out.contains("✅"));
    assert!(out.find("vpc-1").unwrap() < out.find("vpc-2").unwrap());
}

#[test]
fn test_dot_graph() {
    let dir = TempDir::new().unwrap();
    let input = vpcs(&dir);

    let out = stdout(&render(&[
        path_str(&input),
        "-o",
        "dot",
        "--from",
        "Name",
        "--to",
        "Peers",
    ]));
    assert!(out.starts_with("digraph G {"));
    assert_eq!(out.lines().filter(|l| *l == "  \"vpc-1\";").count(), 1);
    assert_eq!(out.matches("->").count(), 3);
    assert!(out.contains("\"vpc-3\" -> \"vpc-1\";"));
}

#[test]
fn test_dot_without_columns_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = vpcs(&dir);
    let dest = dir.path().join("graph.dot");

    let output = render(&[path_str(&input), "-f", path_str(&dest)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration error"));
    assert!(!dest.exists());
}

#[test]
fn test_append_to_stdout_rejected() {
    let dir = TempDir::new().unwrap();
    let input = vpcs(&dir);

    let output = render(&[path_str(&input), "-o", "csv", "--append"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_csv_append_writes_header_once() {
    let dir = TempDir::new().unwrap();
    let first = write_input(&dir, "a.json", r#"[{"Name": "vpc-1"}]"#);
    let second = write_input(&dir, "b.json", r#"[{"Name": "vpc-2"}]"#);
    let dest = dir.path().join("all.csv");

    stdout(&render(&[path_str(&first), "-f", path_str(&dest), "--append"]));
    stdout(&render(&[path_str(&second), "-f", path_str(&dest), "--append"]));
    assert_eq!(fs::read_to_string(&dest).unwrap(), "Name\nvpc-1\nvpc-2\n");
}

#[test]
fn test_csv_append_after_unterminated_line() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "a.json", r#"[{"Name": "vpc-3"}]"#);
    let dest = write_input(&dir, "all.csv", "Name\nvpc-1");

    stdout(&render(&[path_str(&input), "-f", path_str(&dest), "--append"]));
    assert_eq!(fs::read_to_string(&dest).unwrap(), "Name\nvpc-1\nvpc-3\n");
}

#[test]
fn test_drawio_without_header_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = vpcs(&dir);
    let dest = dir.path().join("peering.drawio.csv");

    let output = render(&[path_str(&input), "-f", path_str(&dest)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("diagram header"));
    assert!(!dest.exists());
}

#[test]
fn test_html_append_splices_tables() {
    let dir = TempDir::new().unwrap();
    let first = write_input(&dir, "a.json", r#"[{"Name": "vpc-1"}]"#);
    let second = write_input(&dir, "b.json", r#"[{"Name": "vpc-2"}]"#);
    let dest = dir.path().join("report.html");

    stdout(&render(&[path_str(&first), "-f", path_str(&dest), "--title", "Account A"]));
    stdout(&render(&[
        path_str(&second),
        "-f",
        path_str(&dest),
        "--append",
        "--title",
        "Account B",
    ]));

    let page = fs::read_to_string(&dest).unwrap();
    assert_eq!(page.matches("<!DOCTYPE html>").count(), 1);
    assert_eq!(page.matches("<div id='end'></div>").count(), 1);
    assert!(page.find("vpc-1").unwrap() < page.find("vpc-2").unwrap());
}

#[test]
fn test_drawio_append_merges_by_identity() {
    let dir = TempDir::new().unwrap();
    let config = write_input(
        &dir,
        "config.yaml",
        "drawio:\n  identity: Name\n  layout: horizontalflow\n  connections:\n    - from: Name\n      to: Peers\n",
    );
    let first = write_input(
        &dir,
        "a.json",
        r#"[{"Name": "vpc-1", "Peers": ["vpc-2"], "Cidr": "10.0.0.0/16"},
            {"Name": "vpc-2", "Peers": [], "Cidr": "10.1.0.0/16"}]"#,
    );
    let second = write_input(
        &dir,
        "b.json",
        r#"[{"Name": "vpc-2", "Peers": ["vpc-3"], "Cidr": "10.9.0.0/16"},
            {"Name": "vpc-3", "Peers": [], "Cidr": "10.2.0.0/16"}]"#,
    );
    let dest = dir.path().join("peering.drawio.csv");

    for input in [&first, &second] {
        stdout(&render(&[
            path_str(input),
            "-f",
            path_str(&dest),
            "--append",
            "--config",
            path_str(&config),
        ]));
    }

    let text = fs::read_to_string(&dest).unwrap();
    assert_eq!(text.matches("## CSV data starts below this line").count(), 1);
    assert!(text.contains("# identity: Name\n"));
    assert!(text.contains("# layout: horizontalflow\n"));

    let data = text.split("## CSV data starts below this line\n").nth(1).unwrap();
    assert_eq!(
        data,
        "Name,Peers,Cidr\nvpc-1,vpc-2,10.0.0.0/16\nvpc-2,vpc-3,10.9.0.0/16\nvpc-3,,10.2.0.0/16\n"
    );
}

#[test]
fn test_drawio_append_rejects_foreign_file() {
    let dir = TempDir::new().unwrap();
    let config = write_input(&dir, "config.yaml", "drawio:\n  identity: Name\n");
    let input = write_input(&dir, "a.json", r#"[{"Name": "vpc-1"}]"#);
    let dest = write_input(&dir, "diagram.drawio.csv", "Name\nhand-edited\n");

    let output = render(&[
        path_str(&input),
        "-f",
        path_str(&dest),
        "--append",
        "--config",
        path_str(&config),
    ]);
    assert!(!output.status.success());
    assert_eq!(fs::read_to_string(&dest).unwrap(), "Name\nhand-edited\n");
}

#[test]
fn test_object_destination_under_root() {
    let dir = TempDir::new().unwrap();
    let input = vpcs(&dir);
    let root = dir.path().join("bucket-root");

    stdout(&render(&[
        path_str(&input),
        "-f",
        "s3://reports/net/vpcs.csv",
        "--object-root",
        path_str(&root),
        "--columns",
        "Name",
    ]));
    let text = fs::read_to_string(root.join("reports/net/vpcs.csv")).unwrap();
    assert!(text.starts_with("Name\n"));
}

#[test]
fn test_object_destination_without_root_fails() {
    let dir = TempDir::new().unwrap();
    let input = vpcs(&dir);

    let output = render(&[path_str(&input), "-f", "s3://reports/vpcs.csv"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("object store"));
}

#[test]
fn test_group_by_separate_tables() {
    let dir = TempDir::new().unwrap();
    let input = vpcs(&dir);

    let out = stdout(&render(&[
        path_str(&input),
        "-o",
        "markdown",
        "--columns",
        "Name",
        "--group-by",
        "Account",
        "--separate-tables",
        "--title",
        "VPCs",
    ]));
    assert_eq!(out.matches("## VPCs - ").count(), 2);
    assert!(out.find("## VPCs - prod").unwrap() < out.find("## VPCs - dev").unwrap());
}

#[test]
fn test_yaml_from_stdin() {
    let mut child = cloudscope_bin()
        .args(["render", "-", "-o", "csv"])
        .env("XDG_CONFIG_HOME", "/nonexistent-cloudscope-config")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"- Name: subnet-1\n  Public: true\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(stdout(&output), "Name,Public\nsubnet-1,Yes\n");
}

#[test]
fn test_unknown_format_rejected() {
    let dir = TempDir::new().unwrap();
    let input = vpcs(&dir);

    let output = render(&[path_str(&input), "-o", "excel"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown format"));
}
