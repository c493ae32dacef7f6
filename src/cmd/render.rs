use anyhow::Context;
use clap::Args;
use cloudscope::settings::config::RenderConfig;
use cloudscope::settings::{BoolStyle, Destination, GraphColumns, ObjectLocation, OutputFormat};
use cloudscope::sink::DirectoryStore;
use cloudscope::{OutputSink, Record, RenderSettings, Report, Schema};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Input file: a JSON array of objects or a YAML sequence of mappings ("-" for stdin)
    pub input: PathBuf,

    /// Output format: table, csv, json, yaml, html, markdown, dot, mermaid, drawio
    /// (inferred from the destination extension if not specified)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Destination: a path, s3://bucket/key, or "-" for stdout
    #[arg(short, long, default_value = "-")]
    pub file: String,

    /// Append to (or merge with) the existing destination
    #[arg(long)]
    pub append: bool,

    /// Column that orders the records
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Report title
    #[arg(long)]
    pub title: Option<String>,

    /// Table border style: default, light, rounded, bold, double
    #[arg(long)]
    pub table_style: Option<String>,

    /// Wrap table cells wider than this
    #[arg(long)]
    pub max_column_width: Option<usize>,

    /// Render booleans as ✅/❌
    #[arg(long)]
    pub emoji: bool,

    /// Render each --group-by group as its own table
    #[arg(long, requires = "group_by")]
    pub separate_tables: bool,

    /// Split records into groups by the value of this column
    #[arg(long)]
    pub group_by: Option<String>,

    /// Columns to emit, comma-separated (default: every input key in first-seen order)
    #[arg(long)]
    pub columns: Option<String>,

    /// Graph source column (dot, mermaid)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Graph target column (dot, mermaid)
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Separator for list values
    #[arg(long)]
    pub list_separator: Option<String>,

    /// Configuration file (default: <config dir>/cloudscope/config.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Local directory that stands in for the object store behind s3:// destinations
    #[arg(long)]
    pub object_root: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let config = RenderConfig::discover(args.config.as_deref())?;
    let settings = build_settings(&args, &config)?;

    let records = load_records(&args.input)?;
    let schema = match &args.columns {
        Some(columns) => Schema::new(
            columns
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty()),
        ),
        None => Schema::from_records(&records),
    };
    if schema.is_empty() {
        anyhow::bail!("no columns to render");
    }

    let destination = settings.destination.clone();
    let record_count = records.len();
    let mut report = Report::new(settings, schema);
    match &args.group_by {
        Some(column) => add_groups(&mut report, records, column, args.title.as_deref()),
        None => report.extend(records),
    }

    let store = args.object_root.as_ref().map(DirectoryStore::new);
    let mut sink = OutputSink::new(destination.clone());
    if let Some(store) = &store {
        sink = sink.with_store(store);
    }
    report.write(&mut sink)?;

    if destination != Destination::Stdout {
        eprintln!(
            "Output written to: {} ({} records, {})",
            destination,
            record_count,
            report.settings().format
        );
    }
    Ok(())
}

/// Defaults, then the config file, then flags
fn build_settings(args: &RenderArgs, config: &RenderConfig) -> anyhow::Result<RenderSettings> {
    let mut settings = RenderSettings::default();
    config.apply_to(&mut settings);

    settings.destination = args.file.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    match &args.output {
        Some(format) => {
            settings.format = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        None if config.output.format.is_none() => {
            if let Some(format) = infer_format(&settings.destination) {
                settings.format = format;
            }
        }
        None => {}
    }

    settings.append = args.append;
    if args.sort_by.is_some() {
        settings.sort_key = args.sort_by.clone();
    }
    if args.title.is_some() && args.group_by.is_none() {
        settings.title = args.title.clone();
    }
    if let Some(style) = &args.table_style {
        settings.table_style = style.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    }
    if args.max_column_width.is_some() {
        settings.max_column_width = args.max_column_width;
    }
    if args.emoji {
        settings.bool_style = BoolStyle::Emoji;
    }
    if args.separate_tables {
        settings.separate_tables = true;
    }
    if let Some(separator) = &args.list_separator {
        settings.list_separator = separator.clone();
    }
    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        settings.graph = Some(GraphColumns {
            from: from.clone(),
            to: to.clone(),
        });
    }
    Ok(settings)
}

fn infer_format(destination: &Destination) -> Option<OutputFormat> {
    match destination {
        Destination::Stdout => None,
        Destination::File(path) => OutputFormat::from_path(path),
        Destination::Object(ObjectLocation { key, .. }) => OutputFormat::from_path(Path::new(key)),
    }
}

/// One group per distinct value, in first-seen order
fn add_groups(report: &mut Report, records: Vec<Record>, column: &str, title: Option<&str>) {
    let mut groups: Vec<(String, Vec<Record>)> = Vec::new();
    for record in records {
        let value = record
            .get(column)
            .map(|v| v.sort_text())
            .unwrap_or_default();
        match groups.iter_mut().find(|(v, _)| *v == value) {
            Some((_, members)) => members.push(record),
            None => groups.push((value, vec![record])),
        }
    }

    for (value, members) in groups {
        let value = if value.is_empty() { "(none)".to_string() } else { value };
        match title {
            Some(title) => report.set_title(format!("{} - {}", title, value)),
            None => report.set_title(value),
        }
        report.extend(members);
        report.add_to_buffer();
    }
}

fn load_records(input: &Path) -> anyhow::Result<Vec<Record>> {
    let (text, source) = if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read records from stdin")?;
        (text, "stdin".to_string())
    } else {
        let text = fs::read_to_string(input)
            .with_context(|| format!("Failed to read input file: {}", input.display()))?;
        (text, input.display().to_string())
    };
    parse_records(&text, &source)
}

/// Accepts a JSON array of objects or a YAML sequence of mappings
fn parse_records(text: &str, source: &str) -> anyhow::Result<Vec<Record>> {
    let document: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => serde_yaml::from_str(text)
            .with_context(|| format!("{} is neither JSON nor YAML", source))?,
    };

    let items = match document {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => Vec::new(),
        _ => anyhow::bail!("{} must contain a list of records", source),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            serde_json::Value::Object(object) => Ok(Record::from_json_object(object)),
            _ => anyhow::bail!("{}: record {} is not an object", source, i + 1),
        })
        .collect()
}
