//! Rendering engine.
//!
//! A [`Report`] buffers one or more groups of records and projects them into
//! the configured [`OutputFormat`]:
//! - `table` / `markdown`: aligned text tables
//! - `csv`, `json`, `yaml`: flat serializations
//! - `html`: a report page that append mode grows in place
//! - `dot`, `mermaid`: graphs derived from a from/to column pair
//! - `drawio`: draw.io CSV import with merge-on-append

mod csv;
mod dot;
pub mod drawio;
pub mod graph;
mod html;
mod json;
mod markdown;
mod mermaid;
pub mod table;

pub use graph::Graph;
pub use html::APPEND_MARKER;

use crate::error::{RenderError, Result};
use crate::record::{Record, RecordCollection, Schema};
use crate::settings::{OutputFormat, RenderSettings};
use crate::sink::{OutputSink, WriteMode};

/// One logical group of records with its own title
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub title: Option<String>,
    pub records: RecordCollection,
}

impl Section {
    fn new(title: Option<String>, settings: &RenderSettings) -> Self {
        Self {
            title,
            records: RecordCollection::with_sort_key(settings.sort_key.clone())
                .with_text_style(settings.bool_style, &settings.list_separator),
        }
    }

    /// Cells flattened to text in schema order
    pub(crate) fn text_rows(&self, schema: &Schema, settings: &RenderSettings) -> Vec<Vec<String>> {
        self.records
            .project(schema)
            .iter()
            .map(|row| row.iter().map(|value| settings.text(value)).collect())
            .collect()
    }
}

/// Records plus the settings and schema they are rendered with
#[derive(Debug, Clone)]
pub struct Report {
    settings: RenderSettings,
    schema: Schema,
    buffered: Vec<Section>,
    current: Section,
}

impl Report {
    pub fn new(settings: RenderSettings, schema: Schema) -> Self {
        let current = Section::new(settings.title.clone(), &settings);
        Self {
            settings,
            schema,
            buffered: Vec::new(),
            current,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Add a record to the current group
    pub fn add_record(&mut self, record: Record) {
        self.current.records.add(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.current.records.extend(records);
    }

    /// Title of the current group
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.current.title = Some(title.into());
    }

    /// Close the current group and start a new one.
    ///
    /// Empty groups are dropped.
    pub fn add_to_buffer(&mut self) {
        let next = Section::new(self.settings.title.clone(), &self.settings);
        let done = std::mem::replace(&mut self.current, next);
        if !done.records.is_empty() {
            self.buffered.push(done);
        }
    }

    /// Total records across all groups
    pub fn len(&self) -> usize {
        self.buffered.iter().map(|s| s.records.len()).sum::<usize>() + self.current.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate settings and settle the groups into output sections.
    fn sections(&self) -> Result<Vec<Section>> {
        self.settings.validate(&self.schema)?;

        let mut groups: Vec<Section> = self.buffered.clone();
        if !self.current.records.is_empty() {
            groups.push(self.current.clone());
        }
        if groups.is_empty() {
            groups.push(Section::new(self.settings.title.clone(), &self.settings));
        }

        if !self.settings.separate_tables && groups.len() > 1 {
            let title = groups.iter().find_map(|g| g.title.clone());
            let mut combined = Section::new(title, &self.settings);
            for group in groups {
                combined.records.extend(group.records.into_records());
            }
            groups = vec![combined];
        }

        if groups.len() > 1 && !self.settings.format.supports_sections() {
            return Err(RenderError::config(format!(
                "{} output cannot hold separate tables",
                self.settings.format
            )));
        }

        Ok(groups)
    }

    /// Render the artifact as text.
    ///
    /// `prior` is the destination's existing content. It only matters in
    /// append mode: a missing or blank prior is a fresh write, otherwise
    /// csv leaves out its header and json, yaml, html and drawio merge with it.
    pub fn render(&self, prior: Option<&str>, target: &str) -> Result<String> {
        let sections = self.sections()?;
        self.project(&sections, self.existing(prior), target)
    }

    /// Render as a fresh artifact, ignoring any prior output
    pub fn render_to_string(&self) -> Result<String> {
        self.render(None, "memory")
    }

    /// Render and write through `sink`.
    ///
    /// Configuration problems are reported before the destination is touched;
    /// any failure leaves the destination as it was.
    pub fn write(&self, sink: &mut OutputSink<'_>) -> Result<()> {
        let sections = self.sections()?;
        sink.check()?;

        let format = self.settings.format;
        let prior = if self.settings.append {
            sink.read_existing()?
        } else {
            None
        };
        let prior = self.existing(prior.as_deref());
        let target = sink.destination().to_string();

        tracing::debug!(
            format = %format,
            destination = %target,
            records = self.len(),
            sections = sections.len(),
            appending = prior.is_some(),
            "rendering report"
        );

        let text = self.project(&sections, prior, &target)?;
        let mode = if prior.is_some() && !format.merges_on_append() {
            WriteMode::Append
        } else {
            WriteMode::Overwrite
        };
        sink.write(text.as_bytes(), mode)
    }

    /// Prior content worth appending to
    fn existing<'p>(&self, prior: Option<&'p str>) -> Option<&'p str> {
        if !self.settings.append {
            return None;
        }
        prior.filter(|p| !p.trim().is_empty())
    }

    fn project(&self, sections: &[Section], prior: Option<&str>, target: &str) -> Result<String> {
        let text = self.project_format(sections, prior, target)?;
        // Raw appends must start on a fresh line
        match prior {
            Some(p) if !self.settings.format.merges_on_append() && !p.ends_with('\n') => {
                Ok(format!("\n{}", text))
            }
            _ => Ok(text),
        }
    }

    fn project_format(
        &self,
        sections: &[Section],
        prior: Option<&str>,
        target: &str,
    ) -> Result<String> {
        let settings = &self.settings;
        let schema = &self.schema;

        match settings.format {
            OutputFormat::Table => Ok(table::to_table(sections, schema, settings)),
            OutputFormat::Markdown => Ok(markdown::to_markdown(sections, schema, settings)),
            OutputFormat::Csv => csv::to_csv(sections, schema, settings, prior.is_some()),
            OutputFormat::Json => json::to_json(&sections[0], schema, prior, target),
            OutputFormat::Yaml => json::to_yaml(&sections[0], schema, prior, target),
            OutputFormat::Html => html::to_html(sections, schema, settings, prior, target),
            OutputFormat::Dot => dot::to_dot(&sections[0], settings),
            OutputFormat::Mermaid => mermaid::to_mermaid(&sections[0], settings),
            OutputFormat::Drawio => drawio::to_drawio(&sections[0], schema, settings, prior, target),
        }
    }
}
