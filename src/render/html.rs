//! HTML report page.
//!
//! Tables are placed in front of an end marker so that append mode can
//! splice later tables into the same page instead of regenerating it.

use super::Section;
use crate::error::{RenderError, Result};
use crate::record::Schema;
use crate::settings::RenderSettings;

/// Insertion point for appended tables
pub const APPEND_MARKER: &str = "<div id='end'></div>";

/// Render a new page, or splice the tables into `prior` in append mode
pub fn to_html(
    sections: &[Section],
    schema: &Schema,
    settings: &RenderSettings,
    prior: Option<&str>,
    target: &str,
) -> Result<String> {
    let tables: String = sections
        .iter()
        .map(|section| table_html(section, schema, settings))
        .collect();

    match prior.filter(|p| !p.trim().is_empty()) {
        Some(existing) => {
            let at = existing.find(APPEND_MARKER).ok_or_else(|| {
                RenderError::parse("html", target, "append marker not found in page")
            })?;
            tracing::debug!(destination = %target, "splicing tables into existing page");
            Ok(format!("{}{}{}", &existing[..at], tables, &existing[at..]))
        }
        None => Ok(page(settings.title.as_deref(), &tables)),
    }
}

fn table_html(section: &Section, schema: &Schema, settings: &RenderSettings) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"report-table\">\n");
    if let Some(title) = &section.title {
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(title)));
    }
    html.push_str("<table>\n<thead>\n<tr>");
    for column in schema.iter() {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in section.text_rows(schema, settings) {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!(
                "<td>{}</td>",
                escape_html(&cell).replace('\n', "<br>")
            ));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</div>\n");
    html
}

fn page(title: Option<&str>, tables: &str) -> String {
    let title = escape_html(title.unwrap_or("cloudscope report"));
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
    :root {{
      --color-bg: #ffffff;
      --color-surface: #f6f8fa;
      --color-text: #1f2328;
      --color-text-muted: #656d76;
      --color-border: #d0d7de;
      --color-accent: #0969da;
    }}

    @media (prefers-color-scheme: dark) {{
      :root {{
        --color-bg: #0a0a0a;
        --color-surface: #111111;
        --color-text: #e6edf3;
        --color-text-muted: #8b949e;
        --color-border: #27272a;
        --color-accent: #58a6ff;
      }}
    }}

    body {{
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
      background: var(--color-bg);
      color: var(--color-text);
      margin: 0;
      padding: 24px;
    }}

    h1 {{ font-size: 1.4em; color: var(--color-accent); }}
    h2 {{ font-size: 1.1em; margin-top: 32px; }}

    table {{
      border-collapse: collapse;
      width: 100%;
      font-size: 13px;
    }}

    th, td {{
      border: 1px solid var(--color-border);
      padding: 6px 10px;
      text-align: left;
      vertical-align: top;
    }}

    th {{ background: var(--color-surface); }}
    tbody tr:nth-child(even) {{ background: var(--color-surface); }}

    footer {{
      margin-top: 32px;
      font-size: 12px;
      color: var(--color-text-muted);
    }}
  </style>
</head>
<body>
<h1>{title}</h1>
{tables}{marker}
<footer>Generated by cloudscope on {generated}</footer>
</body>
</html>
"##,
        title = title,
        tables = tables,
        marker = APPEND_MARKER,
        generated = generated,
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
