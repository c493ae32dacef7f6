//! Markdown pipe tables.

use super::Section;
use crate::record::Schema;
use crate::settings::RenderSettings;

/// Render every section as a pipe table, titled with a `##` heading
pub fn to_markdown(sections: &[Section], schema: &Schema, settings: &RenderSettings) -> String {
    let mut output = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        if let Some(title) = &section.title {
            output.push_str(&format!("## {}\n\n", title));
        }

        let header: Vec<String> = schema.iter().map(escape_cell).collect();
        output.push_str(&format!("| {} |\n", header.join(" | ")));
        let rule: Vec<&str> = schema.iter().map(|_| "---").collect();
        output.push_str(&format!("| {} |\n", rule.join(" | ")));

        for row in section.text_rows(schema, settings) {
            let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
            output.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
    }
    output
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordCollection};

    #[test]
    fn test_markdown_table() {
        let mut records = RecordCollection::new();
        records.add(
            Record::new()
                .with("Name", "a|b")
                .with("Notes", "line1\nline2")
                .with("Public", false),
        );
        let section = Section {
            title: Some("VPCs".to_string()),
            records,
        };

        let output = to_markdown(
            &[section],
            &Schema::new(["Name", "Notes", "Public"]),
            &RenderSettings::default(),
        );
        assert_eq!(
            output,
            "## VPCs\n\n| Name | Notes | Public |\n| --- | --- | --- |\n| a\\|b | line1<br>line2 | No |\n"
        );
    }
}
