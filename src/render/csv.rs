//! CSV output.

use super::Section;
use crate::error::{RenderError, Result};
use crate::record::Schema;
use crate::settings::RenderSettings;
use std::io;

/// Render sections as CSV.
///
/// When appending to existing content the header row is left out because the
/// destination already starts with one. Separate tables are divided by an
/// empty line.
pub fn to_csv(
    sections: &[Section],
    schema: &Schema,
    settings: &RenderSettings,
    appending: bool,
) -> Result<String> {
    let mut output = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        let rows = section.text_rows(schema, settings);
        let header = (!appending).then(|| schema.columns());
        output.push_str(&write_rows(header, &rows)?);
    }
    Ok(output)
}

/// Encode an optional header and rows with standard CSV quoting
pub(crate) fn write_rows(header: Option<&[String]>, rows: &[Vec<String>]) -> Result<String> {
    let mut writer = ::csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    if let Some(header) = header {
        writer.write_record(header).map_err(encode_error)?;
    }
    for row in rows {
        writer.write_record(row).map_err(encode_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RenderError::io("encode", "csv", e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| RenderError::io("encode", "csv", io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn encode_error(err: ::csv::Error) -> RenderError {
    RenderError::io("encode", "csv", io::Error::other(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordCollection};

    fn section(records: Vec<Record>) -> Section {
        let mut collection = RecordCollection::new();
        collection.extend(records);
        Section {
            title: Some("ignored".to_string()),
            records: collection,
        }
    }

    #[test]
    fn test_quoting_and_lists() {
        let s = section(vec![Record::new()
            .with("Name", "say \"hi\"")
            .with("Cidrs", vec!["10.0.0.0/16", "10.1.0.0/16"])]);
        let output = to_csv(&[s], &Schema::new(["Name", "Cidrs"]), &RenderSettings::default(), false).unwrap();
        assert_eq!(
            output,
            "Name,Cidrs\n\"say \"\"hi\"\"\",\"10.0.0.0/16,10.1.0.0/16\"\n"
        );
    }

    #[test]
    fn test_append_omits_header() {
        let s = section(vec![Record::new().with("Name", "vpc-3")]);
        let output = to_csv(&[s], &Schema::new(["Name"]), &RenderSettings::default(), true).unwrap();
        assert_eq!(output, "vpc-3\n");
    }

    #[test]
    fn test_separate_sections() {
        let a = section(vec![Record::new().with("Name", "a")]);
        let b = section(vec![Record::new().with("Name", "b")]);
        let output = to_csv(&[a, b], &Schema::new(["Name"]), &RenderSettings::default(), false).unwrap();
        assert_eq!(output, "Name\na\n\nName\nb\n");
    }
}
