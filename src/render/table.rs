//! Box-drawn text tables.
//!
//! Cells wider than the configured maximum wrap onto extra lines of the same
//! row; every line of every cell is padded to its column width so sibling
//! columns stay aligned.

use super::Section;
use crate::record::Schema;
use crate::settings::{RenderSettings, TableStyle};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Border characters of a table style
#[derive(Debug, Clone, Copy)]
pub struct Borders {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_mid: char,
    pub top_right: char,
    pub mid_left: char,
    pub mid_mid: char,
    pub mid_right: char,
    pub bottom_left: char,
    pub bottom_mid: char,
    pub bottom_right: char,
}

impl Borders {
    pub fn for_style(style: TableStyle) -> Self {
        let chars = match style {
            TableStyle::Default => ['-', '|', '+', '+', '+', '+', '+', '+', '+', '+', '+'],
            TableStyle::Light => ['─', '│', '┌', '┬', '┐', '├', '┼', '┤', '└', '┴', '┘'],
            TableStyle::Rounded => ['─', '│', '╭', '┬', '╮', '├', '┼', '┤', '╰', '┴', '╯'],
            TableStyle::Bold => ['━', '┃', '┏', '┳', '┓', '┣', '╋', '┫', '┗', '┻', '┛'],
            TableStyle::Double => ['═', '║', '╔', '╦', '╗', '╠', '╬', '╣', '╚', '╩', '╝'],
        };
        Self {
            horizontal: chars[0],
            vertical: chars[1],
            top_left: chars[2],
            top_mid: chars[3],
            top_right: chars[4],
            mid_left: chars[5],
            mid_mid: chars[6],
            mid_right: chars[7],
            bottom_left: chars[8],
            bottom_mid: chars[9],
            bottom_right: chars[10],
        }
    }
}

/// Render every section as its own table, separated by a blank line
pub fn to_table(sections: &[Section], schema: &Schema, settings: &RenderSettings) -> String {
    sections
        .iter()
        .map(|section| format_table(section, schema, settings))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_table(section: &Section, schema: &Schema, settings: &RenderSettings) -> String {
    if schema.is_empty() {
        return section
            .title
            .as_ref()
            .map(|t| format!("{}\n", t))
            .unwrap_or_default();
    }

    let borders = Borders::for_style(settings.table_style);
    let max = settings.max_column_width;

    let header: Vec<Vec<String>> = schema.iter().map(|c| wrap(c, max)).collect();
    let rows: Vec<Vec<Vec<String>>> = section
        .text_rows(schema, settings)
        .iter()
        .map(|row| row.iter().map(|cell| wrap(cell, max)).collect())
        .collect();

    let mut widths: Vec<usize> = header
        .iter()
        .map(|lines| lines.iter().map(|l| display_width(l)).max().unwrap_or(0))
        .collect();
    for row in &rows {
        for (i, lines) in row.iter().enumerate() {
            for line in lines {
                widths[i] = widths[i].max(display_width(line));
            }
        }
    }

    // Widen the last column when the title would not fit
    let title_lines: Vec<String> = section
        .title
        .as_ref()
        .map(|t| t.lines().map(str::to_string).collect())
        .unwrap_or_default();
    let inner = |widths: &[usize]| widths.iter().map(|w| w + 2).sum::<usize>() + widths.len() - 1;
    let title_width = title_lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
    if title_width + 2 > inner(&widths) {
        let grow = title_width + 2 - inner(&widths);
        if let Some(last) = widths.last_mut() {
            *last += grow;
        }
    }

    let mut output = String::new();
    let rule = |left: char, mid: char, right: char| -> String {
        let mut line = String::new();
        line.push(left);
        let segments: Vec<String> = widths
            .iter()
            .map(|w| borders.horizontal.to_string().repeat(w + 2))
            .collect();
        line.push_str(&segments.join(&mid.to_string()));
        line.push(right);
        line.push('\n');
        line
    };

    if title_lines.is_empty() {
        output.push_str(&rule(borders.top_left, borders.top_mid, borders.top_right));
    } else {
        let span = inner(&widths);
        output.push(borders.top_left);
        output.push_str(&borders.horizontal.to_string().repeat(span));
        output.push(borders.top_right);
        output.push('\n');
        for line in &title_lines {
            output.push(borders.vertical);
            output.push(' ');
            output.push_str(&pad(line, span - 2));
            output.push(' ');
            output.push(borders.vertical);
            output.push('\n');
        }
        output.push_str(&rule(borders.mid_left, borders.top_mid, borders.mid_right));
    }

    push_row(&mut output, &header, &widths, borders.vertical);
    output.push_str(&rule(borders.mid_left, borders.mid_mid, borders.mid_right));
    for row in &rows {
        push_row(&mut output, row, &widths, borders.vertical);
    }
    output.push_str(&rule(
        borders.bottom_left,
        borders.bottom_mid,
        borders.bottom_right,
    ));

    output
}

/// Emit one logical row; its height is the tallest wrapped cell
fn push_row(output: &mut String, cells: &[Vec<String>], widths: &[usize], vertical: char) {
    let height = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    for line_no in 0..height {
        output.push(vertical);
        for (i, lines) in cells.iter().enumerate() {
            let text = lines.get(line_no).map(String::as_str).unwrap_or("");
            output.push(' ');
            output.push_str(&pad(text, widths[i]));
            output.push(' ');
            output.push(vertical);
        }
        output.push('\n');
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Split a cell into lines no wider than `max` (explicit newlines always break).
pub fn wrap(text: &str, max: Option<usize>) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.trim_end_matches('\r');
        match max {
            Some(max) if display_width(raw) > max => lines.extend(wrap_line(raw, max)),
            _ => lines.push(raw.to_string()),
        }
    }
    lines
}

/// Greedy word wrap; words longer than `max` are split mid-word
fn wrap_line(line: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0;

    for word in line.split(' ') {
        let word_width = display_width(word);
        if width > 0 && width + 1 + word_width <= max {
            current.push(' ');
            current.push_str(word);
            width += 1 + word_width;
            continue;
        }
        if width > 0 {
            lines.push(std::mem::take(&mut current));
            width = 0;
        }
        if word_width <= max {
            current.push_str(word);
            width = word_width;
            continue;
        }
        for c in word.chars() {
            let w = char_width(c);
            if width > 0 && width + w > max {
                lines.push(std::mem::take(&mut current));
                width = 0;
            }
            current.push(c);
            width += w;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Terminal columns taken by `text`
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}
