//! Terminal rendering of extracted records.
//!
//! Output is Markdown-flavored text: a linked heading, the description
//! paragraph, and the two tables inside fenced blocks so fixed-column
//! alignment survives any viewer.

use crate::link;
use crate::model::{Card, Row};

/// Width of the horizontal rules between sections.
const RULE_WIDTH: usize = 100;

/// Meanings in the describer table wrap at this column.
const FIELD_WRAP_WIDTH: usize = 107;

/// Render a record for display.
///
/// Incomplete records render to the empty string; the caller decides how to
/// report that.
pub fn render(card: &Card, base_url: &str) -> String {
    if !card.is_complete() {
        return String::new();
    }

    let heading = match link::doc_url(base_url, &card.name) {
        Some(url) => format!(
            "__**[`{}`]({})**__:  {}",
            card.name, url, card.short_description
        ),
        None => format!("__**`{}`**__:  {}", card.name, card.short_description),
    };

    let rule = "-".repeat(RULE_WIDTH);
    format!(
        "{heading}\n\n{rule}\n\n{}\n\n{rule}\n\n{}\n\n{rule}\n\n{}",
        card.long_description,
        format_section(card),
        fields_section(card),
    )
}

/// The format table, with its leading section labels, in a fenced block.
fn format_section(card: &Card) -> String {
    let labels: Vec<&Row> = card
        .format
        .iter()
        .take_while(|row| row.len() == 1)
        .collect();

    let mut out = String::from("```text\n\nFormat:\n\n");
    for label in &labels {
        out.push_str(&label.concat());
        out.push('\n');
    }
    out.push_str(&render_table(&card.format[labels.len()..], None));
    out.push_str("\n```");
    out
}

fn fields_section(card: &Card) -> String {
    format!(
        "```text\n\n{}\n```",
        render_table(&card.fields, Some(FIELD_WRAP_WIDTH))
    )
}

/// Render rows as a pipe-delimited table with a rule under the header.
///
/// With `wrap` set, cells wider than the limit are word-wrapped and the row
/// grows in height; column widths are taken over the wrapped lines.
fn render_table(rows: &[Row], wrap: Option<usize>) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let columns = rows.iter().map(Row::len).max().unwrap_or(0);

    // Each cell becomes one or more lines.
    let wrapped: Vec<Vec<Vec<String>>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| match wrap {
                    Some(width) => wrap_text(cell, width),
                    None => vec![cell.clone()],
                })
                .collect()
        })
        .collect();

    let mut widths = vec![0usize; columns];
    for row in &wrapped {
        for (col, lines) in row.iter().enumerate() {
            for line in lines {
                widths[col] = widths[col].max(line.chars().count());
            }
        }
    }

    let mut out = String::new();
    for (row_index, row) in wrapped.iter().enumerate() {
        let height = row.iter().map(Vec::len).max().unwrap_or(1);
        for line_index in 0..height {
            for (col, width) in widths.iter().enumerate() {
                let text = row
                    .get(col)
                    .and_then(|lines| lines.get(line_index))
                    .map(String::as_str)
                    .unwrap_or("");
                out.push_str(&format!(" {text:<width$} |"));
            }
            out.push('\n');
        }
        if row_index == 0 {
            for width in &widths {
                out.push_str(&format!("{:-<w$}|", "", w = width + 2));
            }
            out.push('\n');
        }
    }
    out
}

/// Word-wrap `text` to at most `width` characters per line.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
