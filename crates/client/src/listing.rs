use std::fmt::Display;

use common::listing::{FileRecord, Recipients};

const HEADERS: [&str; 5] = ["#", "Name", "Size", "Modified", "ID"];

/// Render the listing as an aligned text table
pub fn render_table(records: &[FileRecord]) -> String {
    if records.is_empty() {
        return "No files found".to_string();
    }

    let rows: Vec<[String; 5]> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                (i + 1).to_string(),
                r.original_name.clone(),
                r.size_fmt.clone(),
                r.modified_fmt.clone(),
                r.name.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[&str]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_row(&HEADERS));
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(format_row(&cells));
    }
    lines.join("\n")
}

/// Listing failures are shown in place of the table, not raised
pub fn render_error(error: impl Display) -> String {
    format!("Error loading files: {}", error)
}

pub fn render_recipients(recipients: &Recipients) -> String {
    recipients.iter().collect::<Vec<_>>().join("\n")
}
