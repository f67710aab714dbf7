//! Plain-text table rendering of a resource collection

use furnish_core::{FieldOptions, Record, ResourceSchema};
use serde_json::Value;

const GAP: &str = "  ";

/// Display form of one cell
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(true)) => "Yes".to_string(),
        Some(Value::Bool(false)) => "No".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render `records` as a fixed-width table: `ID` then each schema column
///
/// Ids of fields with loaded options are shown by their option label.
pub fn render_table(schema: &ResourceSchema, records: &[Record], options: &FieldOptions) -> String {
    let headers: Vec<&str> = std::iter::once("ID")
        .chain(schema.fields.iter().map(|field| field.label))
        .collect();

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            std::iter::once(record.id.to_string())
                .chain(schema.fields.iter().map(|field| {
                    let value = record.get(field.name);
                    value
                        .and_then(|value| options.label(field.name, value))
                        .map_or_else(|| cell(value), str::to_string)
                }))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);

    if rows.is_empty() {
        out.push_str(&format!("No {} found.\n", schema.plural));
    }
    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }

    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (value, width) in cells.zip(widths) {
        if !line.is_empty() {
            line.push_str(GAP);
        }
        line.push_str(&format!("{value:<width$}"));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
