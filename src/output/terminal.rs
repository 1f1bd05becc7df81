//! Terminal output utilities.
//!
//! Provides formatting helpers for terminal output.

use super::Tabular;
use crate::BoxError;
use colored::Colorize;
use std::io::Write;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.chars().count();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Write records as aligned columns with a highlighted header.
pub fn write_table<W: Write, T: Tabular>(out: &mut W, rows: &[T]) -> Result<(), BoxError> {
    let header = T::header();
    let rows: Vec<Vec<String>> = rows.iter().map(|r| r.fields()).collect();

    // quoted width of the widest cell in each column
    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|r| r[col].chars().count())
                .chain(std::iter::once(header[col].len()))
                .max()
                .unwrap_or(0)
                + 2
        })
        .collect();

    let header_line = header
        .iter()
        .zip(&widths)
        .map(|(h, w)| format_field(h, *w))
        .collect::<Vec<String>>()
        .join(" ");
    writeln!(out, "{}", header_line.bold())?;

    for row in &rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(f, w)| format_field(f, *w))
            .collect::<Vec<String>>()
            .join(" ");
        writeln!(out, "{line}")?;
    }

    writeln!(out, "# {} row(s)", rows.len())?;
    Ok(())
}
