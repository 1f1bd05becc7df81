//! CSV output formatting.

use super::Tabular;
use crate::BoxError;
use std::io::Write;

/// Escape one CSV field.
///
/// Fields holding a comma, quote or line break are enclosed in double quotes,
/// with inner quotes doubled. No padding after the comma, spreadsheets do not
/// like it.
pub fn escape_csv_field(input: &str) -> String {
    if input.contains([',', '"', '\n', '\r']) {
        let escaped = input.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        input.to_string()
    }
}

/// One comma separated row, terminated by `\n`.
fn write_csv_row<W: Write>(out: &mut W, fields: &[String]) -> Result<(), BoxError> {
    let line = fields
        .iter()
        .map(|f| escape_csv_field(f))
        .collect::<Vec<String>>()
        .join(",");
    writeln!(out, "{line}")?;
    Ok(())
}

/// Write a header row, then one row per record.
///
/// An empty slice still produces the header.
pub fn write_csv<W: Write, T: Tabular>(out: &mut W, rows: &[T]) -> Result<(), BoxError> {
    let header: Vec<String> = T::header().iter().map(|h| h.to_string()).collect();
    write_csv_row(out, &header)?;
    for row in rows {
        write_csv_row(out, &row.fields())?;
    }
    Ok(())
}
