use thiserror::Error;

use super::model::{DataTable, InstrumentMode};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// First failure found while parsing pasted or uploaded text.
/// Line numbers are 1-based, field indices are 1-based as shown to users.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("no data rows found")]
    Empty,

    #[error("line {line}: expected {expected} fields but found {found} in '{content}'")]
    FieldCount {
        line: usize,
        content: String,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, field {field}: '{token}' is not a number (in '{content}')")]
    NotANumber {
        line: usize,
        field: usize,
        token: String,
        content: String,
    },

    #[error("line {line}, field {field}: '{token}' is not a finite number (in '{content}')")]
    NotFinite {
        line: usize,
        field: usize,
        token: String,
        content: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse delimited text into rows of exactly `columns` floats.
///
/// * blank lines are skipped
/// * every field is trimmed before conversion
/// * `NaN` / `inf` are rejected
/// * the first offending line aborts the parse
pub fn parse_rows(text: &str, delimiter: char, columns: usize) -> Result<Vec<Vec<f64>>, ParseError> {
    let mut rows = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        rows.push(parse_line(line, i + 1, delimiter, columns)?);
    }

    if rows.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(rows)
}

/// Parse text for a given mode into a [`DataTable`] named after the mode's columns.
pub fn parse_for_mode(text: &str, delimiter: char, mode: InstrumentMode) -> Result<DataTable, ParseError> {
    let rows = parse_rows(text, delimiter, mode.column_count())?;
    let names = mode.columns().iter().map(|c| c.to_string()).collect();
    Ok(DataTable::new(names, rows))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn parse_line(
    line: &str,
    line_no: usize,
    delimiter: char,
    columns: usize,
) -> Result<Vec<f64>, ParseError> {
    let fields: Vec<&str> = line.split(delimiter).collect();
    if fields.len() != columns {
        return Err(ParseError::FieldCount {
            line: line_no,
            content: line.to_string(),
            expected: columns,
            found: fields.len(),
        });
    }

    fields
        .iter()
        .enumerate()
        .map(|(j, tok)| parse_field(tok, line, line_no, j + 1))
        .collect()
}

fn parse_field(tok: &str, line: &str, line_no: usize, field: usize) -> Result<f64, ParseError> {
    let tok = tok.trim();
    let value = tok.parse::<f64>().map_err(|_| ParseError::NotANumber {
        line: line_no,
        field,
        token: tok.to_string(),
        content: line.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ParseError::NotFinite {
            line: line_no,
            field,
            token: tok.to_string(),
            content: line.to_string(),
        });
    }
    Ok(value)
}
