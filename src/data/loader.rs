use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{DataTable, InstrumentMode};
use super::parser::{self, ParseError};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a numeric table for `mode` from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – `delimiter`-separated rows, optional header line
/// * `.tsv`          – tab-separated rows, optional header line
/// * `.json`         – `[[x, y], ...]` or `[{ "wavelength": .., "absorbance": .. }, ...]`
/// * `.parquet`      – the first numeric columns of the file
pub fn load_table(path: &Path, mode: InstrumentMode, delimiter: char) -> Result<DataTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" => load_delimited(path, mode, delimiter)?,
        "tsv" => load_delimited(path, mode, '\t')?,
        "json" => load_json(path, mode)?,
        "parquet" | "pq" => load_parquet(path, mode)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    if table.is_empty() {
        bail!("{} contains no data rows", path.display());
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Rows of `mode.column_count()` numbers.  A first line that does not parse as
/// numbers is taken as the header and supplies the column names.
fn load_delimited(path: &Path, mode: InstrumentMode, delimiter: char) -> Result<DataTable> {
    let delim = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("delimiter {delimiter:?} is not a single ASCII character"))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delim)
        .from_path(path)
        .context("opening delimited file")?;

    let columns = mode.column_count();
    let mut column_names: Vec<String> = mode.columns().iter().map(|c| c.to_string()).collect();
    let mut rows = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("reading record {}", i + 1))?;
        let line_no = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 1);

        if record.iter().all(str::is_empty) {
            continue;
        }

        let content = record.iter().collect::<Vec<_>>().join(delimiter.to_string().as_str());

        if rows.is_empty() && i == 0 && record.iter().any(|f| f.parse::<f64>().is_err()) {
            if record.len() != columns {
                return Err(ParseError::FieldCount {
                    line: line_no,
                    content,
                    expected: columns,
                    found: record.len(),
                })
                .context("reading header");
            }
            log::debug!("Treating first line of {} as header", path.display());
            column_names = record.iter().map(str::to_string).collect();
            continue;
        }

        let row = parser::parse_line(&content, line_no, delimiter, columns)
            .with_context(|| format!("parsing {}", path.display()))?;
        rows.push(row);
    }

    Ok(DataTable::new(column_names, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema, either rows of numbers:
///
/// ```json
/// [[200.0, 0.01], [250.0, 0.18]]
/// ```
///
/// or records keyed by [`InstrumentMode::keys`]:
///
/// ```json
/// [{ "retention_time": 1.2, "height": 45.0, "width": 0.2 }]
/// ```
///
/// Two-column modes also accept `x` / `y` keys.
fn load_json(path: &Path, mode: InstrumentMode) -> Result<DataTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let columns = mode.column_count();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let row = match rec {
            JsonValue::Array(values) => {
                if values.len() != columns {
                    bail!("Row {i}: expected {columns} values, found {}", values.len());
                }
                values
                    .iter()
                    .enumerate()
                    .map(|(j, v)| json_number(Some(v), i, &format!("[{j}]")))
                    .collect::<Result<Vec<f64>>>()?
            }
            JsonValue::Object(obj) => {
                let keys = record_keys(obj, mode)
                    .with_context(|| format!("Row {i}: expected keys {:?}", mode.keys()))?;
                keys.iter()
                    .map(|k| json_number(obj.get(*k), i, k))
                    .collect::<Result<Vec<f64>>>()?
            }
            _ => bail!("Row {i} is neither an array nor an object"),
        };
        rows.push(row);
    }

    let names = mode.columns().iter().map(|c| c.to_string()).collect();
    Ok(DataTable::new(names, rows))
}

fn record_keys(
    obj: &serde_json::Map<String, JsonValue>,
    mode: InstrumentMode,
) -> Option<&'static [&'static str]> {
    let keys = mode.keys();
    if keys.iter().all(|k| obj.contains_key(*k)) {
        return Some(keys);
    }
    if keys.len() == 2 && obj.contains_key("x") && obj.contains_key("y") {
        return Some(&["x", "y"]);
    }
    None
}

fn json_number(val: Option<&JsonValue>, row: usize, field: &str) -> Result<f64> {
    let v = val
        .and_then(|v| v.as_f64())
        .with_context(|| format!("Row {row}, {field}: missing or not a number"))?;
    if !v.is_finite() {
        bail!("Row {row}, {field}: {v} is not finite");
    }
    Ok(v)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load the first `mode.column_count()` numeric columns of a Parquet file.
///
/// Numeric means Float64, Float32, Int64 or Int32; other columns (sample
/// names, notes, ...) are ignored.  Works with files written by Pandas or
/// Polars as well as by the `generate_sample` tool.
fn load_parquet(path: &Path, mode: InstrumentMode) -> Result<DataTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let columns = mode.column_count();
    let mut column_names = Vec::new();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let numeric: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| is_numeric(f.data_type()))
            .map(|(i, f)| (i, f.name().clone()))
            .take(columns)
            .collect();

        if numeric.len() < columns {
            bail!(
                "Parquet file has {} numeric columns, {columns} needed",
                numeric.len()
            );
        }
        if column_names.is_empty() {
            column_names = numeric.iter().map(|(_, n)| n.clone()).collect();
        }

        for row in 0..batch.num_rows() {
            let values = numeric
                .iter()
                .map(|(idx, name)| {
                    extract_f64(batch.column(*idx), row)
                        .with_context(|| format!("Row {}: failed to read '{name}'", rows.len()))
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(values);
        }
    }

    Ok(DataTable::new(column_names, rows))
}

// -- Parquet / Arrow helpers --

fn is_numeric(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32
    )
}

/// Extract a single finite number from an Arrow column at a given row.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row) as f64,
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row) as f64,
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row) as f64,
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    if !value.is_finite() {
        bail!("{value} is not finite");
    }
    Ok(value)
}
