use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::{Map, Value as JsonValue};

use super::model::{DataTable, InstrumentMode};

/// Write `table` with a header row.
pub fn write_csv(table: &DataTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer
        .write_record(&table.column_names)
        .context("writing CSV header")?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

/// Write `table` as JSON records keyed by [`InstrumentMode::keys`].
pub fn write_json(table: &DataTable, mode: InstrumentMode, path: &Path) -> Result<()> {
    let keys = mode.keys();
    let records: Vec<JsonValue> = table
        .rows
        .iter()
        .map(|row| {
            let obj: Map<String, JsonValue> = keys
                .iter()
                .zip(row)
                .map(|(k, v)| (k.to_string(), JsonValue::from(*v)))
                .collect();
            JsonValue::Object(obj)
        })
        .collect();
    let text = serde_json::to_string_pretty(&records).context("serialising JSON")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

/// Write `table` as one Float64 column per table column.
pub fn write_parquet(table: &DataTable, path: &Path) -> Result<()> {
    if table.rows.iter().any(|r| r.len() != table.width()) {
        bail!("ragged table cannot be written to parquet");
    }

    let fields: Vec<Field> = table
        .column_names
        .iter()
        .map(|name| Field::new(name, DataType::Float64, false))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let columns: Vec<ArrayRef> = (0..table.width())
        .map(|j| {
            let values: Vec<f64> = table.rows.iter().map(|r| r[j]).collect();
            Arc::new(Float64Array::from(values)) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
