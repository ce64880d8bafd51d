// src/snapshot/mod.rs

use crate::table::{infer, DType, Table};
use anyhow::{bail, Context, Result};
use arrow::array::{
    ArrayRef, Float64Builder, Int64Builder, StringBuilder, TimestampMillisecondBuilder,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn arrow_type(dtype: DType) -> DataType {
    match dtype {
        DType::Int64 => DataType::Int64,
        DType::Float64 => DataType::Float64,
        DType::TimestampMs => DataType::Timestamp(TimeUnit::Millisecond, None),
        DType::Utf8 => DataType::Utf8,
    }
}

/// Convert the string-cell table into a typed `RecordBatch`. Every field is
/// nullable; a cell that does not parse under its column's dtype becomes null.
pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    if table.num_columns() == 0 {
        bail!("table has no columns");
    }

    let mut fields = Vec::with_capacity(table.num_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.num_columns());

    for column in &table.columns {
        fields.push(Field::new(&column.name, arrow_type(column.dtype), true));
        let array: ArrayRef = match column.dtype {
            DType::Int64 => {
                let mut b = Int64Builder::with_capacity(column.values.len());
                for v in &column.values {
                    b.append_option(v.as_deref().and_then(infer::parse_int));
                }
                Arc::new(b.finish())
            }
            DType::Float64 => {
                let mut b = Float64Builder::with_capacity(column.values.len());
                for v in &column.values {
                    b.append_option(v.as_deref().and_then(infer::parse_float));
                }
                Arc::new(b.finish())
            }
            DType::TimestampMs => {
                let mut b = TimestampMillisecondBuilder::with_capacity(column.values.len());
                for v in &column.values {
                    b.append_option(v.as_deref().and_then(infer::parse_timestamp_millis));
                }
                Arc::new(b.finish())
            }
            DType::Utf8 => {
                let mut b = StringBuilder::new();
                for v in &column.values {
                    b.append_option(v.as_deref());
                }
                Arc::new(b.finish())
            }
        };
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, arrays).context("building record batch")
}

/// Write the table to `out_path` as one snappy-compressed parquet file.
///
/// The bytes go to a sibling `.tmp` file first and are renamed into place, so
/// an interrupted run cannot leave a half-written snapshot at the final path.
#[tracing::instrument(level = "info", skip(table, out_path), fields(path = %out_path.as_ref().display()))]
pub fn write_snapshot<P: AsRef<Path>>(table: &Table, out_path: P) -> Result<()> {
    let out_path = out_path.as_ref();
    let batch = to_record_batch(table)?;

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let tmp_path = out_path.with_extension("tmp");
    let file = File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(BufWriter::new(file), batch.schema(), Some(props))
        .context("opening parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;

    fs::rename(&tmp_path, out_path).with_context(|| {
        format!(
            "renaming {} to {}",
            tmp_path.display(),
            out_path.display()
        )
    })?;

    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "wrote snapshot"
    );
    Ok(())
}
