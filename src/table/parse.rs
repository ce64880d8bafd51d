// src/table/parse.rs

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::{infer, Column, Table};

/// Field values the exports use for absent data; these read as missing
/// rather than as literal text.
static MISSING_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"]
        .into_iter()
        .collect()
});

fn parse_cell(field: &str) -> Option<String> {
    if MISSING_TOKENS.contains(field) {
        None
    } else {
        Some(field.to_string())
    }
}

/// Repeated header names get a numeric suffix so every column keys uniquely
/// in the concatenation step.
fn dedup_names(header: &StringRecord) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for name in header.iter() {
        let mut unique = name.to_string();
        let mut suffix = 0usize;
        while names.contains(&unique) {
            suffix += 1;
            unique = format!("{name}.{suffix}");
        }
        names.push(unique);
    }
    names
}

/// Parse comma-delimited text (header row first, standard quoting) into a
/// column-oriented [`Table`]. Column dtypes are inferred once all rows are
/// read. `source` names the originating CSV entry for error messages.
pub fn parse_csv(text: &str, source: &str) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let header = rdr
        .headers()
        .with_context(|| format!("reading header of {source}"))?
        .clone();
    if header.is_empty() {
        bail!("{source}: no columns to parse");
    }
    let names = dedup_names(&header);

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    let mut num_rows = 0usize;
    for (idx, record) in rdr.records().enumerate() {
        let record =
            record.with_context(|| format!("{source}: malformed record {}", idx + 1))?;
        for (col, field) in record.iter().enumerate() {
            cells[col].push(parse_cell(field));
        }
        num_rows += 1;
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column {
            dtype: infer::infer_dtype(&values),
            name,
            values,
        })
        .collect();

    Ok(Table { columns, num_rows })
}
