// src/table/mod.rs

pub mod infer;
pub mod parse;

use std::collections::{HashMap, HashSet};

/// Column value type inferred from the raw CSV text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DType {
    Int64,
    Float64,
    /// Naive wall-clock timestamp at millisecond precision.
    TimestampMs,
    Utf8,
}

impl DType {
    /// Widest common type for two columns sharing a name across files.
    /// Cells stay as raw text until the snapshot is built, so widening to
    /// `Utf8` loses nothing.
    pub fn unify(self, other: DType) -> DType {
        use DType::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Int64, Float64) | (Float64, Int64) => Float64,
            _ => Utf8,
        }
    }
}

/// A named column: the inferred dtype plus the raw cell text. `None` marks a
/// missing value, either from a missing-value token in the source field or
/// because the source table lacked the column entirely.
#[derive(Clone, Debug)]
pub struct Column {
    pub name: String,
    pub dtype: DType,
    pub values: Vec<Option<String>>,
}

/// Column-oriented table. Every column holds exactly `num_rows` values.
#[derive(Clone, Debug, Default)]
pub struct Table {
    pub columns: Vec<Column>,
    pub num_rows: usize,
}

impl Table {
    pub fn empty() -> Self {
        Table::default()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Row-wise concatenation with column-union semantics: columns appear in
    /// first-seen order across `tables`, rows from a table lacking a column
    /// read as null there, and the result's row count is the sum of the
    /// inputs'. Dtypes unify pairwise; a column that carries no values in
    /// one input does not narrow the unified dtype.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut order: Vec<String> = Vec::new();
        let mut merged: HashMap<String, Column> = HashMap::new();
        // names whose dtype is backed by at least one present cell
        let mut typed: HashSet<String> = HashSet::new();
        let mut total_rows = 0usize;

        for table in tables {
            let rows_before = total_rows;
            total_rows += table.num_rows;

            for col in table.columns {
                let has_values = col.values.iter().any(Option::is_some);
                let slot = merged.entry(col.name.clone()).or_insert_with(|| {
                    order.push(col.name.clone());
                    Column {
                        name: col.name.clone(),
                        dtype: col.dtype,
                        values: Vec::new(),
                    }
                });
                // rows from earlier tables that lacked this column read as null
                if slot.values.len() < rows_before {
                    slot.values.resize(rows_before, None);
                }
                if has_values {
                    slot.dtype = if typed.insert(col.name.clone()) {
                        col.dtype
                    } else {
                        slot.dtype.unify(col.dtype)
                    };
                }
                slot.values.extend(col.values);
            }

            // null-fill every column this table did not carry
            for slot in merged.values_mut() {
                if slot.values.len() < total_rows {
                    slot.values.resize(total_rows, None);
                }
            }
        }

        let columns = order
            .into_iter()
            .map(|name| merged.remove(&name).expect("column tracked in order"))
            .collect();
        Table {
            columns,
            num_rows: total_rows,
        }
    }
}
