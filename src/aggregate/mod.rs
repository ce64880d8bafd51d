// src/aggregate/mod.rs

use crate::extract;
use crate::table::{parse, Table};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// List the `.zip` archives directly inside `raw_dir`, sorted by file name.
///
/// The suffix match is exact, so `Indego.ZIP` and loose `.csv` exports are
/// skipped. A missing or unreadable directory is an error.
pub fn list_archives(raw_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(raw_dir)
        .with_context(|| format!("reading directory {}", raw_dir.display()))?;

    let mut seen = 0usize;
    let mut archives = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("reading entry of {}", raw_dir.display()))?;
        seen += 1;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".zip") {
            archives.push(entry.path());
        }
    }
    // Directory order is platform noise; sorting keeps output stable run to run.
    archives.sort();

    info!(
        dir = %raw_dir.display(),
        seen,
        archives = archives.len(),
        "scanned raw directory"
    );
    Ok(archives)
}

fn load_archive_table(zip_path: &Path) -> Result<Table> {
    let (entry_name, text) = extract::read_first_csv_entry(zip_path)?;
    parse::parse_csv(&text, &entry_name)
}

/// Parse every archive in `raw_dir` and concatenate the per-file tables into
/// one, unioning columns across files. An archive that cannot be extracted or
/// parsed is logged and skipped; the rest of the batch still goes through.
#[tracing::instrument(level = "info", skip(raw_dir), fields(dir = %raw_dir.as_ref().display()))]
pub fn aggregate_zipped_csvs<P: AsRef<Path>>(raw_dir: P) -> Result<Table> {
    let archives = list_archives(raw_dir.as_ref())?;

    let mut tables = Vec::with_capacity(archives.len());
    for zip_path in &archives {
        let name = zip_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| zip_path.display().to_string());
        match load_archive_table(zip_path) {
            Ok(table) => {
                info!(
                    file = %name,
                    rows = table.num_rows,
                    columns = table.num_columns(),
                    "parsed archive"
                );
                tables.push(table);
            }
            Err(err) => {
                error!("failed to process {}: {:#}", name, err);
            }
        }
    }

    info!(tables = tables.len(), "concatenating per-file tables");
    let combined = Table::concat(tables);
    info!(
        rows = combined.num_rows,
        columns = combined.num_columns(),
        "combined table built"
    );
    Ok(combined)
}
