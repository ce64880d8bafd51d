use anyhow::Result;
use indego_ingest::{aggregate, snapshot};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Directory scanned for zipped quarterly exports when no argument is given.
const DEFAULT_RAW_DIR: &str = "./raw_data";
/// Snapshot location when no second argument is given.
const DEFAULT_SNAPSHOT_PATH: &str = "indego_bike_data.parquet";

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let mut args = env::args().skip(1);
    let raw_dir = args.next().unwrap_or_else(|| DEFAULT_RAW_DIR.to_string());
    let out_path = args
        .next()
        .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.to_string());

    info!(raw_dir = %raw_dir, out_path = %out_path, "startup");

    let table = aggregate::aggregate_zipped_csvs(&raw_dir)?;
    if table.num_columns() == 0 {
        warn!("no archives could be aggregated; skipping snapshot");
        return Ok(());
    }

    snapshot::write_snapshot(&table, &out_path)?;
    info!(rows = table.num_rows, "all done");
    Ok(())
}
