//! Aggregation of zip-archived Indego bike-share CSV exports into a single
//! parquet snapshot.

pub mod aggregate;
pub mod extract;
pub mod snapshot;
pub mod table;
