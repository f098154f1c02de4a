//! Storage backend (in-memory table + CSV persistence)
//!
//! **Full-Rewrite Design** (Snapshot Write Pattern):
//! - The summary table is small (one row per training run) and loaded
//!   fully into memory on bind
//! - Write pattern: every append rewrites the whole file through a temp
//!   file and an atomic rename, so readers never observe a torn file
//! - NOT suitable for: concurrent writers (two processes appending race
//!   and the slower snapshot wins), high-frequency metric streams

pub mod csv;
mod table;

pub use table::SummaryTable;
