//! Summary Store - durable, schema-evolving storage for experiment records
//!
//! One store per named dataset. The store binds to
//! `{model_name}_model_summary.csv` under a storage directory, loads it
//! fully on open, and rewrites it synchronously on every append. The file
//! is the single source of truth; the in-memory table is a snapshot of it.
//!
//! ## Schema Evolution
//!
//! Each appended record may carry metric keys the table has never seen.
//! Those become new columns, backfilled with null for every earlier row.
//! The column set only grows, within a process lifetime and across
//! reloads. Fixed columns lead; metric columns keep first-appearance
//! order across appends.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::experiment::ExperimentRecord;
use crate::storage::{csv, SummaryTable};
use crate::value::Value;

/// Durable store for experiment summary rows.
///
/// ## Example
///
/// ```rust,no_run
/// use resumen_db::{ExperimentRecord, SummaryStore};
///
/// let mut store = SummaryStore::open("churn", "training_output")?;
///
/// let mut record = ExperimentRecord::new("baseline", "first attempt", "run_001");
/// record.add_metric("loss", 0.25)?;
/// record.add_metric("roc_curve", "roc.png")?;
/// store.add_experiment(&record)?;
///
/// let row = store.row_to_map(0)?;
/// println!("{:?}", row.get("loss"));
/// # Ok::<(), resumen_db::Error>(())
/// ```
#[derive(Debug)]
pub struct SummaryStore {
    model_name: String,
    dir: PathBuf,
    table: SummaryTable,
}

impl SummaryStore {
    /// Open the store for `model_name` under `dir`.
    ///
    /// Binds to an existing summary file when one is present, otherwise
    /// starts an empty table. The directory is created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or an existing
    /// summary file cannot be parsed.
    pub fn open(model_name: impl Into<String>, dir: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(model_name, dir).open()
    }

    /// Create a builder for opening a store with non-default options.
    #[must_use]
    pub fn builder(
        model_name: impl Into<String>,
        dir: impl Into<PathBuf>,
    ) -> SummaryStoreBuilder {
        SummaryStoreBuilder::new(model_name, dir)
    }

    /// Get the model name the store was opened with.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Get the current storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the backing summary file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}_model_summary.csv", self.model_name))
    }

    /// Re-target the store at a new storage directory and reload,
    /// replacing the in-memory table.
    ///
    /// Used when the storage directory moves after construction. A missing
    /// file at the new location means an empty table, same as open.
    ///
    /// # Errors
    ///
    /// Returns an error if a summary file exists at the new location but
    /// cannot be parsed.
    pub fn rebind(&mut self, dir: impl Into<PathBuf>) -> Result<()> {
        self.dir = dir.into();
        self.table = self.load()?;
        info!(
            dir = %self.dir.display(),
            rows = self.table.num_rows(),
            "summary store rebound"
        );
        Ok(())
    }

    /// Append one experiment record and persist the table.
    ///
    /// Metric keys not yet present become new columns, backfilled with
    /// null for earlier rows. The full table is rewritten to disk (temp
    /// file + atomic rename) before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the rewritten file cannot be placed.
    pub fn add_experiment(&mut self, record: &ExperimentRecord) -> Result<()> {
        for column in record.column_order() {
            self.table.add_column(column);
        }
        self.table.push_row(&record.to_row())?;
        self.persist()?;
        debug!(
            title = record.title(),
            rows = self.table.num_rows(),
            columns = self.table.num_columns(),
            "experiment appended"
        );
        Ok(())
    }

    /// The current in-memory table.
    #[must_use]
    pub const fn data(&self) -> &SummaryTable {
        &self.table
    }

    /// The row at the given zero-based index as a column-name → value map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowOutOfRange`] if the index is past the last row.
    pub fn row_to_map(&self, index: usize) -> Result<IndexMap<String, Value>> {
        let row = self.table.row(index).ok_or(Error::RowOutOfRange {
            index,
            rows: self.table.num_rows(),
        })?;
        Ok(self
            .table
            .columns()
            .iter()
            .cloned()
            .zip(row.iter().cloned())
            .collect())
    }

    fn load(&self) -> Result<SummaryTable> {
        let path = self.file_path();
        if path.is_file() {
            let table = csv::read_table(&path)?;
            debug!(
                path = %path.display(),
                rows = table.num_rows(),
                "loaded existing summary"
            );
            Ok(table)
        } else {
            debug!(path = %path.display(), "no summary file, starting empty");
            Ok(SummaryTable::new())
        }
    }

    /// Full rewrite through a temp file; the rename is atomic on POSIX,
    /// so a crash mid-write leaves the previous snapshot intact.
    fn persist(&self) -> Result<()> {
        let path = self.file_path();
        let tmp = path.with_extension("csv.tmp");
        csv::write_table(&tmp, &self.table)?;
        fs::rename(&tmp, &path).map_err(|e| {
            Error::StorageError(format!("failed to replace {}: {e}", path.display()))
        })?;
        Ok(())
    }
}

/// Builder for [`SummaryStore`].
#[derive(Debug)]
pub struct SummaryStoreBuilder {
    model_name: String,
    dir: PathBuf,
    create_dir: bool,
}

impl SummaryStoreBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(model_name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            model_name: model_name.into(),
            dir: dir.into(),
            create_dir: true,
        }
    }

    /// Whether to create the storage directory when it is missing
    /// (default true). With `false`, opening against a missing directory
    /// fails instead.
    #[must_use]
    pub const fn create_dir(mut self, create: bool) -> Self {
        self.create_dir = create;
        self
    }

    /// Open the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing and cannot (or must
    /// not) be created, or an existing summary file cannot be parsed.
    pub fn open(self) -> Result<SummaryStore> {
        if self.create_dir {
            fs::create_dir_all(&self.dir)?;
        } else if !self.dir.is_dir() {
            return Err(Error::StorageError(format!(
                "storage directory {} does not exist",
                self.dir.display()
            )));
        }
        let mut store = SummaryStore {
            model_name: self.model_name,
            dir: self.dir,
            table: SummaryTable::new(),
        };
        store.table = store.load()?;
        info!(
            model = store.model_name(),
            path = %store.file_path().display(),
            rows = store.data().num_rows(),
            "summary store opened"
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_metrics(title: &str, metrics: &[(&str, Value)]) -> ExperimentRecord {
        let mut record = ExperimentRecord::new(title, "test run", "out");
        for (key, value) in metrics {
            record.add_metric(*key, value.clone()).unwrap();
        }
        record
    }

    #[test]
    fn test_open_fresh_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SummaryStore::open("churn", dir.path()).unwrap();
        assert!(store.data().is_empty());
        assert_eq!(
            store.file_path(),
            dir.path().join("churn_model_summary.csv")
        );
    }

    #[test]
    fn test_open_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("models").join("churn");
        let store = SummaryStore::open("churn", &nested).unwrap();
        assert!(nested.is_dir());
        assert!(store.data().is_empty());
    }

    #[test]
    fn test_builder_can_demand_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not_there");
        let result = SummaryStore::builder("churn", &missing)
            .create_dir(false)
            .open();
        assert!(result.is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn test_append_persists_synchronously() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SummaryStore::open("churn", dir.path()).unwrap();
        let record = record_with_metrics("baseline", &[("loss", Value::Number(0.25))]);
        store.add_experiment(&record).unwrap();

        assert!(store.file_path().is_file());
        assert!(!store.file_path().with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_rebind_reloads_from_new_location() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();

        // Seed dir_b with a one-row summary under the same model name
        let mut seeded = SummaryStore::open("churn", dir_b.path()).unwrap();
        seeded
            .add_experiment(&record_with_metrics("seeded", &[("loss", Value::Number(0.1))]))
            .unwrap();

        let mut store = SummaryStore::open("churn", dir_a.path()).unwrap();
        assert_eq!(store.data().num_rows(), 0);

        store.rebind(dir_b.path()).unwrap();
        assert_eq!(store.data().num_rows(), 1);
        assert_eq!(store.dir(), dir_b.path());
        assert_eq!(
            store.row_to_map(0).unwrap().get("title"),
            Some(&Value::Text("seeded".into()))
        );
    }

    #[test]
    fn test_row_to_map_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let store = SummaryStore::open("churn", dir.path()).unwrap();
        let result = store.row_to_map(0);
        assert!(matches!(
            result,
            Err(Error::RowOutOfRange { index: 0, rows: 0 })
        ));
    }

    #[test]
    fn test_malformed_file_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("churn_model_summary.csv");
        std::fs::write(&path, "title,loss\n\"torn,0.1\n").unwrap();

        let result = SummaryStore::open("churn", dir.path());
        assert!(matches!(result, Err(Error::MalformedFile { .. })));
    }
}
