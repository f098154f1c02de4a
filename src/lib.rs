//! # Resumen-DB: Experiment Summary Store
//!
//! Resumen-DB is a lightweight experiment-tracking utility for ML
//! workflows: it records metadata about individual training runs (title,
//! description, output path, feature list, model type, hyperparameters,
//! arbitrary metrics) into a CSV-backed tabular store, and ships a simple
//! viewer for browsing recorded runs side by side.
//!
//! ## Design
//!
//! - **Schema evolution**: each appended record may introduce new metric
//!   columns; earlier rows backfill with null, and the column set only
//!   ever grows
//! - **Snapshot durability**: the file is rewritten in full on every
//!   append, through a temp file and an atomic rename
//! - **Tagged cells**: metric and hyperparameter values are
//!   `{null, bool, number, text}` at the storage boundary; whether a text
//!   value names a chart image is the viewer's call
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use resumen_db::{ExperimentRecord, SummaryStore};
//!
//! let mut store = SummaryStore::open("churn", "training_output")?;
//!
//! let mut record = ExperimentRecord::new("baseline", "logreg baseline", "run_001");
//! record.set_model_type("logistic_regression");
//! record.add_hyperparameter("c", 1.0);
//! record.add_metric("auc", 0.81)?;
//! record.add_metric("roc_curve", "roc.png")?;
//!
//! store.add_experiment(&record)?;
//! # Ok::<(), resumen_db::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod experiment;
pub mod storage;
pub mod value;
pub mod viewer;

pub use error::{Error, Result};
pub use experiment::{ExperimentRecord, SummaryStore};
pub use storage::SummaryTable;
pub use value::Value;
