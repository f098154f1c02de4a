//! Experiment Tracking
//!
//! This module provides the record-and-append core: a value object for one
//! training run and the durable store its rows land in.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentRecord ──> SummaryStore ──> {model_name}_model_summary.csv
//!      │                    │
//!      ├── features         ├── fixed columns (title .. hyperparameters)
//!      ├── hyperparameters  └── metric columns (first-appearance order)
//!      └── metrics
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use resumen_db::experiment::{ExperimentRecord, SummaryStore};
//!
//! let mut store = SummaryStore::open("churn", "training_output")?;
//!
//! let mut record = ExperimentRecord::new("baseline", "logreg baseline", "run_001");
//! record.set_model_type("logistic_regression");
//! record.add_feature("tenure_months");
//! record.add_hyperparameter("c", 1.0);
//! record.add_metric("auc", 0.81)?;
//!
//! store.add_experiment(&record)?;
//! # Ok::<(), resumen_db::Error>(())
//! ```

mod record;
mod store;

pub use record::{ExperimentRecord, ExperimentRecordBuilder, FIXED_COLUMNS};
pub use store::{SummaryStore, SummaryStoreBuilder};
