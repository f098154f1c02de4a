//! Experiment Record - one training run's metadata, pre-persistence

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

/// Fixed columns of every summary row, in canonical order.
///
/// Metric columns follow these; `features` and `hyperparameters` serialize
/// as JSON text of their structure, `created_at` as RFC 3339 text.
pub const FIXED_COLUMNS: [&str; 7] = [
    "title",
    "description",
    "output_path",
    "created_at",
    "model_type",
    "features",
    "hyperparameters",
];

/// Experiment Record represents one tracked training run.
///
/// The record is a transient value object: built by the caller, filled in
/// through its setters during training, handed to
/// [`SummaryStore::add_experiment`](crate::experiment::SummaryStore::add_experiment),
/// and then typically discarded.
///
/// The record owns all of its collections. Inputs are taken by value, so
/// no later caller-side mutation can alias into the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentRecord {
    title: String,
    description: String,
    output_path: PathBuf,
    created_at: DateTime<Utc>,
    model_type: String,
    features: Vec<String>,
    hyperparameters: IndexMap<String, Value>,
    metrics: IndexMap<String, Value>,
}

impl ExperimentRecord {
    /// Create a new record with the given title, description, and output
    /// directory; everything else defaults to empty.
    ///
    /// # Arguments
    ///
    /// * `title` - Title of the run
    /// * `description` - Run details
    /// * `output_path` - Directory holding the run's artifacts; the viewer
    ///   resolves relative image references against it
    ///
    /// # Returns
    ///
    /// A new `ExperimentRecord` with the current timestamp.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            output_path: output_path.into(),
            created_at: Utc::now(),
            model_type: String::new(),
            features: Vec::new(),
            hyperparameters: IndexMap::new(),
            metrics: IndexMap::new(),
        }
    }

    /// Create a builder for constructing a record with optional fields.
    #[must_use]
    pub fn builder(
        title: impl Into<String>,
        description: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> ExperimentRecordBuilder {
        ExperimentRecordBuilder::new(title, description, output_path)
    }

    /// Get the run title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the run description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the output directory.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the model type.
    #[must_use]
    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    /// Get the feature list.
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Get the hyperparameter map.
    #[must_use]
    pub const fn hyperparameters(&self) -> &IndexMap<String, Value> {
        &self.hyperparameters
    }

    /// Get the metric map.
    #[must_use]
    pub const fn metrics(&self) -> &IndexMap<String, Value> {
        &self.metrics
    }

    /// Replace all features with the provided list.
    pub fn set_features(&mut self, features: Vec<String>) {
        self.features = features;
    }

    /// Add a feature to the run.
    pub fn add_feature(&mut self, feature: impl Into<String>) {
        self.features.push(feature.into());
    }

    /// Set/replace the model type.
    pub fn set_model_type(&mut self, model_type: impl Into<String>) {
        self.model_type = model_type.into();
    }

    /// Set/replace the hyperparameter map.
    pub fn set_hyperparameters(&mut self, hyperparameters: IndexMap<String, Value>) {
        self.hyperparameters = hyperparameters;
    }

    /// Add a hyperparameter, overwriting any previous value for the key.
    pub fn add_hyperparameter(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.hyperparameters.insert(key.into(), value.into());
    }

    /// Replace the metric map wholesale.
    ///
    /// Bypasses the duplicate-metric guard; the escape hatch for callers
    /// that manage their own metric map.
    pub fn set_metrics(&mut self, metrics: IndexMap<String, Value>) {
        self.metrics = metrics;
    }

    /// Add a metric to the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateMetric`] if the key was already recorded;
    /// use [`overwrite_metric`](Self::overwrite_metric) to replace a value
    /// deliberately.
    pub fn add_metric(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        if self.metrics.contains_key(&key) {
            return Err(Error::DuplicateMetric(key));
        }
        self.metrics.insert(key, value.into());
        Ok(())
    }

    /// Set a metric, replacing any previously recorded value for the key.
    pub fn overwrite_metric(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metrics.insert(key.into(), value.into());
    }

    /// Flatten the record into one summary row.
    ///
    /// The seven [`FIXED_COLUMNS`] come first; metric keys merge in at the
    /// same level. A metric key that collides with a fixed column name
    /// overwrites it - callers must avoid overlapping names.
    #[must_use]
    pub fn to_row(&self) -> IndexMap<String, Value> {
        let mut row = IndexMap::with_capacity(FIXED_COLUMNS.len() + self.metrics.len());
        row.insert("title".to_string(), Value::Text(self.title.clone()));
        row.insert(
            "description".to_string(),
            Value::Text(self.description.clone()),
        );
        row.insert(
            "output_path".to_string(),
            Value::Text(self.output_path.display().to_string()),
        );
        row.insert(
            "created_at".to_string(),
            Value::Text(self.created_at.to_rfc3339()),
        );
        row.insert(
            "model_type".to_string(),
            Value::Text(self.model_type.clone()),
        );
        row.insert("features".to_string(), Value::Text(self.features_json()));
        row.insert(
            "hyperparameters".to_string(),
            Value::Text(self.hyperparameters_json()),
        );
        for (key, value) in &self.metrics {
            row.insert(key.clone(), value.clone());
        }
        row
    }

    /// Canonical column order for this record: the fixed columns, then
    /// metric keys in first-insertion order.
    #[must_use]
    pub fn column_order(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(ToString::to_string)
            .chain(self.metrics.keys().cloned())
            .collect()
    }

    fn features_json(&self) -> String {
        serde_json::Value::from(self.features.clone()).to_string()
    }

    fn hyperparameters_json(&self) -> String {
        let map: serde_json::Map<String, serde_json::Value> = self
            .hyperparameters
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
            .collect();
        serde_json::Value::Object(map).to_string()
    }
}

/// Builder for `ExperimentRecord`.
#[derive(Debug)]
pub struct ExperimentRecordBuilder {
    title: String,
    description: String,
    output_path: PathBuf,
    created_at: DateTime<Utc>,
    model_type: String,
    features: Vec<String>,
    hyperparameters: IndexMap<String, Value>,
    metrics: IndexMap<String, Value>,
}

impl ExperimentRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            output_path: output_path.into(),
            created_at: Utc::now(),
            model_type: String::new(),
            features: Vec::new(),
            hyperparameters: IndexMap::new(),
            metrics: IndexMap::new(),
        }
    }

    /// Set the model type.
    #[must_use]
    pub fn model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = model_type.into();
        self
    }

    /// Set the feature list.
    #[must_use]
    pub fn features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    /// Set the hyperparameter map.
    #[must_use]
    pub fn hyperparameters(mut self, hyperparameters: IndexMap<String, Value>) -> Self {
        self.hyperparameters = hyperparameters;
        self
    }

    /// Set the metric map.
    #[must_use]
    pub fn metrics(mut self, metrics: IndexMap<String, Value>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Build the `ExperimentRecord`.
    #[must_use]
    pub fn build(self) -> ExperimentRecord {
        ExperimentRecord {
            title: self.title,
            description: self.description,
            output_path: self.output_path,
            created_at: self.created_at,
            model_type: self.model_type,
            features: self.features,
            hyperparameters: self.hyperparameters,
            metrics: self.metrics,
        }
    }
}
