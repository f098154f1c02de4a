//! Run viewer (display glue over the store)
//!
//! Everything here is surrounding functionality: it consumes
//! [`SummaryStore::data`](crate::SummaryStore::data) and
//! [`SummaryStore::row_to_map`](crate::SummaryStore::row_to_map) and turns
//! rows into text reports. Deciding whether a metric value is an image
//! reference happens here, never in the store: a metric is a chart when it
//! is text naming an existing image file under the row's output path.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::storage::SummaryTable;
use crate::value::Value;

/// Row keys that are rendered in the report header rather than classified
/// as metrics. `model_type` is deliberately absent: it shows up among the
/// scalar metrics as well as in the header, as the original app displayed
/// it.
pub const RESERVED_KEYS: [&str; 6] = [
    "title",
    "description",
    "created_at",
    "output_path",
    "features",
    "hyperparameters",
];

/// Recognized chart file extensions (matched case-insensitively).
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpeg", "jpg"];

/// How a non-reserved row field should be displayed.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricDisplay {
    /// Plain value for the metric table
    Scalar(Value),
    /// Image reference resolved under the run's output path
    Chart(PathBuf),
}

/// Classify one metric value against the run's output directory.
#[must_use]
pub fn classify(output_dir: &Path, value: &Value) -> MetricDisplay {
    if let Value::Text(name) = value {
        if is_image_name(name) && output_dir.join(name).is_file() {
            return MetricDisplay::Chart(output_dir.join(name));
        }
    }
    MetricDisplay::Scalar(value.clone())
}

fn is_image_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

/// Render one summary row as a text report: header block, feature list,
/// hyperparameter table, scalar metrics, then charts.
///
/// A chart file that cannot be read is reported inline among the metrics
/// instead of aborting the report.
#[must_use]
pub fn render_row(row: &IndexMap<String, Value>) -> String {
    let text = |key: &str| row.get(key).map(Value::to_string).unwrap_or_default();
    let output_dir = PathBuf::from(text("output_path"));

    let mut out = String::new();
    out.push_str(&format!("### {}\n", text("title")));
    out.push_str(&format!("Description: {}\n", text("description")));
    out.push_str(&format!("Run time: {}\n", text("created_at")));
    out.push_str(&format!("Output folder: {}\n", text("output_path")));
    out.push_str(&format!("Model type: {}\n", text("model_type")));
    out.push_str(&format!("Features: {}\n", text("features")));

    out.push_str("\nHyperparameters:\n");
    out.push_str(&render_pairs(&hyperparameter_pairs(&text("hyperparameters"))));

    let mut scalars: Vec<(String, String)> = Vec::new();
    let mut charts: Vec<(String, PathBuf)> = Vec::new();
    for (key, value) in row {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        match classify(&output_dir, value) {
            MetricDisplay::Scalar(v) => scalars.push((key.clone(), v.to_string())),
            MetricDisplay::Chart(path) => match fs::read(&path) {
                Ok(_) => charts.push((key.clone(), path)),
                Err(_) => scalars.push((
                    key.clone(),
                    format!(
                        "Unable to read file: {value} in directory {}",
                        output_dir.display()
                    ),
                )),
            },
        }
    }

    out.push_str("\nModel metrics:\n");
    out.push_str(&render_pairs(&scalars));

    out.push_str("\nModel images/charts:\n");
    for (key, path) in charts {
        out.push_str(&format!("  {key}: {}\n", path.display()));
    }
    out
}

/// Render the whole table as a one-line-per-run overview.
#[must_use]
pub fn render_overview(table: &SummaryTable) -> String {
    let mut out = String::new();
    for index in 0..table.num_rows() {
        let title = table
            .cell(index, "title")
            .map(Value::to_string)
            .unwrap_or_default();
        let created = table
            .cell(index, "created_at")
            .map(Value::to_string)
            .unwrap_or_default();
        out.push_str(&format!("  [{index}] {title}  ({created})\n"));
    }
    out
}

/// Lay two rendered reports out side by side, one gutter apart.
#[must_use]
pub fn render_side_by_side(left: &str, right: &str) -> String {
    let left_lines: Vec<&str> = left.lines().collect();
    let right_lines: Vec<&str> = right.lines().collect();
    let width = left_lines.iter().map(|l| l.len()).max().unwrap_or(0);

    let mut out = String::new();
    for i in 0..left_lines.len().max(right_lines.len()) {
        let l = left_lines.get(i).copied().unwrap_or("");
        let r = right_lines.get(i).copied().unwrap_or("");
        out.push_str(&format!("{l:<width$}    | {r}\n"));
    }
    out
}

/// The hyperparameters cell holds JSON text of the map; parse it back into
/// display rows, falling back to the raw text when it does not parse.
fn hyperparameter_pairs(cell: &str) -> Vec<(String, String)> {
    match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(cell) {
        Ok(map) => map
            .into_iter()
            .map(|(k, v)| {
                let rendered = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, rendered)
            })
            .collect(),
        Err(_) if cell.is_empty() => Vec::new(),
        Err(_) => vec![("hyperparameters".to_string(), cell.to_string())],
    }
}

fn render_pairs(pairs: &[(String, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in pairs {
        out.push_str(&format!("  {key:<width$}  {value}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_classify_existing_image_is_chart() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("roc.png"), b"not really a png").unwrap();

        let display = classify(dir.path(), &Value::Text("roc.png".into()));
        assert_eq!(display, MetricDisplay::Chart(dir.path().join("roc.png")));
    }

    #[test]
    fn test_classify_missing_image_is_scalar() {
        let dir = tempfile::tempdir().unwrap();
        let value = Value::Text("roc.png".into());
        assert_eq!(classify(dir.path(), &value), MetricDisplay::Scalar(value.clone()));
    }

    #[test]
    fn test_classify_non_text_is_scalar() {
        let dir = tempfile::tempdir().unwrap();
        let value = Value::Number(0.9);
        assert_eq!(classify(dir.path(), &value), MetricDisplay::Scalar(value.clone()));
    }

    #[test]
    fn test_classify_extension_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ROC.PNG"), b"x").unwrap();

        let display = classify(dir.path(), &Value::Text("ROC.PNG".into()));
        assert!(matches!(display, MetricDisplay::Chart(_)));
    }

    #[test]
    fn test_render_row_sections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("loss.png"), b"x").unwrap();

        let report = render_row(&row(&[
            ("title", Value::Text("baseline".into())),
            ("description", Value::Text("first attempt".into())),
            ("output_path", Value::Text(dir.path().display().to_string())),
            ("created_at", Value::Text("2025-03-01T09:30:00+00:00".into())),
            ("model_type", Value::Text("xgboost".into())),
            ("features", Value::Text("[\"age\"]".into())),
            ("hyperparameters", Value::Text("{\"lr\":0.01}".into())),
            ("loss", Value::Number(0.25)),
            ("loss_curve", Value::Text("loss.png".into())),
        ]));

        assert!(report.contains("### baseline"));
        assert!(report.contains("lr"));
        assert!(report.contains("0.25"));
        // model_type is not reserved, so it also shows among the metrics
        assert!(report.contains("model_type"));
        assert!(report.contains("loss_curve"));
        assert!(report.contains("loss.png"));
    }

    #[test]
    fn test_hyperparameter_pairs_fallback() {
        assert_eq!(
            hyperparameter_pairs("{\"lr\":0.01}"),
            vec![("lr".to_string(), "0.01".to_string())]
        );
        assert!(hyperparameter_pairs("").is_empty());
        let fallback = hyperparameter_pairs("not json");
        assert_eq!(fallback[0].1, "not json");
    }

    #[test]
    fn test_side_by_side_pads_left_column() {
        let out = render_side_by_side("a\nlonger line", "b");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("| b"));
        assert!(lines[1].starts_with("longer line"));
    }
}
