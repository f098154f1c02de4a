//! CSV codec for summary tables
//!
//! The persisted layout is one flat CSV per store: a header row, the fixed
//! record columns first, then metric columns. Arrow's CSV writer handles
//! quoting for embedded delimiters; reads go through Arrow schema inference
//! with the fixed columns pinned to Utf8 (so timestamps and JSON cell text
//! come back verbatim).
//!
//! Cell typing is per-column, as in any CSV: a column whose non-null cells
//! are all numbers round-trips as `Value::Number`, all booleans as
//! `Value::Bool`, anything else as `Value::Text`. Empty cells are null -
//! CSV cannot distinguish empty text from absent.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::experiment::FIXED_COLUMNS;
use crate::storage::SummaryTable;
use crate::value::Value;

/// Write a table to `path` as CSV with a header row.
///
/// # Errors
///
/// Returns an error if the file cannot be created or the table cannot be
/// encoded.
pub fn write_table(path: &Path, table: &SummaryTable) -> Result<()> {
    let file = File::create(path)?;
    if table.num_columns() == 0 {
        return Ok(());
    }

    let schema = Arc::new(build_schema(table));
    let batch = build_batch(&schema, table)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(&batch)?;
    Ok(())
}

/// Read a table from a CSV file previously produced by [`write_table`].
///
/// # Errors
///
/// Returns [`Error::MalformedFile`] if the file exists but cannot be parsed
/// as tabular data.
pub fn read_table(path: &Path) -> Result<SummaryTable> {
    let mut file = File::open(path)?;
    let format = Format::default().with_header(true);
    let (inferred, _) = format
        .infer_schema(&mut file, None)
        .map_err(|e| malformed(path, &e))?;
    file.rewind()?;

    let schema = Arc::new(pin_fixed_columns(&inferred));
    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_format(format)
        .build(file)
        .map_err(|e| malformed(path, &e))?;

    let mut table = SummaryTable::new();
    for field in schema.fields() {
        table.add_column(field.name().clone());
    }
    let columns: Vec<String> = table.columns().to_vec();

    for batch in reader {
        let batch = batch.map_err(|e| malformed(path, &e))?;
        append_batch(&mut table, &columns, &batch).map_err(|e| malformed(path, &e))?;
    }
    Ok(table)
}

fn malformed(path: &Path, reason: &ArrowError) -> Error {
    Error::MalformedFile {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Inference decides metric column types; the fixed columns are always
/// text so timestamps and JSON cells never get reinterpreted.
fn pin_fixed_columns(inferred: &Schema) -> Schema {
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| {
            if FIXED_COLUMNS.contains(&f.name().as_str()) {
                Field::new(f.name(), DataType::Utf8, true)
            } else {
                f.as_ref().clone().with_nullable(true)
            }
        })
        .collect();
    Schema::new(fields)
}

/// Narrowest Arrow type covering every non-null cell of the column;
/// mixed columns fall back to Utf8.
fn column_type(table: &SummaryTable, idx: usize) -> DataType {
    let mut ty: Option<DataType> = None;
    for row in table.rows() {
        let cell_ty = match &row[idx] {
            Value::Null => continue,
            Value::Bool(_) => DataType::Boolean,
            Value::Number(_) => DataType::Float64,
            Value::Text(_) => DataType::Utf8,
        };
        match &ty {
            None => ty = Some(cell_ty),
            Some(t) if *t == cell_ty => {}
            Some(_) => return DataType::Utf8,
        }
    }
    ty.unwrap_or(DataType::Utf8)
}

fn build_schema(table: &SummaryTable) -> Schema {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| Field::new(name, column_type(table, idx), true))
        .collect();
    Schema::new(fields)
}

fn build_batch(schema: &Arc<Schema>, table: &SummaryTable) -> Result<RecordBatch> {
    let arrays: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| match field.data_type() {
            DataType::Float64 => {
                let cells: Vec<Option<f64>> =
                    table.rows().map(|row| row[idx].as_f64()).collect();
                Arc::new(Float64Array::from(cells)) as ArrayRef
            }
            DataType::Boolean => {
                let cells: Vec<Option<bool>> =
                    table.rows().map(|row| row[idx].as_bool()).collect();
                Arc::new(BooleanArray::from(cells)) as ArrayRef
            }
            _ => {
                let cells: Vec<Option<String>> =
                    table.rows().map(|row| cell_text(&row[idx])).collect();
                Arc::new(StringArray::from(cells)) as ArrayRef
            }
        })
        .collect();
    Ok(RecordBatch::try_new(Arc::clone(schema), arrays)?)
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn append_batch(
    table: &mut SummaryTable,
    columns: &[String],
    batch: &RecordBatch,
) -> std::result::Result<(), ArrowError> {
    for row_idx in 0..batch.num_rows() {
        let mut row = IndexMap::with_capacity(columns.len());
        for (col_idx, name) in columns.iter().enumerate() {
            let value = cell_value(batch.column(col_idx), row_idx)?;
            row.insert(name.clone(), value);
        }
        table
            .push_row(&row)
            .map_err(|e| ArrowError::ExternalError(Box::new(e)))?;
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn cell_value(column: &ArrayRef, row: usize) -> std::result::Result<Value, ArrowError> {
    if column.is_null(row) {
        return Ok(Value::Null);
    }
    let known = match column.data_type() {
        DataType::Boolean => column
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| Value::Bool(a.value(row))),
        DataType::Int64 => column
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| Value::Number(a.value(row) as f64)),
        DataType::Float64 => column
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| Value::Number(a.value(row))),
        DataType::Utf8 => column.as_any().downcast_ref::<StringArray>().map(|a| {
            let s = a.value(row);
            if s.is_empty() {
                Value::Null
            } else {
                Value::Text(s.to_string())
            }
        }),
        _ => None,
    };
    match known {
        Some(value) => Ok(value),
        // Inference can produce date/timestamp columns for datetime-like
        // metric text; carry those through as display text.
        None => array_value_to_string(column, row).map(Value::Text),
    }
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

    fn sample_table() -> SummaryTable {
        let mut table = SummaryTable::new();
        for name in FIXED_COLUMNS {
            table.add_column(name);
        }
        table.add_column("loss");
        table
            .push_row(&row(&[
                ("title", Value::Text("baseline".into())),
                ("description", Value::Text("first, with a comma".into())),
                ("output_path", Value::Text("runs/baseline".into())),
                ("created_at", Value::Text("2025-03-01T09:30:00+00:00".into())),
                ("model_type", Value::Text("xgboost".into())),
                ("features", Value::Text("[\"age\",\"income\"]".into())),
                ("hyperparameters", Value::Text("{\"lr\":0.01}".into())),
                ("loss", Value::Number(0.25)),
            ]))
            .unwrap();
        table
    }

    #[test]
    fn test_write_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let table = sample_table();
        write_table(&path, &table).unwrap();
        let loaded = read_table(&path).unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn test_header_and_quoting_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        write_table(&path, &sample_table()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let header = raw.lines().next().unwrap();

        assert!(header.starts_with("title,description,output_path,created_at"));
        // Embedded commas stay inside one quoted cell
        assert!(raw.contains("\"first, with a comma\""));
        assert!(raw.contains("\"[\"\"age\"\",\"\"income\"\"]\""));
    }

    #[test]
    fn test_null_cells_round_trip_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let mut table = sample_table();
        table.add_column("acc");
        table
            .push_row(&row(&[
                ("title", Value::Text("second".into())),
                ("description", Value::Text("d".into())),
                ("output_path", Value::Text("runs/second".into())),
                ("created_at", Value::Text("2025-03-02T09:30:00+00:00".into())),
                ("model_type", Value::Text("xgboost".into())),
                ("features", Value::Text("[]".into())),
                ("hyperparameters", Value::Text("{}".into())),
                ("loss", Value::Number(0.2)),
                ("acc", Value::Number(0.8)),
            ]))
            .unwrap();

        write_table(&path, &table).unwrap();
        let loaded = read_table(&path).unwrap();

        // Row 0 predates the acc column
        assert_eq!(loaded.cell(0, "acc"), Some(&Value::Null));
        assert_eq!(loaded.cell(1, "acc"), Some(&Value::Number(0.8)));
    }

    #[test]
    fn test_boolean_column_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let mut table = SummaryTable::new();
        table.add_column("title");
        table.add_column("early_stopped");
        table
            .push_row(&row(&[
                ("title", Value::Text("t".into())),
                ("early_stopped", Value::Bool(true)),
            ]))
            .unwrap();

        write_table(&path, &table).unwrap();
        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded.cell(0, "early_stopped"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_mixed_column_falls_back_to_text() {
        let mut table = SummaryTable::new();
        table.add_column("m");
        table.push_row(&row(&[("m", Value::Number(1.5))])).unwrap();
        table
            .push_row(&row(&[("m", Value::Text("roc.png".into()))]))
            .unwrap();
        assert_eq!(column_type(&table, 0), DataType::Utf8);
    }

    #[test]
    fn test_read_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        std::fs::write(&path, "title,loss\n\"unterminated,0.1\n").unwrap();

        let result = read_table(&path);
        assert!(matches!(result, Err(Error::MalformedFile { .. })));
    }
}
