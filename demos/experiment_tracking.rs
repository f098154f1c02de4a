//! Experiment Tracking Example
//!
//! Records two training runs into a summary store, then renders the
//! stored rows the way the viewer does.
//!
//! Run with: cargo run --example experiment_tracking

use resumen_db::{viewer, ExperimentRecord, SummaryStore};

fn main() -> anyhow::Result<()> {
    println!("=== Resumen-DB Experiment Tracking ===\n");

    let dir = std::env::temp_dir().join("resumen_demo");
    // Fresh summary each run
    let _ = std::fs::remove_file(dir.join("churn_model_summary.csv"));
    let mut store = SummaryStore::open("churn", &dir)?;

    // -------------------------------------------------------------------------
    // 1. Record a baseline run
    // -------------------------------------------------------------------------
    println!("1. Recording baseline run...");

    let mut baseline = ExperimentRecord::new(
        "baseline",
        "Logistic regression baseline on raw features",
        dir.join("run_001"),
    );
    baseline.set_model_type("logistic_regression");
    baseline.set_features(vec!["tenure_months".into(), "monthly_charges".into()]);
    baseline.add_hyperparameter("c", 1.0);
    baseline.add_metric("auc", 0.81)?;
    baseline.add_metric("log_loss", 0.47)?;

    store.add_experiment(&baseline)?;
    println!("   Rows: {}", store.data().num_rows());

    // -------------------------------------------------------------------------
    // 2. Record a tuned run with an extra metric
    // -------------------------------------------------------------------------
    println!("\n2. Recording tuned run...");

    let mut tuned = ExperimentRecord::new(
        "tuned",
        "Gradient boosting after a small grid search",
        dir.join("run_002"),
    );
    tuned.set_model_type("xgboost");
    tuned.set_features(vec![
        "tenure_months".into(),
        "monthly_charges".into(),
        "contract_type".into(),
    ]);
    tuned.add_hyperparameter("max_depth", 4);
    tuned.add_hyperparameter("eta", 0.1);
    tuned.add_metric("auc", 0.87)?;
    tuned.add_metric("log_loss", 0.39)?;
    tuned.add_metric("f1", 0.74)?; // new column, baseline row backfills null

    store.add_experiment(&tuned)?;
    println!("   Rows: {}", store.data().num_rows());
    println!("   Columns: {:?}", store.data().columns());

    // -------------------------------------------------------------------------
    // 3. Reload from disk and browse
    // -------------------------------------------------------------------------
    println!("\n3. Reloading and rendering...\n");

    let reloaded = SummaryStore::open("churn", &dir)?;
    print!("{}", viewer::render_overview(reloaded.data()));
    println!();

    let left = viewer::render_row(&reloaded.row_to_map(0)?);
    let right = viewer::render_row(&reloaded.row_to_map(1)?);
    print!("{}", viewer::render_side_by_side(&left, &right));

    println!("\n=== Experiment Tracking Complete ===");
    Ok(())
}
