//! Side-by-side run viewer for a recorded model summary.
//!
//! Run with: resumen-view <MODEL_NAME> <MODEL_DIR> [--left N] [--right N]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use resumen_db::{viewer, SummaryStore};

#[derive(Parser)]
#[command(name = "resumen-view")]
#[command(about = "Browse recorded training runs side by side")]
#[command(version)]
struct Cli {
    /// Model name; selects {model_name}_model_summary.csv
    model_name: String,

    /// Directory holding the summary file and run output folders
    model_dir: PathBuf,

    /// Row to show in the left column
    #[arg(long, default_value_t = 0)]
    left: usize,

    /// Row to show in the right column
    #[arg(long, default_value_t = 0)]
    right: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = SummaryStore::builder(&cli.model_name, &cli.model_dir)
        .create_dir(false)
        .open()
        .with_context(|| format!("failed to open summary for {}", cli.model_name))?;

    println!("{}\n", cli.model_name);
    println!("Recorded runs:");
    print!("{}", viewer::render_overview(store.data()));
    println!();

    if store.data().num_rows() == 0 {
        println!("No experiments recorded yet.");
        return Ok(());
    }

    let left = viewer::render_row(&store.row_to_map(cli.left)?);
    let right = viewer::render_row(&store.row_to_map(cli.right)?);
    print!("{}", viewer::render_side_by_side(&left, &right));

    Ok(())
}
