//! Berry Alert Pipeline - Training Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use forest_classifier::Hyperparameters;
use std::fs;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use alert_taxonomy::AlertId;
use trainer::{pipeline, Dataset};

/// Train the berry crop alert classifier and write a model artifact
#[derive(Parser)]
#[command(name = "berry-train", version, about)]
struct Args {
    /// Semicolon-separated training dataset
    #[arg(long, env = "BERRY_DATASET")]
    dataset: PathBuf,

    /// Output path for the model artifact
    #[arg(long, default_value = "models/berry_forest.json")]
    output: PathBuf,

    /// Trees per label forest
    #[arg(long, default_value_t = 100)]
    trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value_t = 15)]
    max_depth: usize,

    /// Minimum samples required to attempt a split
    #[arg(long, default_value_t = 10)]
    min_samples_split: usize,

    /// Minimum samples in each child of a split
    #[arg(long, default_value_t = 5)]
    min_samples_leaf: usize,

    /// Random features considered per split
    #[arg(long, default_value_t = 2)]
    features_per_split: usize,

    /// RNG seed for the split and the forests
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,
}

fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    info!("=== Berry Alert Trainer v{} ===", env!("CARGO_PKG_VERSION"));

    let dataset = Dataset::load(&args.dataset)
        .with_context(|| format!("loading dataset {}", args.dataset.display()))?;

    let hp = Hyperparameters {
        n_trees: args.trees,
        max_depth: args.max_depth,
        min_samples_split: args.min_samples_split,
        min_samples_leaf: args.min_samples_leaf,
        features_per_split: args.features_per_split,
        seed: args.seed,
    };

    let artifact = pipeline::train(&dataset, &hp, args.test_fraction)?;

    info!(
        "{:<18} {:>9} {:>9} {:>9}",
        "alert", "precision", "recall", "f1"
    );
    for alert in AlertId::ALL {
        if let Some(m) = artifact.metadata.per_label_metrics.get(alert.as_str()) {
            info!(
                "{:<18} {:>9.3} {:>9.3} {:>9.3}",
                alert.as_str(),
                m.precision,
                m.recall,
                m.f1
            );
        }
    }
    info!("macro F1: {:.3}", artifact.metadata.macro_f1);

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    artifact.save(&args.output)?;

    info!("training completed");
    Ok(())
}
