//! Berry Alert Pipeline - Evaluation Entry Point

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use alert_taxonomy::RecommendationTable;
use evaluation::{builtin_cases, check_metadata_drift, run_cases};
use inference_service::InferenceService;
use model_artifact::ModelArtifact;
use trainer::Dataset;

/// Evaluate a trained artifact against the acceptance cases
#[derive(Parser)]
#[command(name = "berry-eval", version, about)]
struct Args {
    /// Model artifact to evaluate
    #[arg(long, env = "BERRY_ARTIFACT", default_value = "models/berry_forest.json")]
    artifact: PathBuf,

    /// Training dataset; enables the metadata drift check when given
    #[arg(long, env = "BERRY_DATASET")]
    dataset: Option<PathBuf>,

    /// Optional recommendation override table
    #[arg(long)]
    recommendations: Option<PathBuf>,

    /// Allowed drift between recorded and recomputed metrics
    #[arg(long, default_value_t = 0.01)]
    tolerance: f64,
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

    info!("=== Berry Alert Evaluator v{} ===", env!("CARGO_PKG_VERSION"));

    let artifact = ModelArtifact::load(&args.artifact)
        .with_context(|| format!("loading artifact {}", args.artifact.display()))?;

    let recommendations = match &args.recommendations {
        Some(path) => RecommendationTable::from_json_file(path)
            .with_context(|| format!("loading recommendations {}", path.display()))?,
        None => RecommendationTable::builtin(),
    };

    let mut failed = false;

    if let Some(dataset_path) = &args.dataset {
        let dataset = Dataset::load(dataset_path)
            .with_context(|| format!("loading dataset {}", dataset_path.display()))?;
        let drift = check_metadata_drift(&artifact, &dataset, args.tolerance)?;
        for entry in &drift.entries {
            if entry.within_tolerance {
                info!(
                    "{:<18} recorded f1 {:.3}, recomputed {:.3}",
                    entry.alert.as_str(),
                    entry.recorded_f1,
                    entry.recomputed_f1
                );
            } else {
                warn!(
                    "{:<18} drifted: recorded f1 {:.3}, recomputed {:.3}",
                    entry.alert.as_str(),
                    entry.recorded_f1,
                    entry.recomputed_f1
                );
            }
        }
        if !drift.passed() {
            failed = true;
        }
    }

    let service = InferenceService::new(artifact, recommendations)?;
    let report = run_cases(&service, &builtin_cases());
    if !report.passed() {
        failed = true;
    }

    if failed {
        bail!("evaluation failed");
    }
    info!("evaluation passed");
    Ok(())
}
