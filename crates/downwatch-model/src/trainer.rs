//! The training pipeline: load, split, fit, evaluate.
//!
//! Fitting is delegated to `linfa-logistic` (binary logistic regression,
//! default regularization, intercept on). The fitted coefficients are
//! extracted into the serializable [`LogisticModel`] immediately, and the
//! held-out evaluation runs through that extracted model — the exact same
//! scoring path the prediction endpoint uses, so a persisted artifact
//! reproduces its own evaluation numbers.

use downwatch_core::{
    DownwatchError, LogisticModel, ModelArtifact, Result, TrainingConfig, FEATURE_COLUMNS,
};
use linfa::prelude::*;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Axis};
use std::path::Path;
use tracing::info;

use crate::dataset::DowntimeDataset;
use crate::metrics::{evaluate, EvaluationMetrics};
use crate::split::shuffle_split;

/// A completed training run: the artifact to store plus its evaluation.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub artifact: ModelArtifact,
    pub metrics: EvaluationMetrics,
}

/// Train against the CSV at `path` (the fixed upload location).
pub fn train_from_csv(path: &Path, config: &TrainingConfig) -> Result<TrainOutcome> {
    let dataset = DowntimeDataset::from_csv_path(path)?;
    train(&dataset, config)
}

/// Train on an already-parsed dataset.
pub fn train(dataset: &DowntimeDataset, config: &TrainingConfig) -> Result<TrainOutcome> {
    let split = shuffle_split(dataset.len(), config.test_ratio, config.seed)?;

    let train_features = dataset.features.select(Axis(0), &split.train);
    let train_labels: Array1<i32> = split.train.iter().map(|&i| dataset.labels[i]).collect();

    let fitted = LogisticRegression::default()
        .max_iterations(config.max_iterations)
        .fit(&Dataset::new(train_features, train_labels))
        .map_err(|e| DownwatchError::Training(format!("Logistic regression fit failed: {}", e)))?;

    let model = LogisticModel {
        weights: fitted.params().to_vec(),
        intercept: fitted.intercept(),
    };

    let predictions: Vec<i32> = split
        .test
        .iter()
        .map(|&i| {
            let row = dataset.features.row(i).to_vec();
            if model.probability(&row) >= 0.5 {
                1
            } else {
                0
            }
        })
        .collect();
    let test_labels: Vec<i32> = split.test.iter().map(|&i| dataset.labels[i]).collect();
    let metrics = evaluate(&predictions, &test_labels);

    info!(
        train_rows = split.train.len(),
        test_rows = split.test.len(),
        accuracy = metrics.accuracy,
        f1 = metrics.f1,
        "Training run complete"
    );

    let artifact = ModelArtifact::new(
        model,
        FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
    );
    Ok(TrainOutcome { artifact, metrics })
}
