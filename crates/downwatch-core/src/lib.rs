//! Core types for the downwatch machine-downtime prediction service.
//!
//! This crate defines everything the other crates share: the service
//! configuration, the error taxonomy, the serializable model artifact, the
//! prediction types returned to API clients, and the [`ModelStore`] trait
//! that storage backends implement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Dataset schema constants
// ---------------------------------------------------------------------------

/// Feature columns, in the order the model consumes them.
pub const FEATURE_COLUMNS: [&str; 2] = ["Temperature", "Run_Time"];

/// Binary label column (0 = machine stayed up, 1 = downtime occurred).
pub const LABEL_COLUMN: &str = "Downtime_Flag";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Top-level service configuration.
///
/// All fields have defaults matching the single-tenant demo deployment:
/// fixed file names in the working directory, one model slot, seed 42.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// Path the uploaded CSV is persisted to (overwritten on every upload).
    pub dataset_path: PathBuf,
    /// Path the serialized model artifact is persisted to.
    pub model_path: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
    /// Training parameters.
    pub training: TrainingConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            dataset_path: PathBuf::from("uploaded_data.csv"),
            model_path: PathBuf::from("model.json"),
            max_upload_bytes: 50 * 1024 * 1024,
            training: TrainingConfig::default(),
        }
    }
}

/// Parameters for a single training run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation.
    pub test_ratio: f64,
    /// Seed for the train/test shuffle. Identical input and seed always
    /// produce the identical partition.
    pub seed: u64,
    /// Iteration cap for the logistic regression solver.
    pub max_iterations: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
            max_iterations: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Model artifact
// ---------------------------------------------------------------------------

/// Fitted binary logistic regression coefficients.
///
/// `probability` scores the positive class (`Downtime_Flag = 1`); the
/// solver assigns the positive orientation to the larger of the two class
/// labels, so the stored weights can be applied directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One weight per feature column, in [`FEATURE_COLUMNS`] order.
    pub weights: Vec<f64>,
    /// Intercept term.
    pub intercept: f64,
}

impl LogisticModel {
    /// Probability that a feature row belongs to the positive class.
    pub fn probability(&self, features: &[f64]) -> f64 {
        debug_assert_eq!(features.len(), self.weights.len());
        let score: f64 = self.intercept
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        sigmoid(score)
    }
}

/// Standard logistic function.
fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// The unit of persistence: one trained model plus its provenance.
///
/// Exactly one artifact is current at any time; every retrain replaces it
/// wholesale. The version id only distinguishes artifacts in logs and
/// health output, it is not a retention mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Random id assigned at training time.
    pub version: Uuid,
    /// When training completed.
    pub trained_at: DateTime<Utc>,
    /// Feature column names the model was fitted on, in consumption order.
    pub feature_names: Vec<String>,
    /// The fitted coefficients.
    pub model: LogisticModel,
}

impl ModelArtifact {
    /// Wrap freshly fitted coefficients in a new artifact.
    pub fn new(model: LogisticModel, feature_names: Vec<String>) -> Self {
        Self {
            version: Uuid::new_v4(),
            trained_at: Utc::now(),
            feature_names,
            model,
        }
    }

    /// Classify a single observation.
    ///
    /// The confidence is the winning class's probability, so it is always
    /// at least 0.5.
    pub fn predict(&self, temperature: f64, run_time: f64) -> Prediction {
        let p_downtime = self.model.probability(&[temperature, run_time]);
        if p_downtime >= 0.5 {
            Prediction {
                label: DowntimeLabel::Yes,
                confidence: p_downtime,
            }
        } else {
            Prediction {
                label: DowntimeLabel::No,
                confidence: 1.0 - p_downtime,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction types
// ---------------------------------------------------------------------------

/// Whether downtime is predicted for the given observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DowntimeLabel {
    /// Positive class (`Downtime_Flag = 1`).
    Yes,
    /// Negative class (`Downtime_Flag = 0`).
    No,
}

/// A single classification result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class.
    pub label: DowntimeLabel,
    /// Probability of the predicted class, in `[0.5, 1.0]`.
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Core error taxonomy.
///
/// "Not trained yet" conditions get their own variants so API callers can
/// distinguish them from genuine failures.
#[derive(thiserror::Error, Debug)]
pub enum DownwatchError {
    /// The uploaded CSV is malformed or missing required columns.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// No dataset has been uploaded yet.
    #[error("No dataset has been uploaded yet")]
    DatasetNotFound,

    /// The model fit itself failed.
    #[error("Training error: {0}")]
    Training(String),

    /// No trained model exists in memory or on disk.
    #[error("No trained model is available")]
    ModelNotFound,

    /// Storage layer error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization / deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for `std::result::Result<T, DownwatchError>`.
pub type Result<T> = std::result::Result<T, DownwatchError>;

// ---------------------------------------------------------------------------
// Model store
// ---------------------------------------------------------------------------

/// The single-slot model store.
///
/// `put` replaces whatever artifact is current; `get` returns it, or
/// `None` when nothing has been trained yet. Implementations must be safe
/// under concurrent `put`/`get` calls.
#[async_trait::async_trait]
pub trait ModelStore: Send + Sync {
    /// Replace the current artifact.
    async fn put(&self, artifact: ModelArtifact) -> Result<()>;

    /// Fetch the current artifact, if any.
    async fn get(&self) -> Result<Option<ModelArtifact>>;
}
