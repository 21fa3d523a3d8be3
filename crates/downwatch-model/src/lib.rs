//! Dataset loading, training, and evaluation for downwatch.
//!
//! The pipeline is deliberately small: parse the uploaded CSV into a
//! feature matrix, split it with a seeded shuffle, fit a binary logistic
//! regression, and score the held-out partition.

pub mod dataset;
pub mod metrics;
pub mod split;
pub mod trainer;

pub use dataset::DowntimeDataset;
pub use metrics::EvaluationMetrics;
pub use trainer::{train_from_csv, TrainOutcome};
