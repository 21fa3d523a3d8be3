//! Held-out evaluation metrics.
//!
//! Everything derives from the confusion matrix over the test partition.
//! Class 1 = downtime (positive), class 0 = machine stayed up.

/// Confusion-matrix metrics for a binary evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

/// Compute metrics from predicted and ground-truth labels.
pub fn evaluate(predictions: &[i32], labels: &[i32]) -> EvaluationMetrics {
    assert_eq!(
        predictions.len(),
        labels.len(),
        "predictions and labels must have same length"
    );

    let mut true_positives = 0usize;
    let mut false_positives = 0usize;
    let mut true_negatives = 0usize;
    let mut false_negatives = 0usize;

    for (&predicted, &actual) in predictions.iter().zip(labels.iter()) {
        match (predicted, actual) {
            (1, 1) => true_positives += 1,
            (1, 0) => false_positives += 1,
            (0, 0) => true_negatives += 1,
            (0, 1) => false_negatives += 1,
            _ => {}
        }
    }

    let total = (true_positives + false_positives + true_negatives + false_negatives) as f64;
    let accuracy = if total > 0.0 {
        (true_positives + true_negatives) as f64 / total
    } else {
        0.0
    };

    let precision = if true_positives + false_positives > 0 {
        true_positives as f64 / (true_positives + false_positives) as f64
    } else {
        0.0
    };

    let recall = if true_positives + false_negatives > 0 {
        true_positives as f64 / (true_positives + false_negatives) as f64
    } else {
        0.0
    };

    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    EvaluationMetrics {
        accuracy,
        precision,
        recall,
        f1,
        true_positives,
        false_positives,
        true_negatives,
        false_negatives,
    }
}

impl std::fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "acc={:.4} prec={:.4} rec={:.4} f1={:.4} (tp={} fp={} tn={} fn={})",
            self.accuracy,
            self.precision,
            self.recall,
            self.f1,
            self.true_positives,
            self.false_positives,
            self.true_negatives,
            self.false_negatives,
        )
    }
}
