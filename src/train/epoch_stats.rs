use serde::{Serialize, Deserialize};

/// Per-epoch summary produced by `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Sum of the batch costs divided by the number of training samples.
    pub mean_cost: f64,
    /// Fraction of the test set classified correctly, when one was given.
    pub test_accuracy: Option<f64>,
    pub elapsed_ms: u64,
}
