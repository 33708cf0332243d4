use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::network::network::Network;

/// Fraction of samples whose highest output unit matches the label.
///
/// Evaluates `batch_size` samples at a time. An empty dataset scores `0.0`.
pub fn accuracy(network: &Network, dataset: &Dataset, batch_size: usize) -> Result<f64> {
    if dataset.is_empty() {
        return Ok(0.0);
    }

    let mut correct = 0usize;
    for (start, end) in dataset.batch_ranges(batch_size)? {
        let batch = dataset.batch(start, end)?;
        let output = network.evaluate(&batch.input)?;
        correct += output
            .column_argmax()
            .iter()
            .zip(&batch.labels)
            .filter(|(predicted, label)| predicted == label)
            .count();
    }

    Ok(correct as f64 / dataset.len() as f64)
}
