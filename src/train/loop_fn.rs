use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::data::dataset::Dataset;
use crate::error::{NetError, Result};
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::score::accuracy;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train_step;

/// Trains `network` for `config.epochs` epochs of mini-batch gradient
/// descent and returns one `EpochStats` per epoch.
///
/// Each epoch optionally reshuffles `train` (seeded from `config.seed`),
/// runs `train_step` on every batch and, if `test` is given, scores it.
/// Input and output widths are checked against the datasets up front.
pub fn train_loop(
    network: &mut Network,
    train: &mut Dataset,
    test: Option<&Dataset>,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    config.validate()?;
    if train.is_empty() {
        return Err(NetError::InvalidConfig("training set is empty".into()));
    }
    for dataset in std::iter::once(&*train).chain(test) {
        check_widths(network, dataset)?;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        if config.shuffle {
            train.shuffle(&mut rng);
        }

        let mut total_cost = 0.0;
        for (start, end) in train.batch_ranges(config.batch_size)? {
            let batch = train.batch(start, end)?;
            total_cost += train_step(network, &batch.input, &batch.expected, config.learning_rate)?;
        }
        let mean_cost = total_cost / train.len() as f64;

        let test_accuracy = test
            .map(|t| accuracy(network, t, config.batch_size))
            .transpose()?;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        info!(
            epoch,
            total_epochs = config.epochs,
            mean_cost,
            test_accuracy = ?test_accuracy,
            elapsed_ms,
            "epoch complete"
        );

        history.push(EpochStats {
            epoch,
            total_epochs: config.epochs,
            mean_cost,
            test_accuracy,
            elapsed_ms,
        });
    }

    Ok(history)
}

fn check_widths(network: &Network, dataset: &Dataset) -> Result<()> {
    if dataset.feature_dim() != network.input_width() || dataset.classes() != network.output_width() {
        return Err(NetError::DimensionMismatch {
            op: "train_loop",
            left: (network.input_width(), network.output_width()),
            right: (dataset.feature_dim(), dataset.classes()),
        });
    }
    Ok(())
}
