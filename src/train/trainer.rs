use tracing::{instrument, trace, warn};

use crate::{
    error::{NetError, Result},
    loss::mse::MseLoss,
    math::matrix::Matrix,
    network::network::Network,
};

/// One full-batch gradient-descent step.
///
/// `input` is `input_width x batch` and `expected` is `output_width x batch`,
/// column-aligned. Runs a cached forward pass, sweeps the error backwards
/// through every layer and updates weights and biases in place. Returns the
/// batch cost `0.5 * ||output - expected||^2`, not divided by the batch size.
///
/// The error handed to the previous layer is computed from the weights as
/// they were before this step's update, so every layer's gradient belongs to
/// the same parameter snapshot.
///
/// Shapes are validated before anything is written; on `Err` the network is
/// unchanged.
#[instrument(level = "trace", skip_all, fields(batch = input.cols()))]
pub fn train_step(
    network: &mut Network,
    input: &Matrix,
    expected: &Matrix,
    learning_rate: f64,
) -> Result<f64> {
    network.check_input("train_step", input)?;
    let batch = input.cols();
    if expected.shape() != (network.output_width(), batch) {
        return Err(NetError::DimensionMismatch {
            op: "train_step",
            left: (network.output_width(), batch),
            right: expected.shape(),
        });
    }

    let cache = network.forward_cached(input)?;

    // dC/dA for the layer currently being visited, starting at the output.
    let mut d_a = MseLoss::derivative(cache.output(), expected)?;
    let cost = MseLoss::cost_of_error(&d_a);

    let ones = Matrix::filled(batch, 1, 1.0);

    for l in (0..network.layers().len()).rev() {
        let layer = &network.layers()[l];

        let mut d_z = layer.activation_derivative(cache.pre_activation(l));
        d_z.hadamard_in_place(&d_a)?;

        let mut weights_step = d_z.multiply(&cache.layer_input(l).transpose())?;
        weights_step.scale(learning_rate);

        // Row sums of dC/dZ across the batch.
        let mut biases_step = d_z.multiply(&ones)?;
        biases_step.scale(learning_rate);

        if l > 0 {
            d_a = layer.weights.transpose().multiply(&d_z)?;
        }

        network.layers_mut()[l].apply_gradients(&weights_step, &biases_step)?;
    }

    trace!(cost, "train step");
    if !cost.is_finite() {
        warn!(cost, "training cost is not finite");
    }

    Ok(cost)
}
