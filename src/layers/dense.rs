use rand::Rng;

use crate::{
    activation::activation::Activation,
    error::{NetError, Result},
    math::matrix::Matrix,
};

/// Half-width of the uniform range used for initial weights.
pub const INIT_RANGE: f64 = 0.5;

/// One layer transition: `a_out = activation(weights * a_in + biases)`.
///
/// `weights` is `size x input_size`, `biases` is `size x 1`. Both are
/// mutated in place by training and never reallocated.
#[derive(Debug, Clone)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Matrix,
    pub activation: Activation,
}

impl Layer {
    /// Weights drawn uniformly from `[-0.5, 0.5]`, biases zeroed.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Layer {
        Layer {
            weights: Matrix::random_uniform(size, input_size, -INIT_RANGE, INIT_RANGE, rng),
            biases: Matrix::zeros(size, 1),
            activation,
        }
    }

    pub fn size(&self) -> usize {
        self.weights.rows()
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols()
    }

    /// `z = weights * input + biases`, bias broadcast over the batch columns.
    pub fn pre_activation(&self, input: &Matrix) -> Result<Matrix> {
        self.weights.multiply_with_bias(input, &self.biases)
    }

    /// Applies the activation to `z` in place.
    pub fn activate(&self, z: &mut Matrix) {
        let activation = self.activation;
        z.unary_element_wise(|x| activation.function(x));
    }

    /// Runs the layer on a `input_size x batch` matrix.
    pub fn feed_from(&self, input: &Matrix) -> Result<Matrix> {
        let mut a = self.pre_activation(input)?;
        self.activate(&mut a);
        Ok(a)
    }

    /// `dA/dZ` evaluated at the cached pre-activations.
    pub fn activation_derivative(&self, z: &Matrix) -> Matrix {
        let activation = self.activation;
        z.map(|x| activation.derivative(x))
    }

    /// Subtracts already learning-rate-scaled gradients from the parameters.
    /// Both shapes are checked before either parameter is touched.
    pub fn apply_gradients(&mut self, weights_step: &Matrix, biases_step: &Matrix) -> Result<()> {
        if biases_step.shape() != self.biases.shape() {
            return Err(NetError::DimensionMismatch {
                op: "apply_gradients",
                left: self.biases.shape(),
                right: biases_step.shape(),
            });
        }
        self.weights.sub_in_place(weights_step)?;
        self.biases.sub_in_place(biases_step)?;
        Ok(())
    }
}
