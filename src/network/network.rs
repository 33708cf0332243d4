use std::fmt;

use rand::Rng;
use tracing::debug;

use crate::{
    activation::activation::Activation,
    error::{NetError, Result},
    layers::dense::Layer,
    math::matrix::Matrix,
};

/// A fully-connected feed-forward network.
///
/// `widths` holds one entry per layer of units (input layer included), and
/// `layers[i]` is the transition from `widths[i]` to `widths[i + 1]`. The
/// network owns every weight and bias matrix; dropping it releases them.
#[derive(Debug, Clone)]
pub struct Network {
    widths: Vec<usize>,
    layers: Vec<Layer>,
}

/// Intermediate matrices of one forward pass, kept for backpropagation.
///
/// Indexed by layer transition: `pre_activation(l)` is `Z` of transition
/// `l`, `layer_input(l)` the activation it consumed and `layer_output(l)`
/// the activation it produced. The caller's input is borrowed, not copied.
#[derive(Debug)]
pub struct ForwardCache<'a> {
    input: &'a Matrix,
    pre_activations: Vec<Matrix>,
    activations: Vec<Matrix>,
}

impl<'a> ForwardCache<'a> {
    pub fn len(&self) -> usize {
        self.activations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activations.is_empty()
    }

    pub fn pre_activation(&self, layer: usize) -> &Matrix {
        &self.pre_activations[layer]
    }

    pub fn layer_input(&self, layer: usize) -> &Matrix {
        if layer == 0 {
            self.input
        } else {
            &self.activations[layer - 1]
        }
    }

    pub fn layer_output(&self, layer: usize) -> &Matrix {
        &self.activations[layer]
    }

    /// Activation of the last layer.
    pub fn output(&self) -> &Matrix {
        self.activations.last().unwrap_or(self.input)
    }

    /// Gives up the cache, keeping only the network output.
    pub fn into_output(mut self) -> Matrix {
        self.activations.pop().unwrap_or_else(|| self.input.clone())
    }
}

impl Network {
    /// Builds a network from layer widths and one activation name per
    /// transition, e.g. `Network::new(&[2, 3, 1], &["sigmoid", "sigmoid"], &mut rng)`.
    ///
    /// Fails with `UnknownActivation` before any weights are drawn if a name
    /// is not registered.
    pub fn new<S, R>(widths: &[usize], activation_names: &[S], rng: &mut R) -> Result<Network>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let activations = activation_names
            .iter()
            .map(|name| name.as_ref().parse::<Activation>())
            .collect::<Result<Vec<_>>>()?;
        Network::with_activations(widths, activations, rng)
    }

    pub fn with_activations<R: Rng + ?Sized>(
        widths: &[usize],
        activations: Vec<Activation>,
        rng: &mut R,
    ) -> Result<Network> {
        if widths.len() < 2 {
            return Err(NetError::InvalidTopology(format!(
                "need at least 2 layer widths, got {}",
                widths.len()
            )));
        }
        if let Some(i) = widths.iter().position(|&w| w == 0) {
            return Err(NetError::InvalidTopology(format!("layer {} has width 0", i)));
        }
        if activations.len() != widths.len() - 1 {
            return Err(NetError::InvalidTopology(format!(
                "{} layer widths need {} activations, got {}",
                widths.len(),
                widths.len() - 1,
                activations.len()
            )));
        }

        let layers = widths
            .windows(2)
            .zip(activations)
            .map(|(pair, activation)| Layer::new(pair[0], pair[1], activation, rng))
            .collect::<Vec<_>>();

        let names: Vec<&str> = layers.iter().map(|l| l.activation.name()).collect();
        debug!(widths = ?widths, activations = ?names, "constructed network");

        Ok(Network { widths: widths.to_vec(), layers })
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Number of layers of units, input layer included.
    pub fn num_layers(&self) -> usize {
        self.widths.len()
    }

    pub fn input_width(&self) -> usize {
        self.widths[0]
    }

    pub fn output_width(&self) -> usize {
        self.widths[self.widths.len() - 1]
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Runs the network on an `input_width x batch` matrix and returns the
    /// `output_width x batch` result. Does not modify the network.
    pub fn evaluate(&self, input: &Matrix) -> Result<Matrix> {
        self.check_input("evaluate", input)?;

        let (first, rest) = self
            .layers
            .split_first()
            .ok_or_else(|| NetError::InvalidTopology("network has no layers".into()))?;

        let mut current = first.feed_from(input)?;
        for layer in rest {
            current = layer.feed_from(&current)?;
        }
        Ok(current)
    }

    /// Forward pass that keeps every pre-activation and activation.
    pub fn forward_cached<'a>(&self, input: &'a Matrix) -> Result<ForwardCache<'a>> {
        self.check_input("forward", input)?;

        let mut pre_activations = Vec::with_capacity(self.layers.len());
        let mut activations: Vec<Matrix> = Vec::with_capacity(self.layers.len());

        for layer in &self.layers {
            let z = layer.pre_activation(activations.last().unwrap_or(input))?;
            let mut a = z.clone();
            layer.activate(&mut a);
            pre_activations.push(z);
            activations.push(a);
        }

        Ok(ForwardCache { input, pre_activations, activations })
    }

    /// Human-readable dump of the shape and every parameter.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    pub(crate) fn check_input(&self, op: &'static str, input: &Matrix) -> Result<()> {
        if input.rows() != self.input_width() {
            return Err(NetError::DimensionMismatch {
                op,
                left: (self.input_width(), input.cols()),
                right: input.shape(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Num layers: {}", self.num_layers())?;
        writeln!(f)?;
        writeln!(f, "Layers: {:?}", self.widths)?;
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(f)?;
            writeln!(
                f,
                "Layer {} ({} -> {}, {})",
                i,
                layer.input_size(),
                layer.size(),
                layer.activation
            )?;
            writeln!(f, "Weights:")?;
            writeln!(f, "{}", layer.weights)?;
            writeln!(f, "Biases:")?;
            writeln!(f, "{}", layer.biases)?;
        }
        Ok(())
    }
}
