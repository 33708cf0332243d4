use std::path::Path;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::network::network::Network;

/// Architecture of a network, loadable from JSON:
///
/// ```json
/// { "layers": [784, 100, 10], "activations": ["sigmoid", "sigmoid"], "seed": 42 }
/// ```
///
/// Only the shape is described here. Trained weights are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Layer widths, input first.
    pub layers: Vec<usize>,
    /// One registered activation name per layer transition.
    pub activations: Vec<String>,
    /// Seed for the weight initialiser.
    #[serde(default)]
    pub seed: u64,
}

impl NetworkSpec {
    /// Builds a freshly initialised network. The same spec always yields
    /// the same initial weights.
    pub fn build(&self) -> Result<Network> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        Network::new(&self.layers, &self.activations, &mut rng)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
