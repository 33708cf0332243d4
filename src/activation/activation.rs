use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::NetError;

/// The closed set of element-wise activations a layer can use.
///
/// Names are resolved once, when a network is built; the hot paths only
/// match on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Sigmoid,
    ReLU,
    Tanh,
}

impl Activation {
    /// Registered names, in the order they are tried.
    pub const NAMES: [&'static str; 3] = ["sigmoid", "relu", "tanh"];

    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(x),
            Activation::ReLU => if x > 0.0 { x } else { 0.0 },
            Activation::Tanh => x.tanh(),
        }
    }

    /// Derivative with respect to the pre-activation `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                let fx = sigmoid(x);
                fx * (1.0 - fx)
            }
            Activation::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            Activation::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Sigmoid => "sigmoid",
            Activation::ReLU => "relu",
            Activation::Tanh => "tanh",
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl FromStr for Activation {
    type Err = NetError;

    /// Case-insensitive lookup in the registry.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sigmoid" => Ok(Activation::Sigmoid),
            "relu" => Ok(Activation::ReLU),
            "tanh" => Ok(Activation::Tanh),
            _ => Err(NetError::UnknownActivation(s.to_string())),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
